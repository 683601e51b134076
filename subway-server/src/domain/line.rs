//! Line types.
//!
//! A `Line` pairs display attributes with the [`SectionChain`] that defines
//! its route. Topology changes go through the line so its modification
//! time stays current.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{LineId, Section, SectionChain, Station, StationId, TopologyError};

/// Error returned when a line name is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line name: {reason}")]
pub struct InvalidLineName {
    reason: &'static str,
}

/// Error returned when a line color is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line color: {reason}")]
pub struct InvalidLineColor {
    reason: &'static str,
}

/// Display name of a line, e.g. "Line 2".
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LineName(String);

impl LineName {
    /// Parse a line name, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidLineName> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLineName {
                reason: "must not be empty",
            });
        }
        Ok(LineName(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineName({})", self.0)
    }
}

impl fmt::Display for LineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display color of a line, e.g. "bg-green-600".
///
/// The value is opaque to the server; only emptiness and embedded
/// whitespace are rejected.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LineColor(String);

impl LineColor {
    /// Parse a line color, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidLineColor> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLineColor {
                reason: "must not be empty",
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidLineColor {
                reason: "must not contain whitespace",
            });
        }
        Ok(LineColor(trimmed.to_string()))
    }

    /// Returns the color as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineColor({})", self.0)
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subway line and its sections.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    name: LineName,
    color: LineColor,
    sections: SectionChain,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Line {
    /// Assemble a line from stored parts.
    pub fn new(
        id: LineId,
        name: LineName,
        color: LineColor,
        sections: SectionChain,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            color,
            sections,
            created_at,
            modified_at,
        }
    }

    /// Returns the line's identifier.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// Returns the line's name.
    pub fn name(&self) -> &LineName {
        &self.name
    }

    /// Returns the line's color.
    pub fn color(&self) -> &LineColor {
        &self.color
    }

    /// Returns the line's sections.
    pub fn sections(&self) -> &SectionChain {
        &self.sections
    }

    /// When the line was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the line was last changed.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the stations in travel order.
    pub fn stations(&self) -> Result<Vec<Station>, TopologyError> {
        self.sections.ordered_stations()
    }

    /// Returns true if the line calls at the station.
    pub fn serves(&self, station: StationId) -> bool {
        self.sections.contains_station(station)
    }

    /// Replace the display attributes.
    pub fn update(&mut self, name: LineName, color: LineColor, now: DateTime<Utc>) {
        self.name = name;
        self.color = color;
        self.modified_at = now;
    }

    /// Insert a section into the line's chain.
    ///
    /// See [`SectionChain::insert`] for the docking rules.
    pub fn add_section(&mut self, section: Section, now: DateTime<Utc>) -> Result<(), TopologyError> {
        self.sections.insert(section)?;
        self.modified_at = now;
        Ok(())
    }

    /// Remove a station from the line's chain.
    ///
    /// See [`SectionChain::remove_station`].
    pub fn remove_station(
        &mut self,
        station: StationId,
        now: DateTime<Utc>,
    ) -> Result<(), TopologyError> {
        self.sections.remove_station(station)?;
        self.modified_at = now;
        Ok(())
    }
}
