//! Station types.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::StationId;

/// Error returned when a station name is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station name: {reason}")]
pub struct InvalidStationName {
    reason: &'static str,
}

/// Maximum station name length in characters.
const MAX_NAME_CHARS: usize = 100;

/// Display name of a station.
///
/// Names are trimmed and must be non-empty. This type guarantees that any
/// `StationName` value is valid by construction.
///
/// # Examples
///
/// ```
/// use subway_server::domain::StationName;
///
/// let name = StationName::parse("  Gangnam ").unwrap();
/// assert_eq!(name.as_str(), "Gangnam");
///
/// // Blank names are rejected
/// assert!(StationName::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationName(String);

impl StationName {
    /// Parse a station name, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationName> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationName {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().count() > MAX_NAME_CHARS {
            return Err(InvalidStationName {
                reason: "must be at most 100 characters",
            });
        }

        Ok(StationName(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationName({})", self.0)
    }
}

impl fmt::Display for StationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted station.
///
/// Stations are immutable once created. Two stations are the same station
/// exactly when their ids match; the name is display data only.
#[derive(Debug, Clone)]
pub struct Station {
    id: StationId,
    name: StationName,
}

impl Station {
    /// Create a station from its stored parts.
    pub fn new(id: StationId, name: StationName) -> Self {
        Self { id, name }
    }

    /// Returns the station's identifier.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Returns the station's display name.
    pub fn name(&self) -> &StationName {
        &self.name
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
