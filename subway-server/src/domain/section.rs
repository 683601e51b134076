//! Section types.
//!
//! A `Section` is one directed stretch of track between two stations. The
//! docking checks here decide how a new section attaches to an existing
//! one; the chain-level rules live in [`super::SectionChain`].

use super::{Distance, Station, StationId, TopologyError};

/// How a candidate section relates to an existing section.
///
/// Returned by [`Section::docking_position`], which is called on the
/// candidate with the existing section as argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockingPosition {
    /// Candidate ends where the existing section starts.
    Front,
    /// Candidate starts where the existing section starts; the existing
    /// section is split and keeps its far end.
    MidFront,
    /// Candidate ends where the existing section ends; the existing
    /// section is split and keeps its near end.
    MidRear,
    /// Candidate starts where the existing section ends.
    Rear,
    /// No shared station.
    None,
}

impl DockingPosition {
    /// Returns true if docking here splits the existing section.
    pub fn is_split(self) -> bool {
        matches!(self, DockingPosition::MidFront | DockingPosition::MidRear)
    }

    /// Returns true if docking here extends the chain at one of its ends.
    pub fn is_terminal(self) -> bool {
        matches!(self, DockingPosition::Front | DockingPosition::Rear)
    }
}

/// A directed section of track from `up` to `down`.
///
/// # Invariants
///
/// - `up != down`
/// - `distance >= 1` (guaranteed by [`Distance`])
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    up: Station,
    down: Station,
    distance: Distance,
}

impl Section {
    /// Construct a section between two distinct stations.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::SameStationSection`] if both ends are the
    /// same station.
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{Distance, Section, Station, StationId, StationName};
    ///
    /// let a = Station::new(StationId(1), StationName::parse("A").unwrap());
    /// let b = Station::new(StationId(2), StationName::parse("B").unwrap());
    /// let ten = Distance::new(10).unwrap();
    ///
    /// let section = Section::new(a.clone(), b, ten).unwrap();
    /// assert_eq!(section.up().id(), StationId(1));
    ///
    /// // A section cannot loop back to its own start
    /// assert!(Section::new(a.clone(), a, ten).is_err());
    /// ```
    pub fn new(up: Station, down: Station, distance: Distance) -> Result<Self, TopologyError> {
        if up == down {
            return Err(TopologyError::SameStationSection(up.id()));
        }
        Ok(Self { up, down, distance })
    }

    /// Returns the station this section starts at.
    pub fn up(&self) -> &Station {
        &self.up
    }

    /// Returns the station this section ends at.
    pub fn down(&self) -> &Station {
        &self.down
    }

    /// Returns the section's length.
    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Returns both stations, up first.
    pub fn stations(&self) -> [&Station; 2] {
        [&self.up, &self.down]
    }

    /// Returns true if either end is the given station.
    pub fn contains(&self, station: StationId) -> bool {
        self.up.id() == station || self.down.id() == station
    }

    /// Classify how this candidate section docks onto `other`.
    ///
    /// Checks run in order and the first match wins: front, mid-front,
    /// mid-rear, rear.
    pub fn docking_position(&self, other: &Section) -> DockingPosition {
        if self.down == other.up {
            DockingPosition::Front
        } else if self.up == other.up {
            DockingPosition::MidFront
        } else if self.down == other.down {
            DockingPosition::MidRear
        } else if self.up == other.down {
            DockingPosition::Rear
        } else {
            DockingPosition::None
        }
    }

    /// Returns what is left of this section once `candidate` is spliced
    /// into it.
    ///
    /// For a mid-front dock the remainder runs from the candidate's end to
    /// this section's end; for a mid-rear dock it runs from this section's
    /// start to the candidate's start. Either way the remainder's distance
    /// is this distance less the candidate's.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::InvalidDistance`] if the candidate is not strictly
    ///   shorter than this section
    /// - [`TopologyError::BrokenChain`] if the candidate does not split this
    ///   section at all
    pub fn split_by(&self, candidate: &Section) -> Result<Section, TopologyError> {
        let remaining = match candidate.docking_position(self) {
            DockingPosition::MidFront => {
                let distance = self.distance.shrink(candidate.distance)?;
                (candidate.down.clone(), self.down.clone(), distance)
            }
            DockingPosition::MidRear => {
                let distance = self.distance.shrink(candidate.distance)?;
                (self.up.clone(), candidate.up.clone(), distance)
            }
            _ => {
                return Err(TopologyError::BrokenChain(
                    "candidate does not split the matched section",
                ));
            }
        };
        let (up, down, distance) = remaining;
        Section::new(up, down, distance)
    }

    /// Join this section with the one that follows it.
    ///
    /// The result runs from this section's start to `next`'s end, with the
    /// combined distance.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BrokenChain`] if `next` does not start where
    /// this section ends.
    pub fn merge(&self, next: &Section) -> Result<Section, TopologyError> {
        if self.down != next.up {
            return Err(TopologyError::BrokenChain(
                "merged sections are not adjacent",
            ));
        }
        let distance = self.distance.combine(next.distance)?;
        Section::new(self.up.clone(), next.down.clone(), distance)
    }
}
