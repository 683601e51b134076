//! Topology error types.
//!
//! These errors represent rejected section operations and data
//! inconsistencies in a line's chain. They are distinct from lookup and
//! storage errors, which belong to the service layer.

use super::StationId;

/// Errors raised by the section topology engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Distance is not positive, or a split would leave a non-positive remainder
    #[error("invalid distance: {0}")]
    InvalidDistance(&'static str),

    /// Both ends of a section are the same station
    #[error("section cannot start and end at station {0}")]
    SameStationSection(StationId),

    /// Both stations of the section are already on the line
    #[error("stations {0} and {1} are already on the line")]
    DuplicateSection(StationId, StationId),

    /// Neither station of the section is on the line
    #[error("neither station {0} nor {1} is on the line")]
    DisjointSection(StationId, StationId),

    /// The stored sections do not form a single path
    #[error("broken section chain: {0}")]
    BrokenChain(&'static str),

    /// Station to remove is not on the line
    #[error("station {0} is not on the line")]
    StationNotInChain(StationId),

    /// Removing the station would leave the line without sections
    #[error("a line must keep at least one section")]
    MinimumSectionCount,
}

impl TopologyError {
    /// Returns true if this error indicates corrupted chain data rather
    /// than a rejected request.
    pub fn is_corruption(&self) -> bool {
        matches!(self, TopologyError::BrokenChain(_))
    }
}
