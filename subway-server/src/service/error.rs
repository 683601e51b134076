//! Service error types.

use std::fmt;

use crate::domain::{
    InvalidLineColor, InvalidLineName, InvalidStationName, LineId, StationId, TopologyError,
};
use crate::repository::RepositoryError;

/// A record that a request referred to by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Line(LineId),
    Station(StationId),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Line(id) => write!(f, "line {id}"),
            Resource::Station(id) => write!(f, "station {id}"),
        }
    }
}

/// Errors returned by [`super::LineTopologyService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced line or station does not exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// Section change rejected by the topology engine
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// Malformed name, color or similar request value
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Station cannot be deleted while a line calls there
    #[error("station {0} is still used by line {1}")]
    StationInUse(StationId, LineId),

    /// Storage failed
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<InvalidStationName> for ServiceError {
    fn from(e: InvalidStationName) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

impl From<InvalidLineName> for ServiceError {
    fn from(e: InvalidLineName) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

impl From<InvalidLineColor> for ServiceError {
    fn from(e: InvalidLineColor) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}
