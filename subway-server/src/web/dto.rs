//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Section, Station};
use crate::service::LineView;

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

/// A station.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub id: u64,
    pub name: String,
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,

    /// Display color, e.g. "bg-green-600"
    pub color: String,

    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: i64,
}

/// Request to rename or recolor a line.
#[derive(Debug, Deserialize)]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
}

/// Request to add a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: i64,
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStationQuery {
    pub station_id: u64,
}

/// A section between two stations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub up_station: StationResponse,
    pub down_station: StationResponse,
    pub distance: u64,
}

/// A line with its stations in travel order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: u64,
    pub name: String,
    pub color: String,

    /// Stations from the up terminal to the down terminal
    pub stations: Vec<StationResponse>,

    /// Sections in the same order as `stations`
    pub sections: Vec<SectionResponse>,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResponse {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().0,
            name: station.name().as_str().to_string(),
        }
    }
}

impl SectionResponse {
    /// Create from a domain Section.
    pub fn from_section(section: &Section) -> Self {
        Self {
            up_station: StationResponse::from_station(section.up()),
            down_station: StationResponse::from_station(section.down()),
            distance: section.distance().value(),
        }
    }
}

impl LineResponse {
    /// Create from an ordered line view.
    pub fn from_view(view: &LineView) -> Self {
        let line = &view.line;
        Self {
            id: line.id().0,
            name: line.name().as_str().to_string(),
            color: line.color().as_str().to_string(),
            stations: view
                .stations
                .iter()
                .map(StationResponse::from_station)
                .collect(),
            sections: view
                .sections
                .iter()
                .map(SectionResponse::from_section)
                .collect(),
            created_at: line.created_at(),
            modified_at: line.modified_at(),
        }
    }
}
