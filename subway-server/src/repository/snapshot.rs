//! JSON snapshot of the whole store.
//!
//! The snapshot stores plain records. Loading re-validates every record
//! into domain types, so a hand-edited or truncated file is reported as
//! corrupt instead of producing a line that breaks the chain invariants.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Distance, Line, LineColor, LineId, LineName, Section, SectionChain, Station, StationId,
    StationName,
};

use super::error::RepositoryError;
use super::memory::StoreData;

/// Stored form of a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StationRecord {
    id: StationId,
    name: String,
}

/// Stored form of a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SectionRecord {
    up_station_id: StationId,
    down_station_id: StationId,
    distance: u64,
}

/// Stored form of a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LineRecord {
    id: LineId,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    sections: Vec<SectionRecord>,
}

/// Everything in the store at one moment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    next_station_id: u64,
    next_line_id: u64,
    stations: Vec<StationRecord>,
    lines: Vec<LineRecord>,
}

fn corrupt(message: String) -> RepositoryError {
    RepositoryError::Corrupt { message }
}

impl Snapshot {
    /// Copy the store's contents into records.
    pub(crate) fn capture(data: &StoreData) -> Self {
        let stations = data
            .stations
            .values()
            .map(|s| StationRecord {
                id: s.id(),
                name: s.name().to_string(),
            })
            .collect();

        let lines = data
            .lines
            .values()
            .map(|line| LineRecord {
                id: line.id(),
                name: line.name().to_string(),
                color: line.color().to_string(),
                created_at: line.created_at(),
                modified_at: line.modified_at(),
                sections: line
                    .sections()
                    .sections()
                    .iter()
                    .map(|s| SectionRecord {
                        up_station_id: s.up().id(),
                        down_station_id: s.down().id(),
                        distance: s.distance().value(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            next_station_id: data.next_station_id,
            next_line_id: data.next_line_id,
            stations,
            lines,
        }
    }

    /// Validate the records and rebuild the store's contents.
    pub(crate) fn restore(self) -> Result<StoreData, RepositoryError> {
        let mut stations = BTreeMap::new();
        for record in self.stations {
            let name = StationName::parse(&record.name)
                .map_err(|e| corrupt(format!("station {}: {e}", record.id)))?;
            let station = Station::new(record.id, name);
            if stations.insert(record.id, station).is_some() {
                return Err(corrupt(format!("station {} appears twice", record.id)));
            }
        }

        let mut lines = BTreeMap::new();
        for record in self.lines {
            let line = restore_line(record, &stations)?;
            let id = line.id();
            if lines.insert(id, line).is_some() {
                return Err(corrupt(format!("line {id} appears twice")));
            }
        }

        let next_station_id = stations
            .keys()
            .next_back()
            .map_or(1, |id: &StationId| id.0 + 1)
            .max(self.next_station_id);
        let next_line_id = lines
            .keys()
            .next_back()
            .map_or(1, |id: &LineId| id.0 + 1)
            .max(self.next_line_id);

        Ok(StoreData {
            stations,
            lines,
            next_station_id,
            next_line_id,
        })
    }
}

fn restore_line(
    record: LineRecord,
    stations: &BTreeMap<StationId, Station>,
) -> Result<Line, RepositoryError> {
    let id = record.id;
    let name = LineName::parse(&record.name).map_err(|e| corrupt(format!("line {id}: {e}")))?;
    let color = LineColor::parse(&record.color).map_err(|e| corrupt(format!("line {id}: {e}")))?;

    if record.sections.is_empty() {
        return Err(corrupt(format!("line {id} has no sections")));
    }

    let lookup = |station: StationId| {
        stations
            .get(&station)
            .cloned()
            .ok_or_else(|| corrupt(format!("line {id} references unknown station {station}")))
    };

    let mut sections = Vec::with_capacity(record.sections.len());
    for s in record.sections {
        let distance = i64::try_from(s.distance)
            .map_err(|_| corrupt(format!("line {id}: distance out of range")))
            .and_then(|d| Distance::new(d).map_err(|e| corrupt(format!("line {id}: {e}"))))?;
        let section = Section::new(lookup(s.up_station_id)?, lookup(s.down_station_id)?, distance)
            .map_err(|e| corrupt(format!("line {id}: {e}")))?;
        sections.push(section);
    }

    let chain =
        SectionChain::from_sections(sections).map_err(|e| corrupt(format!("line {id}: {e}")))?;

    Ok(Line::new(
        id,
        name,
        color,
        chain,
        record.created_at,
        record.modified_at,
    ))
}

/// Location of the snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Use the snapshot file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot.
    ///
    /// Returns `None` if the file does not exist yet.
    pub(crate) async fn load(&self) -> Result<Option<Snapshot>, RepositoryError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write the snapshot, replacing any previous one.
    ///
    /// Creates parent directories if they don't exist. The file is written
    /// beside the target and renamed over it, so readers never see a
    /// half-written snapshot.
    pub(crate) async fn save(&self, snapshot: &Snapshot) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
