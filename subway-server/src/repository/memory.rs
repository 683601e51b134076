//! In-memory store, optionally mirrored to a snapshot file.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Line, LineId, Station, StationId, StationName};

use super::error::RepositoryError;
use super::snapshot::{Snapshot, SnapshotFile};
use super::{LineRepository, NewLine, StationRepository};

/// Contents of the store.
#[derive(Debug, Clone)]
pub(crate) struct StoreData {
    pub(crate) stations: BTreeMap<StationId, Station>,
    pub(crate) lines: BTreeMap<LineId, Line>,
    pub(crate) next_station_id: u64,
    pub(crate) next_line_id: u64,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            stations: BTreeMap::new(),
            lines: BTreeMap::new(),
            next_station_id: 1,
            next_line_id: 1,
        }
    }
}

/// Thread-safe store for stations and lines.
///
/// Ids are assigned sequentially starting at 1 and never reused. When
/// opened with a [`SnapshotFile`], every change is written through to the
/// file before the call returns; if the write fails the change is rolled
/// back and the error returned.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreData>>,
    snapshot: Option<SnapshotFile>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store that lives only in memory.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreData::default())),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file.
    ///
    /// Loads the file if it exists; otherwise starts empty and creates the
    /// file on the first change.
    pub async fn open(file: SnapshotFile) -> Result<Self, RepositoryError> {
        let data = match file.load().await? {
            Some(snapshot) => {
                let data = snapshot.restore()?;
                tracing::info!(
                    path = %file.path().display(),
                    stations = data.stations.len(),
                    lines = data.lines.len(),
                    "loaded snapshot"
                );
                data
            }
            None => {
                tracing::info!(path = %file.path().display(), "no snapshot yet, starting empty");
                StoreData::default()
            }
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
            snapshot: Some(file),
        })
    }

    /// Apply a change under the write lock and persist it.
    ///
    /// The change runs against a copy; the copy only replaces the live data
    /// once the snapshot (if any) has been written.
    ///
    /// Each call clones the whole store and, with a snapshot file, holds the
    /// write lock while the file is rewritten. Both costs grow with the
    /// number of stations and lines.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;

        if let Some(file) = &self.snapshot {
            if let Err(e) = file.save(&Snapshot::capture(&next)).await {
                tracing::warn!(path = %file.path().display(), error = %e, "failed to write snapshot");
                return Err(e);
            }
        }

        *guard = next;
        Ok(out)
    }
}

impl StationRepository for MemoryStore {
    async fn create(&self, name: StationName) -> Result<Station, RepositoryError> {
        self.mutate(|data| {
            let id = StationId(data.next_station_id);
            data.next_station_id += 1;
            let station = Station::new(id, name);
            data.stations.insert(id, station.clone());
            Ok(station)
        })
        .await
    }

    async fn find(&self, id: StationId) -> Result<Option<Station>, RepositoryError> {
        let guard = self.inner.read().await;
        Ok(guard.stations.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Station>, RepositoryError> {
        let guard = self.inner.read().await;
        Ok(guard.stations.values().cloned().collect())
    }

    async fn delete(&self, id: StationId) -> Result<bool, RepositoryError> {
        if !self.inner.read().await.stations.contains_key(&id) {
            return Ok(false);
        }
        self.mutate(|data| Ok(data.stations.remove(&id).is_some()))
            .await
    }
}

impl LineRepository for MemoryStore {
    async fn create(&self, line: NewLine) -> Result<Line, RepositoryError> {
        self.mutate(|data| {
            let id = LineId(data.next_line_id);
            data.next_line_id += 1;
            let stored = Line::new(
                id,
                line.name,
                line.color,
                line.sections,
                line.created_at,
                line.created_at,
            );
            data.lines.insert(id, stored.clone());
            Ok(stored)
        })
        .await
    }

    async fn find(&self, id: LineId) -> Result<Option<Line>, RepositoryError> {
        let guard = self.inner.read().await;
        Ok(guard.lines.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Line>, RepositoryError> {
        let guard = self.inner.read().await;
        Ok(guard.lines.values().cloned().collect())
    }

    async fn save(&self, line: &Line) -> Result<(), RepositoryError> {
        self.mutate(|data| match data.lines.get_mut(&line.id()) {
            Some(stored) => {
                *stored = line.clone();
                Ok(())
            }
            None => Err(RepositoryError::MissingLine(line.id())),
        })
        .await
    }

    async fn delete(&self, id: LineId) -> Result<bool, RepositoryError> {
        if !self.inner.read().await.lines.contains_key(&id) {
            return Ok(false);
        }
        self.mutate(|data| Ok(data.lines.remove(&id).is_some()))
            .await
    }
}
