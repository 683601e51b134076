//! Storage for stations and lines.
//!
//! The service layer talks to storage only through the [`StationRepository`]
//! and [`LineRepository`] traits. Lines are always loaded and saved whole,
//! section chain included, so the topology engine never sees a partial
//! line.
//!
//! [`MemoryStore`] implements both traits, optionally mirrored to a JSON
//! snapshot file so data survives restarts.

mod error;
mod memory;
mod snapshot;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Line, LineColor, LineId, LineName, SectionChain, Station, StationId, StationName};

pub use error::RepositoryError;
pub use memory::MemoryStore;
pub use snapshot::SnapshotFile;

/// A line that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: LineName,
    pub color: LineColor,
    pub sections: SectionChain,
    pub created_at: DateTime<Utc>,
}

/// Station lookup and registration.
pub trait StationRepository: Send + Sync {
    /// Store a new station and assign it an id.
    fn create(
        &self,
        name: StationName,
    ) -> impl Future<Output = Result<Station, RepositoryError>> + Send;

    /// Look up a station by id.
    fn find(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, RepositoryError>> + Send;

    /// Return every station, ordered by id.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Station>, RepositoryError>> + Send;

    /// Delete a station. Returns false if it did not exist.
    fn delete(&self, id: StationId) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Line lookup and persistence.
pub trait LineRepository: Send + Sync {
    /// Store a new line and assign it an id.
    fn create(&self, line: NewLine) -> impl Future<Output = Result<Line, RepositoryError>> + Send;

    /// Look up a line by id.
    fn find(&self, id: LineId) -> impl Future<Output = Result<Option<Line>, RepositoryError>> + Send;

    /// Return every line, ordered by id.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Line>, RepositoryError>> + Send;

    /// Replace a stored line, sections included.
    ///
    /// Fails with [`RepositoryError::MissingLine`] if the line was deleted.
    fn save(&self, line: &Line) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a line. Returns false if it did not exist.
    fn delete(&self, id: LineId) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}
