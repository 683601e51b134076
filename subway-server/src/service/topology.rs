//! Line and section orchestration.
//!
//! The service resolves ids through the repositories, hands the loaded
//! line's chain to the topology engine and saves the result. Each change
//! to a line runs under that line's lock, so the load-edit-save cycle is
//! atomic with respect to other requests for the same line.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    Distance, Line, LineColor, LineId, LineName, Section, SectionChain, Station, StationId,
    StationName, TopologyError,
};
use crate::repository::{LineRepository, NewLine, StationRepository};

use super::error::{Resource, ServiceError};
use super::locks::LineLocks;

/// Request to create a line with its first section.
#[derive(Debug, Clone)]
pub struct CreateLine {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

/// A line together with its stations and sections in travel order.
#[derive(Debug, Clone)]
pub struct LineView {
    pub line: Line,
    pub stations: Vec<Station>,
    pub sections: Vec<Section>,
}

impl LineView {
    /// Order a line's sections for display.
    pub fn of(line: Line) -> Result<Self, TopologyError> {
        let sections: Vec<Section> = line
            .sections()
            .ordered_sections()?
            .into_iter()
            .cloned()
            .collect();
        let stations = sections
            .first()
            .map(|first| first.up().clone())
            .into_iter()
            .chain(sections.iter().map(|s| s.down().clone()))
            .collect();
        Ok(Self {
            line,
            stations,
            sections,
        })
    }
}

/// Log a rejected or failed topology operation and convert it.
///
/// A broken chain means stored data is already inconsistent, so it is
/// logged as an error; anything else is an ordinary rejected request.
fn topology_failure(line: LineId, err: TopologyError) -> ServiceError {
    if err.is_corruption() {
        tracing::error!(line = %line, error = %err, "line sections are corrupt");
    } else {
        tracing::debug!(line = %line, error = %err, "section change rejected");
    }
    ServiceError::Topology(err)
}

/// Orchestrates station registration, line lifecycle and section changes.
///
/// Line changes take a per-line lock plus a shared hold on the station
/// registry; deleting a station takes the registry exclusively, so a
/// station cannot vanish while a line is being changed to use it.
pub struct LineTopologyService<S, L> {
    stations: S,
    lines: L,
    locks: LineLocks,
    registry: RwLock<()>,
}

impl<S: StationRepository, L: LineRepository> LineTopologyService<S, L> {
    /// Create a service over the given repositories.
    pub fn new(stations: S, lines: L) -> Self {
        Self {
            stations,
            lines,
            locks: LineLocks::default(),
            registry: RwLock::new(()),
        }
    }

    /// Register a new station.
    pub async fn create_station(&self, name: &str) -> Result<Station, ServiceError> {
        let name = StationName::parse(name)?;
        let station = self.stations.create(name).await?;
        tracing::info!(station = %station.id(), name = %station.name(), "created station");
        Ok(station)
    }

    /// Return every registered station.
    pub async fn find_stations(&self) -> Result<Vec<Station>, ServiceError> {
        Ok(self.stations.find_all().await?)
    }

    /// Delete a station that no line uses.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the station does not exist
    /// - [`ServiceError::StationInUse`] if any line still calls there
    pub async fn delete_station(&self, id: StationId) -> Result<(), ServiceError> {
        let _registry = self.registry.write().await;
        self.station(id).await?;

        if let Some(line) = self
            .lines
            .find_all()
            .await?
            .into_iter()
            .find(|line| line.serves(id))
        {
            return Err(ServiceError::StationInUse(id, line.id()));
        }

        self.stations.delete(id).await?;
        tracing::info!(station = %id, "deleted station");
        Ok(())
    }

    /// Create a line seeded with one section.
    pub async fn create_line(&self, request: CreateLine) -> Result<LineView, ServiceError> {
        let name = LineName::parse(&request.name)?;
        let color = LineColor::parse(&request.color)?;

        let _registry = self.registry.read().await;
        let up = self.station(request.up_station_id).await?;
        let down = self.station(request.down_station_id).await?;
        let section = Section::new(up, down, Distance::new(request.distance)?)?;

        let line = self
            .lines
            .create(NewLine {
                name,
                color,
                sections: SectionChain::seeded(section),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(line = %line.id(), name = %line.name(), "created line");
        Self::view(line)
    }

    /// Look up one line.
    pub async fn find_line(&self, id: LineId) -> Result<LineView, ServiceError> {
        Self::view(self.line(id).await?)
    }

    /// Return every line.
    pub async fn find_lines(&self) -> Result<Vec<LineView>, ServiceError> {
        self.lines
            .find_all()
            .await?
            .into_iter()
            .map(Self::view)
            .collect()
    }

    /// Change a line's name and color.
    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<LineView, ServiceError> {
        let name = LineName::parse(name)?;
        let color = LineColor::parse(color)?;

        let _guard = self.locks.acquire(id).await;
        let mut line = self.line(id).await?;
        line.update(name, color, Utc::now());
        self.lines.save(&line).await?;

        tracing::info!(line = %id, "updated line");
        Self::view(line)
    }

    /// Delete a line and all its sections.
    pub async fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        let guard = self.locks.acquire(id).await;
        if !self.lines.delete(id).await? {
            return Err(ServiceError::NotFound(Resource::Line(id)));
        }
        self.locks.forget(id).await;
        drop(guard);

        tracing::info!(line = %id, "deleted line");
        Ok(())
    }

    /// Add a section to a line.
    ///
    /// Resolves both stations, builds the candidate section and inserts it
    /// into the line's chain, splitting an existing section if the
    /// candidate lands inside one. Returns the updated line.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] for an unknown line or station
    /// - [`ServiceError::Topology`] if the engine rejects the section
    pub async fn add_section(
        &self,
        line_id: LineId,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<LineView, ServiceError> {
        let _registry = self.registry.read().await;
        let _guard = self.locks.acquire(line_id).await;

        let mut line = self.line(line_id).await?;
        let up = self.station(up_station_id).await?;
        let down = self.station(down_station_id).await?;

        let candidate = Distance::new(distance)
            .and_then(|distance| Section::new(up, down, distance))
            .map_err(|e| topology_failure(line_id, e))?;
        line.add_section(candidate, Utc::now())
            .map_err(|e| topology_failure(line_id, e))?;
        self.lines.save(&line).await?;

        tracing::info!(
            line = %line_id,
            up = %up_station_id,
            down = %down_station_id,
            distance,
            "added section"
        );
        Self::view(line)
    }

    /// Remove a station from a line, merging its sections if it was
    /// interior. Returns the updated line.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] for an unknown line
    /// - [`ServiceError::Topology`] if the station is not on the line or
    ///   the line has only one section left
    pub async fn remove_station(
        &self,
        line_id: LineId,
        station_id: StationId,
    ) -> Result<LineView, ServiceError> {
        let _registry = self.registry.read().await;
        let _guard = self.locks.acquire(line_id).await;

        let mut line = self.line(line_id).await?;
        line.remove_station(station_id, Utc::now())
            .map_err(|e| topology_failure(line_id, e))?;
        self.lines.save(&line).await?;

        tracing::info!(line = %line_id, station = %station_id, "removed station from line");
        Self::view(line)
    }

    /// Return a line's stations in travel order.
    pub async fn list_stations(&self, line_id: LineId) -> Result<Vec<Station>, ServiceError> {
        self.line(line_id)
            .await?
            .stations()
            .map_err(|e| topology_failure(line_id, e))
    }

    /// Return a line's sections in travel order.
    pub async fn list_sections(&self, line_id: LineId) -> Result<Vec<Section>, ServiceError> {
        Ok(self.find_line(line_id).await?.sections)
    }

    async fn station(&self, id: StationId) -> Result<Station, ServiceError> {
        self.stations
            .find(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Station(id)))
    }

    async fn line(&self, id: LineId) -> Result<Line, ServiceError> {
        self.lines
            .find(id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Line(id)))
    }

    fn view(line: Line) -> Result<LineView, ServiceError> {
        let id = line.id();
        LineView::of(line).map_err(|e| topology_failure(id, e))
    }
}
