use std::error::Error;

use tracing_subscriber::EnvFilter;

use subway_server::cache::CachedStationRepository;
use subway_server::config::ServerConfig;
use subway_server::repository::{MemoryStore, SnapshotFile};
use subway_server::service::LineTopologyService;
use subway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ServerConfig::from_env()?;

    let store = match &config.data_file {
        Some(path) => MemoryStore::open(SnapshotFile::new(path)).await?,
        None => {
            tracing::warn!("SUBWAY_DATA_FILE not set, data will not survive a restart");
            MemoryStore::new()
        }
    };

    let stations = CachedStationRepository::new(store.clone(), &config.station_cache);
    let topology = LineTopologyService::new(stations, store);
    let app = create_router(AppState::new(topology));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "subway server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
