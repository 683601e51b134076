//! Web layer for the subway line server.
//!
//! Exposes stations, lines and sections as JSON over HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Topology};
