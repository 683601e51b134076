//! Line topology service.
//!
//! Coordinates the repositories and the section chain engine: it looks up
//! lines and stations by id, runs the engine operation and saves the
//! result, serializing changes per line.

mod error;
mod locks;
mod topology;


pub use error::{Resource, ServiceError};
pub use topology::{CreateLine, LineTopologyService, LineView};
