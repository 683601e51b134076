//! Domain types for subway lines.
//!
//! This module contains the validated station, section and line types and
//! the section chain engine that keeps each line a single path. All types
//! enforce their invariants at construction time, so code that receives
//! these types can trust their validity. Nothing here performs I/O.

mod chain;
mod distance;
mod error;
mod ids;
mod line;
mod section;
mod station;

#[cfg(test)]
mod chain_tests;

pub use chain::SectionChain;
pub use distance::Distance;
pub use error::TopologyError;
pub use ids::{LineId, StationId};
pub use line::{InvalidLineColor, InvalidLineName, Line, LineColor, LineName};
pub use section::{DockingPosition, Section};
pub use station::{InvalidStationName, Station, StationName};
