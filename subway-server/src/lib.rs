//! Subway line server.
//!
//! Keeps each subway line a single ordered path of sections. Adding a
//! section either extends a line at one end or splits an existing section
//! in two; removing a station merges the sections on either side of it.

pub mod cache;
pub mod config;
pub mod domain;
pub mod repository;
pub mod service;
pub mod web;
