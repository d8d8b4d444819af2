//! Fish Distribution Service Library
//!
//! HTTP service that resolves a fish name against GBIF, renders the
//! occurrences as a Leaflet map, and keeps a log of every request for the
//! dashboard.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod rendering;
pub mod server;
pub mod state;
