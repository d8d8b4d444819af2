//! Shared test utilities for the fish distribution workspace.
//!
//! This crate provides common testing infrastructure including:
//! - GBIF response fixtures
//! - A stub GBIF server bound to a local port
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then start a stub in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, StubGbif, StubResponse};
//!
//! let stub = StubGbif::start(
//!     StubResponse::json(fixtures::species_hit(212)),
//!     StubResponse::json(fixtures::occurrences(&[Some((40.0, -75.0)), None])),
//! )
//! .await;
//! ```

pub mod fixtures;
pub mod stub;

pub use stub::{StubGbif, StubResponse};
