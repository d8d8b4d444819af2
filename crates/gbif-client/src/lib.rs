//! Client for the GBIF species and occurrence search APIs.
//!
//! Two lookups are exposed behind traits so the HTTP service can be tested
//! without network access:
//! - [`SpeciesLookup`] resolves a species name to a [`TaxonKey`]
//! - [`OccurrenceSource`] fetches raw occurrence records for a key
//!
//! [`TaxonKey`]: fish_common::TaxonKey

pub mod client;
pub mod error;
pub mod parse;

pub use client::{GbifClient, GbifConfig, OccurrenceSource, SpeciesLookup};
pub use error::{Endpoint, GbifError, GbifResult};
pub use parse::{parse_occurrences, parse_taxon_key};
