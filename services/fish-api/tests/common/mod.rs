//! Shared helpers for fish-api integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request};
use axum::Router;
use serde_json::Value;

use fish_api::server::build_router;
use fish_api::state::AppState;
use fish_common::TaxonKey;
use gbif_client::{Endpoint, GbifError, GbifResult, OccurrenceSource, SpeciesLookup};
use storage::MemoryLogStore;

/// How the fake upstream answers.
#[derive(Clone)]
pub enum Upstream {
    /// Resolve to the key and return these occurrence records.
    Found { key: u64, records: Vec<Value> },
    /// Species search returns no results.
    NotFound,
    /// Species search fails with an HTTP status.
    SpeciesStatus(u16),
    /// Occurrence search times out.
    OccurrenceTimeout { key: u64 },
}

/// In-process stand-in for the GBIF APIs.
pub struct FakeGbif {
    upstream: Upstream,
    delay: Duration,
    species_calls: AtomicUsize,
    occurrence_calls: AtomicUsize,
}

impl FakeGbif {
    pub fn new(upstream: Upstream) -> Arc<Self> {
        Self::slow(upstream, Duration::ZERO)
    }

    /// Like `new`, but the species search waits `delay` before answering.
    pub fn slow(upstream: Upstream, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            upstream,
            delay,
            species_calls: AtomicUsize::new(0),
            occurrence_calls: AtomicUsize::new(0),
        })
    }

    pub fn species_calls(&self) -> usize {
        self.species_calls.load(Ordering::SeqCst)
    }

    pub fn occurrence_calls(&self) -> usize {
        self.occurrence_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeciesLookup for FakeGbif {
    async fn resolve_taxon(&self, _name: &str) -> GbifResult<Option<TaxonKey>> {
        self.species_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.upstream {
            Upstream::Found { key, .. } | Upstream::OccurrenceTimeout { key } => {
                Ok(Some(TaxonKey(*key)))
            }
            Upstream::NotFound => Ok(None),
            Upstream::SpeciesStatus(status) => Err(GbifError::Status {
                endpoint: Endpoint::Species,
                status: *status,
            }),
        }
    }
}

#[async_trait]
impl OccurrenceSource for FakeGbif {
    async fn fetch_occurrences(&self, _key: TaxonKey) -> GbifResult<Vec<Value>> {
        self.occurrence_calls.fetch_add(1, Ordering::SeqCst);
        match &self.upstream {
            Upstream::Found { records, .. } => Ok(records.clone()),
            Upstream::OccurrenceTimeout { .. } => Err(GbifError::Timeout {
                endpoint: Endpoint::Occurrence,
            }),
            _ => panic!("occurrences requested without a taxon key"),
        }
    }
}

/// Router over a fake upstream and the given log store.
pub fn make_app(gbif: Arc<FakeGbif>, store: MemoryLogStore) -> Router {
    let state = AppState::new(gbif.clone(), gbif, Arc::new(store));
    build_router(Arc::new(state))
}

pub fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    to_bytes(resp.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

pub async fn body_text(resp: axum::response::Response) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}
