//! Distribution request pipeline.
//!
//! A request moves through these stages:
//!
//! ```text
//! Received -> NameValidated -> TaxonResolved -> OccurrencesFetched -> Rendered -> Responded
//!     \_____________\_______________\__________________\________________\_______> Failed
//! ```
//!
//! Every request that gets past name validation produces exactly one log
//! record, unless the log store cannot be reached at all.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use fish_common::{DistributionResponse, FishError, FishResult, LogRecord, LogStatus};
use gbif_client::{OccurrenceSource, SpeciesLookup};
use storage::{append_log, LogCollection, LogStore};

use crate::rendering::render_map_html;

/// Message stored for successful requests.
pub const SUCCESS_MESSAGE: &str = "Data fetched successfully";

/// Stage of a distribution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    NameValidated,
    TaxonResolved,
    OccurrencesFetched,
    Rendered,
    Responded,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::NameValidated => "name_validated",
            Stage::TaxonResolved => "taxon_resolved",
            Stage::OccurrencesFetched => "occurrences_fetched",
            Stage::Rendered => "rendered",
            Stage::Responded => "responded",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fish name from the request path, if it has any content.
pub fn validate_fish_name(raw: Option<&str>) -> FishResult<&str> {
    match raw {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(FishError::MissingFishName),
    }
}

/// Resolves, fetches, renders and logs distribution requests.
#[derive(Clone)]
pub struct DistributionService {
    species: Arc<dyn SpeciesLookup>,
    occurrences: Arc<dyn OccurrenceSource>,
    log_store: Arc<dyn LogStore>,
}

impl DistributionService {
    pub fn new(
        species: Arc<dyn SpeciesLookup>,
        occurrences: Arc<dyn OccurrenceSource>,
        log_store: Arc<dyn LogStore>,
    ) -> Self {
        Self {
            species,
            occurrences,
            log_store,
        }
    }

    /// Handle one request for the raw path parameter.
    ///
    /// Past validation the work runs on its own task, so the log record is
    /// still written when the caller stops waiting.
    pub async fn handle(&self, raw_name: Option<&str>) -> FishResult<DistributionResponse> {
        let fish_name = match validate_fish_name(raw_name) {
            Ok(name) => name.to_string(),
            Err(e) => {
                counter!("fish_distribution_requests_total", "outcome" => "invalid").increment(1);
                debug!(stage = %Stage::Received, "Rejected request without fish name");
                return Err(e);
            }
        };

        let request_id = Uuid::new_v4();
        let span = info_span!("fish_distribution", request_id = %request_id, fish_name = %fish_name);
        let service = self.clone();
        let task = tokio::spawn(
            async move { service.handle_validated(&fish_name).await }.instrument(span),
        );

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                counter!("fish_distribution_requests_total", "outcome" => "error").increment(1);
                error!(request_id = %request_id, error = %e, "Distribution task did not complete");
                Err(FishError::Internal(e.to_string()))
            }
        }
    }

    async fn handle_validated(&self, fish_name: &str) -> FishResult<DistributionResponse> {
        let started_at = Utc::now();
        let timer = Instant::now();

        let mut collection = self.open_log_collection().await;

        let mut stage = Stage::NameValidated;
        let outcome = self.run_stages(fish_name, &mut stage).await;

        let ended_at = Utc::now();
        let record = match &outcome {
            Ok(_) => LogRecord::new(
                fish_name,
                LogStatus::Success,
                SUCCESS_MESSAGE,
                200,
                Some(started_at),
                Some(ended_at),
            ),
            Err(e) => LogRecord::new(
                fish_name,
                LogStatus::Failure,
                e.log_message(),
                e.http_status_code(),
                Some(started_at),
                Some(ended_at),
            ),
        };
        let response_code = record.response_code;

        // Logging is best-effort; append_log has already reported any problem.
        let _ = append_log(collection.as_mut(), record).await;
        if let Some(collection) = collection.as_mut() {
            collection.close().await;
        }

        histogram!("fish_distribution_duration_seconds").record(timer.elapsed().as_secs_f64());
        match &outcome {
            Ok(response) => {
                counter!("fish_distribution_requests_total", "outcome" => "success").increment(1);
                info!(
                    stage = %Stage::Responded,
                    response_code,
                    records = response.distribution_data.len(),
                    "Distribution request completed"
                );
            }
            Err(e) => {
                let outcome_label = if response_code == 404 { "not_found" } else { "error" };
                counter!("fish_distribution_requests_total", "outcome" => outcome_label).increment(1);
                if response_code == 404 {
                    info!(stage = %Stage::Failed, failed_after = %stage, response_code, "No taxon found");
                } else {
                    error!(stage = %Stage::Failed, failed_after = %stage, response_code, error = %e, "Distribution request failed");
                }
            }
        }

        outcome
    }

    async fn open_log_collection(&self) -> Option<Box<dyn LogCollection>> {
        match self.log_store.open().await {
            Ok(collection) => Some(collection),
            Err(e) => {
                warn!(
                    backend = self.log_store.backend_name(),
                    error = %e,
                    "Log store unavailable, request will not be logged"
                );
                None
            }
        }
    }

    async fn run_stages(
        &self,
        fish_name: &str,
        stage: &mut Stage,
    ) -> FishResult<DistributionResponse> {
        let key = self
            .species
            .resolve_taxon(fish_name)
            .await?
            .ok_or_else(|| FishError::TaxonNotFound(fish_name.to_string()))?;
        *stage = Stage::TaxonResolved;
        debug!(stage = %stage, taxon_key = %key, "Resolved taxon");

        let records = self.occurrences.fetch_occurrences(key).await?;
        *stage = Stage::OccurrencesFetched;
        debug!(stage = %stage, records = records.len(), "Fetched occurrences");

        let map_html = render_map_html(&records, fish_name)?;
        *stage = Stage::Rendered;
        debug!(stage = %stage, "Rendered map");

        Ok(DistributionResponse {
            fish_name: fish_name.to_string(),
            distribution_data: records,
            map_html,
        })
    }
}
