//! Application state for the fish distribution service.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use gbif_client::{GbifClient, OccurrenceSource, SpeciesLookup};
use storage::{LogStore, MemoryLogStore, PgLogStore};

use crate::config::{LogStoreBackend, ServiceConfig};
use crate::pipeline::DistributionService;

/// Shared application state.
pub struct AppState {
    /// Distribution request pipeline.
    pub distribution: DistributionService,

    /// Log store, also read by the dashboard.
    pub log_store: Arc<dyn LogStore>,

    /// Prometheus exporter handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        species: Arc<dyn SpeciesLookup>,
        occurrences: Arc<dyn OccurrenceSource>,
        log_store: Arc<dyn LogStore>,
    ) -> Self {
        Self {
            distribution: DistributionService::new(species, occurrences, Arc::clone(&log_store)),
            log_store,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Build state from configuration.
    ///
    /// The log table is created if possible; an unreachable database only
    /// produces a warning since logging is best-effort.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let gbif = Arc::new(
            GbifClient::new(config.gbif.to_client_config())
                .context("Failed to create GBIF client")?,
        );

        let log_store: Arc<dyn LogStore> = match config.log_store.backend {
            LogStoreBackend::Memory => {
                warn!("Using in-memory log store; logs are lost on restart");
                Arc::new(MemoryLogStore::new())
            }
            LogStoreBackend::Postgres => {
                let database_url = config
                    .log_store
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is not set")?;
                let store = PgLogStore::new(
                    database_url,
                    Duration::from_secs(config.log_store.connect_timeout_secs),
                )?;

                match store.migrate().await {
                    Ok(()) => info!("Log store schema ready"),
                    Err(e) => warn!(error = %e, "Could not prepare log store schema, continuing"),
                }
                Arc::new(store)
            }
        };

        info!(
            species_url = %config.gbif.species_url,
            occurrence_url = %config.gbif.occurrence_url,
            log_store = log_store.backend_name(),
            "Application state initialized"
        );

        Ok(Self::new(gbif.clone(), gbif, log_store))
    }
}
