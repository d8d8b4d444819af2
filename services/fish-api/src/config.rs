//! Service configuration loading and types.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use gbif_client::GbifConfig;

/// Service configuration loaded from YAML with environment overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Upstream GBIF endpoints and timeouts.
    #[serde(default)]
    pub gbif: GbifSettings,

    /// Where request logs are kept.
    #[serde(default)]
    pub log_store: LogStoreSettings,
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Config file {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse: {:?}", path))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.log_store.database_url = Some(url);
        }
        if let Some(backend) = lookup("LOG_STORE_BACKEND") {
            self.log_store.backend = backend.parse()?;
        }
        if let Some(url) = lookup("GBIF_SPECIES_URL") {
            self.gbif.species_url = url;
        }
        if let Some(url) = lookup("GBIF_OCCURRENCE_URL") {
            self.gbif.occurrence_url = url;
        }
        if let Some(secs) = lookup("GBIF_TIMEOUT_SECS") {
            self.gbif.request_timeout_secs = secs
                .parse()
                .with_context(|| format!("Invalid GBIF_TIMEOUT_SECS: {}", secs))?;
        }
        Ok(())
    }

    /// Check settings that cannot be caught by deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.log_store.backend == LogStoreBackend::Postgres
            && self.log_store.database_url.as_deref().map_or(true, str::is_empty)
        {
            bail!("The postgres log store requires DATABASE_URL or log_store.database_url");
        }
        if self.gbif.occurrence_limit == 0 {
            bail!("gbif.occurrence_limit must be greater than zero");
        }
        if self.gbif.request_timeout_secs == 0 || self.gbif.connect_timeout_secs == 0 {
            bail!("GBIF timeouts must be greater than zero");
        }
        if self.log_store.connect_timeout_secs == 0 {
            bail!("log_store.connect_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// GBIF client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbifSettings {
    #[serde(default = "default_species_url")]
    pub species_url: String,

    #[serde(default = "default_occurrence_url")]
    pub occurrence_url: String,

    /// Occurrence records requested per taxon.
    #[serde(default = "default_occurrence_limit")]
    pub occurrence_limit: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for GbifSettings {
    fn default() -> Self {
        Self {
            species_url: default_species_url(),
            occurrence_url: default_occurrence_url(),
            occurrence_limit: default_occurrence_limit(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl GbifSettings {
    pub fn to_client_config(&self) -> GbifConfig {
        GbifConfig {
            species_url: self.species_url.clone(),
            occurrence_url: self.occurrence_url.clone(),
            occurrence_limit: self.occurrence_limit,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Log store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogStoreBackend {
    #[default]
    Postgres,
    /// Process memory; records are lost on restart.
    Memory,
}

impl FromStr for LogStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(LogStoreBackend::Postgres),
            "memory" => Ok(LogStoreBackend::Memory),
            other => bail!("Unknown log store backend: {}", other),
        }
    }
}

/// Log store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStoreSettings {
    #[serde(default)]
    pub backend: LogStoreBackend,

    /// Never given a default; supply it through DATABASE_URL.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_store_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for LogStoreSettings {
    fn default() -> Self {
        Self {
            backend: LogStoreBackend::default(),
            database_url: None,
            connect_timeout_secs: default_store_connect_timeout(),
        }
    }
}

fn default_species_url() -> String {
    "https://api.gbif.org/v1/species".to_string()
}

fn default_occurrence_url() -> String {
    "https://api.gbif.org/v1/occurrence/search".to_string()
}

fn default_occurrence_limit() -> u32 {
    300
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_store_connect_timeout() -> u64 {
    5
}
