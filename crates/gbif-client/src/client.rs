//! HTTP client for the GBIF search endpoints.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use fish_common::TaxonKey;

use crate::error::{Endpoint, GbifError, GbifResult};
use crate::parse::{parse_occurrences, parse_taxon_key};

/// Resolves species names to taxon keys.
#[async_trait]
pub trait SpeciesLookup: Send + Sync {
    /// `Ok(None)` when the search has no results.
    async fn resolve_taxon(&self, name: &str) -> GbifResult<Option<TaxonKey>>;
}

/// Fetches occurrence records for a taxon.
#[async_trait]
pub trait OccurrenceSource: Send + Sync {
    async fn fetch_occurrences(&self, key: TaxonKey) -> GbifResult<Vec<Value>>;
}

/// Configuration for the GBIF client.
#[derive(Debug, Clone)]
pub struct GbifConfig {
    /// Species search endpoint
    pub species_url: String,
    /// Occurrence search endpoint
    pub occurrence_url: String,
    /// Maximum occurrence records requested per taxon
    pub occurrence_limit: u32,
    /// Whole-request timeout for each call
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for GbifConfig {
    fn default() -> Self {
        Self {
            species_url: "https://api.gbif.org/v1/species".to_string(),
            occurrence_url: "https://api.gbif.org/v1/occurrence/search".to_string(),
            occurrence_limit: 300,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Single-attempt client for species and occurrence search.
pub struct GbifClient {
    client: Client,
    config: GbifConfig,
}

impl GbifClient {
    /// Create a new client. Endpoint URLs are validated up front.
    pub fn new(config: GbifConfig) -> GbifResult<Self> {
        parse_endpoint(&config.species_url, Endpoint::Species)?;
        parse_endpoint(&config.occurrence_url, Endpoint::Occurrence)?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GbifError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Species search URL for a name.
    pub fn species_query_url(&self, name: &str) -> GbifResult<Url> {
        let mut url = parse_endpoint(&self.config.species_url, Endpoint::Species)?;
        url.query_pairs_mut().append_pair("name", name);

        // Form encoding writes spaces as '+'. A literal '+' is already %2B,
        // so every remaining '+' is a space.
        let query = url.query().map(|q| q.replace('+', "%20"));
        url.set_query(query.as_deref());
        Ok(url)
    }

    /// Occurrence search URL for a taxon key.
    pub fn occurrence_query_url(&self, key: TaxonKey) -> GbifResult<Url> {
        let mut url = parse_endpoint(&self.config.occurrence_url, Endpoint::Occurrence)?;
        url.query_pairs_mut()
            .append_pair("taxonKey", &key.to_string())
            .append_pair("limit", &self.config.occurrence_limit.to_string());
        Ok(url)
    }

    async fn get_json(&self, url: Url, endpoint: Endpoint) -> GbifResult<Value> {
        debug!(url = %url, "GBIF request");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GbifError::from_reqwest(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GbifError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GbifError::from_reqwest(endpoint, e))?;

        serde_json::from_slice(&body).map_err(|e| GbifError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl SpeciesLookup for GbifClient {
    #[instrument(skip(self))]
    async fn resolve_taxon(&self, name: &str) -> GbifResult<Option<TaxonKey>> {
        let url = self.species_query_url(name)?;
        let body = self.get_json(url, Endpoint::Species).await?;
        parse_taxon_key(&body)
    }
}

#[async_trait]
impl OccurrenceSource for GbifClient {
    #[instrument(skip(self))]
    async fn fetch_occurrences(&self, key: TaxonKey) -> GbifResult<Vec<Value>> {
        let url = self.occurrence_query_url(key)?;
        let body = self.get_json(url, Endpoint::Occurrence).await?;
        let records = parse_occurrences(body)?;
        debug!(count = records.len(), "Fetched occurrences");
        Ok(records)
    }
}

fn parse_endpoint(raw: &str, endpoint: Endpoint) -> GbifResult<Url> {
    Url::parse(raw).map_err(|e| GbifError::InvalidUrl {
        endpoint,
        message: format!("{}: {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GbifClient {
        GbifClient::new(GbifConfig::default()).unwrap()
    }

    #[test]
    fn test_species_url_encodes_spaces_as_percent_20() {
        let url = client().species_query_url("Atlantic Salmon").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.gbif.org/v1/species?name=Atlantic%20Salmon"
        );
    }

    #[test]
    fn test_species_url_escapes_query_metacharacters() {
        let url = client().species_query_url("a&b=c+d").unwrap();
        assert_eq!(url.query(), Some("name=a%26b%3Dc%2Bd"));
    }

    #[test]
    fn test_occurrence_url_carries_limit() {
        let url = client().occurrence_query_url(TaxonKey(212)).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.gbif.org/v1/occurrence/search?taxonKey=212&limit=300"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let config = GbifConfig {
            species_url: "not a url".to_string(),
            ..GbifConfig::default()
        };
        assert!(matches!(
            GbifClient::new(config),
            Err(GbifError::InvalidUrl {
                endpoint: Endpoint::Species,
                ..
            })
        ));
    }
}
