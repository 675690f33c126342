//! Delivery ETA lookup against a distance-matrix provider.
//!
//! The lookup runs synchronously on the request path, so the HTTP client
//! carries a short bounded timeout and every failure maps to a degraded
//! response rather than an error escalation.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EtaConfig;

/// Errors that can occur during an ETA lookup.
#[derive(Debug, Error)]
pub enum EtaError {
    #[error("ETA provider not configured")]
    NotConfigured,

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Provider rejected the request: {0}")]
    ServiceError(String),

    #[error("No route between the given points")]
    NoRoute,

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),
}

/// A successful ETA quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtaQuote {
    pub duration_text: String,
    pub duration_seconds: i64,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<MatrixDuration>,
}

#[derive(Debug, Deserialize)]
struct MatrixDuration {
    text: String,
    value: i64,
}

/// Client for the distance-matrix provider.
#[derive(Clone)]
pub struct EtaService {
    client: Client,
    config: EtaConfig,
}

impl EtaService {
    /// Builds the service; returns `None` when no API key is configured, so
    /// callers can treat the whole feature as absent.
    pub fn from_config(config: &EtaConfig) -> Option<Self> {
        if config.api_key.is_empty() {
            return None;
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;

        Some(Self {
            client,
            config: config.clone(),
        })
    }

    /// Look up the travel time from the customer's position to the
    /// restaurant.
    pub async fn lookup(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<EtaQuote, EtaError> {
        let origins = format!("{},{}", origin.0, origin.1);
        let destinations = format!("{},{}", destination.0, destination.1);

        debug!(origins = %origins, destinations = %destinations, "ETA lookup");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EtaError::Timeout
                } else {
                    EtaError::Http(e)
                }
            })?;

        let body: MatrixResponse = response
            .json()
            .await
            .map_err(|e| EtaError::InvalidResponse(e.to_string()))?;

        if body.status != "OK" {
            warn!(status = %body.status, "ETA provider returned non-OK status");
            return Err(EtaError::ServiceError(body.status));
        }

        let element = body
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or_else(|| EtaError::InvalidResponse("empty matrix".to_string()))?;

        if element.status != "OK" {
            return Err(EtaError::NoRoute);
        }

        let duration = element
            .duration
            .as_ref()
            .ok_or_else(|| EtaError::InvalidResponse("missing duration".to_string()))?;

        Ok(EtaQuote {
            duration_text: duration.text.clone(),
            duration_seconds: duration.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_api_key_is_none() {
        let config = EtaConfig::default();
        assert!(EtaService::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_with_api_key() {
        let config = EtaConfig {
            api_key: "test-key".to_string(),
            ..EtaConfig::default()
        };
        assert!(EtaService::from_config(&config).is_some());
    }

    #[test]
    fn test_matrix_response_parsing() {
        let json = r#"{
            "status": "OK",
            "rows": [{
                "elements": [{
                    "status": "OK",
                    "duration": { "text": "24 mins", "value": 1440 }
                }]
            }]
        }"#;
        let parsed: MatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        let duration = parsed.rows[0].elements[0].duration.as_ref().unwrap();
        assert_eq!(duration.text, "24 mins");
        assert_eq!(duration.value, 1440);
    }

    #[test]
    fn test_matrix_response_parsing_no_route() {
        let json = r#"{
            "status": "OK",
            "rows": [{ "elements": [{ "status": "ZERO_RESULTS", "duration": null }] }]
        }"#;
        let parsed: MatrixResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.rows[0].elements[0].status, "ZERO_RESULTS");
        assert!(parsed.rows[0].elements[0].duration.is_none());
    }

    #[test]
    fn test_matrix_response_tolerates_missing_rows() {
        let parsed: MatrixResponse =
            serde_json::from_str(r#"{ "status": "REQUEST_DENIED" }"#).unwrap();
        assert_eq!(parsed.status, "REQUEST_DENIED");
        assert!(parsed.rows.is_empty());
    }
}
