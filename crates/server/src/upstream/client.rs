//! HTTP client for the upstream FHIR store (HAPI or compatible)

use std::time::Duration;

use fhir_intake_core::{Bundle, Observation};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use thiserror::Error;

const FHIR_JSON: &str = "application/fhir+json";

/// Failure talking to the upstream store
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("FHIR server responded with status {0}")]
    NotOk(StatusCode),

    #[error("FHIR server unreachable: {0}")]
    Unreachable(String),

    #[error("FHIR server returned a malformed body: {0}")]
    MalformedBody(String),
}

/// Identifier the upstream store assigned to a submitted resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptId(pub String);

/// Only the id is read back from a create response
#[derive(Deserialize)]
struct CreatedResource {
    id: Option<String>,
}

/// Client for the upstream FHIR store
#[derive(Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl FhirClient {
    /// Create a client for the store at `base_url` (e.g. `http://localhost:8080/fhir`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET {base}/Bundle/{id}
    pub async fn fetch_bundle(&self, id: &str) -> Result<Bundle, UpstreamError> {
        let url = format!("{}/Bundle/{}", self.base_url, id);
        tracing::debug!(url = %url, "Fetching bundle from FHIR server");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, FHIR_JSON)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(UpstreamError::NotOk(response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        Bundle::from_json(&body).map_err(UpstreamError::MalformedBody)
    }

    /// POST {base}/Observation, returning the id the store assigned
    pub async fn submit_observation(
        &self,
        observation: &Observation,
    ) -> Result<ReceiptId, UpstreamError> {
        let url = format!("{}/Observation", self.base_url);

        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, FHIR_JSON)
            .header(header::ACCEPT, FHIR_JSON)
            .timeout(self.timeout)
            .json(observation)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::NotOk(status));
        }

        let location_id = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(id_from_location);

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body_id = if body.is_empty() {
            None
        } else {
            serde_json::from_slice::<CreatedResource>(&body)
                .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?
                .id
        };

        body_id
            .or(location_id)
            .map(ReceiptId)
            .ok_or_else(|| {
                UpstreamError::MalformedBody("no id in response body or Location header".into())
            })
    }

    /// Summarize a transport failure; the full error (with the upstream URL)
    /// only goes to the log.
    fn transport_error(&self, err: reqwest::Error) -> UpstreamError {
        tracing::warn!(error = %err, "FHIR server request failed");

        let cause = if err.is_timeout() {
            format!("request timed out after {} ms", self.timeout.as_millis())
        } else if err.is_connect() {
            "connection failed".to_string()
        } else if err.is_body() || err.is_decode() {
            "response body could not be read".to_string()
        } else {
            "request failed".to_string()
        };
        UpstreamError::Unreachable(cause)
    }
}

/// Extract the logical id from `.../Observation/{id}[/_history/{vid}]`
fn id_from_location(location: &str) -> Option<String> {
    let mut segments = location.trim_end_matches('/').rsplit('/');
    let last = segments.next()?;
    let id = if segments.next() == Some("_history") {
        segments.next()?
    } else {
        last
    };
    (!id.is_empty()).then(|| id.to_string())
}
