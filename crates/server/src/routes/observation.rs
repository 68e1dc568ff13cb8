//! Observation (hemogram) intake handler

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use fhir_intake_core::{ValidationError, new_resource_id, validate};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::AppState;
use crate::error::AppError;

/// Acknowledgement for an accepted Observation
#[derive(Serialize)]
pub struct SubmitResponse {
    message: String,
    id: String,
}

/// POST /fhir/observation - Accept a hemogram Observation
///
/// The payload is validated and logged, and the submitted id is echoed back.
/// With forwarding enabled the resource is also created on the upstream store;
/// an Observation submitted without an id is acknowledged with the id the
/// store assigned, otherwise with a freshly generated one.
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(payload) = body.map_err(|e| ValidationError::MalformedJson(e.body_text()))?;

    let observation = validate(&payload).inspect_err(|e| {
        metrics::counter!("observations_received_total", "outcome" => "rejected").increment(1);
        tracing::warn!(error = %e, "Observation rejected");
    })?;

    tracing::info!(
        observation_id = observation.id.as_deref().unwrap_or("-"),
        status = %observation.status,
        code = observation.display_code().unwrap_or("-"),
        components = observation.component.len(),
        resource = %payload,
        "Hemograma recebido"
    );

    let id = if state.forward_observations {
        let receipt = state
            .upstream
            .submit_observation(&observation)
            .await
            .inspect_err(|e| {
                metrics::counter!("observations_received_total", "outcome" => "forward_failed")
                    .increment(1);
                tracing::error!(error = %e, "Failed to forward Observation to FHIR server");
            })?;
        tracing::info!(
            observation_id = observation.id.as_deref().unwrap_or("-"),
            receipt_id = %receipt.0,
            "Observation stored on FHIR server"
        );
        observation.id.clone().unwrap_or(receipt.0)
    } else {
        observation.id.clone().unwrap_or_else(new_resource_id)
    };

    metrics::counter!("observations_received_total", "outcome" => "accepted").increment(1);

    Ok(Json(SubmitResponse {
        message: "Hemograma recebido com sucesso".to_string(),
        id,
    }))
}
