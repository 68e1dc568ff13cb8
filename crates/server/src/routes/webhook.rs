//! Bundle webhook handler

use axum::{
    Json,
    extract::{Path, State},
};
use fhir_intake_core::{OperationOutcome, is_valid_id};

use crate::AppState;
use crate::error::AppError;
use crate::upstream::UpstreamError;

/// PUT /fhir-webhook/Bundle/{id} - Fetch the notified Bundle and acknowledge it
pub async fn notify_bundle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OperationOutcome>, AppError> {
    if !is_valid_id(&id) {
        return Err(AppError::BadRequest(format!("Invalid Bundle id '{}'", id)));
    }

    tracing::info!(bundle_id = %id, "Bundle notification received");

    match state.upstream.fetch_bundle(&id).await {
        Ok(bundle) => {
            metrics::counter!("bundle_fetch_total", "outcome" => "ok").increment(1);
            tracing::info!(
                bundle_id = %id,
                bundle_type = ?bundle.bundle_type,
                entries = bundle.entry.len(),
                resources = ?bundle.entry_resource_types(),
                "Bundle fetched from FHIR server"
            );

            let diagnostics = format!(
                "Bundle {} received ({} entries)",
                id,
                bundle.entry.len()
            );
            Ok(Json(OperationOutcome::information(&diagnostics)))
        }
        Err(e) => {
            let outcome = match e {
                UpstreamError::NotOk(_) => "not_ok",
                UpstreamError::Unreachable(_) => "unreachable",
                UpstreamError::MalformedBody(_) => "malformed",
            };
            metrics::counter!("bundle_fetch_total", "outcome" => outcome).increment(1);
            tracing::error!(bundle_id = %id, error = %e, "Bundle fetch failed");
            Err(e.into())
        }
    }
}
