//! Service index and capability statement

use axum::Json;
use fhir_intake_core::CapabilityStatement;
use serde_json::{Value as JsonValue, json};

/// GET / - Describe the service and its endpoints
pub async fn root() -> Json<JsonValue> {
    Json(json!({
        "message": "Receptor FHIR ativo.",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /fhir/observation": "Recebe hemogramas (Observation FHIR)",
            "PUT /fhir-webhook/Bundle/{id}": "Notificação de Bundle do servidor FHIR",
            "GET /health": "Verificação de saúde",
            "GET /metadata": "CapabilityStatement",
            "GET /": "Status do servidor"
        }
    }))
}

/// GET /metadata - Return the gateway capability statement
pub async fn metadata() -> Json<CapabilityStatement> {
    Json(CapabilityStatement::new())
}
