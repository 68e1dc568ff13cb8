pub mod health;
pub mod index;
pub mod metrics;
mod observation;
mod webhook;

use axum::{
    Router,
    routing::{post, put},
};

use crate::AppState;

/// Build intake routes: Observation submission and the Bundle webhook
pub fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/fhir/observation", post(observation::submit))
        .route("/fhir-webhook/Bundle/{id}", put(webhook::notify_bundle))
}
