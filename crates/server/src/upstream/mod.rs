//! Client for the upstream FHIR store

mod client;

pub use client::{FhirClient, ReceiptId, UpstreamError};
