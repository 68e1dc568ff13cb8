//! fhir-intake-core: FHIR R4 types and validation for the intake gateway
//!
//! This crate provides the typed Observation view and its validator,
//! the Bundle shape fetched from the upstream store, OperationOutcome
//! and the gateway's CapabilityStatement.

pub mod bundle;
pub mod capability;
pub mod error;
pub mod observation;
pub mod outcome;

pub use bundle::{Bundle, BundleEntry, BundleLink, BundleType, is_valid_id};
pub use capability::CapabilityStatement;
pub use error::ValidationError;
pub use observation::{
    CodeableConcept, Coding, Observation, ObservationComponent, Quantity, Reference,
    new_resource_id, validate,
};
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
