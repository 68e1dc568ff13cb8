use thiserror::Error;

/// Reasons an inbound resource is rejected before acceptance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Invalid resource type. Expected Observation, got {}", .0.as_deref().unwrap_or("nothing"))]
    WrongResourceType(Option<String>),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid resource structure: {0}")]
    InvalidStructure(String),
}
