use chrono::Utc;
use serde::{Deserialize, Serialize};

/// FHIR CapabilityStatement resource (simplified)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatement {
    pub resource_type: String,
    pub status: String,
    pub date: String,
    pub kind: String,
    pub fhir_version: String,
    pub format: Vec<String>,
    pub rest: Vec<CapabilityRest>,
}

impl CapabilityStatement {
    /// Capability statement for the intake gateway
    pub fn new() -> Self {
        Self {
            resource_type: "CapabilityStatement".to_string(),
            status: "active".to_string(),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            kind: "instance".to_string(),
            fhir_version: "4.0.1".to_string(),
            format: vec!["json".to_string()],
            rest: vec![CapabilityRest::default()],
        }
    }
}

impl Default for CapabilityStatement {
    fn default() -> Self {
        Self::new()
    }
}

/// REST capability declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRest {
    pub mode: String,
    pub resource: Vec<CapabilityResource>,
}

impl Default for CapabilityRest {
    fn default() -> Self {
        Self {
            mode: "server".to_string(),
            resource: vec![CapabilityResource::observation(), CapabilityResource::bundle()],
        }
    }
}

/// Per-resource capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub interaction: Vec<CapabilityInteraction>,
}

/// Supported interaction code (create, update...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityInteraction {
    pub code: String,
}

impl CapabilityResource {
    fn with(resource_type: &str, interactions: &[&str]) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            interaction: interactions
                .iter()
                .map(|code| CapabilityInteraction {
                    code: code.to_string(),
                })
                .collect(),
        }
    }

    /// Observations are only accepted, never read back
    pub fn observation() -> Self {
        Self::with("Observation", &["create"])
    }

    /// Bundles arrive as webhook notifications
    pub fn bundle() -> Self {
        Self::with("Bundle", &["update"])
    }
}
