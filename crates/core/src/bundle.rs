use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    History,
    Searchset,
    Collection,
    SubscriptionNotification,
}

/// FHIR Bundle resource as returned by the upstream store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

/// Bundle link (self, next, previous)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// A single entry of a Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<JsonValue>,
}

impl Bundle {
    /// Parse a Bundle from a raw response body.
    ///
    /// Fails when the body is not JSON, lacks the Bundle shape, or declares
    /// a different `resourceType`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let bundle: Bundle = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        if bundle.resource_type != "Bundle" {
            return Err(format!(
                "expected resourceType 'Bundle', got '{}'",
                bundle.resource_type
            ));
        }
        Ok(bundle)
    }

    /// Resource types carried by the entries, in entry order
    pub fn entry_resource_types(&self) -> Vec<&str> {
        self.entry
            .iter()
            .filter_map(|e| e.resource.as_ref())
            .filter_map(|r| r.get("resourceType").and_then(|t| t.as_str()))
            .collect()
    }
}

/// Check a logical id against the FHIR id rule `[A-Za-z0-9\-\.]{1,64}`.
///
/// Dot-only ids (`.`, `..`) are rejected too: they would resolve as path
/// segments once joined into an upstream URL.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
        && !id.bytes().all(|b| b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upstream_bundle() {
        let body = br#"{
            "resourceType": "Bundle",
            "id": "abc123",
            "type": "transaction-response",
            "entry": [
                {"fullUrl": "Observation/1", "resource": {"resourceType": "Observation"}},
                {"response": {"status": "201 Created"}}
            ]
        }"#;

        let bundle = Bundle::from_json(body).unwrap();
        assert_eq!(bundle.id.as_deref(), Some("abc123"));
        assert_eq!(bundle.bundle_type, BundleType::TransactionResponse);
        assert_eq!(bundle.entry.len(), 2);
        assert_eq!(bundle.entry_resource_types(), vec!["Observation"]);
    }

    #[test]
    fn rejects_other_resource_types() {
        let body = br#"{"resourceType": "Patient", "type": "collection"}"#;
        assert!(Bundle::from_json(body).is_err());
    }

    #[test]
    fn rejects_non_json() {
        assert!(Bundle::from_json(b"<html>oops</html>").is_err());
        assert!(Bundle::from_json(br#"{"resourceType": "Bundle"}"#).is_err());
    }

    #[test]
    fn id_rule() {
        assert!(is_valid_id("abc123"));
        assert!(is_valid_id("a-b.c"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../metadata"));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id(&"x".repeat(65)));
    }

    #[test]
    fn dot_segments_are_not_ids() {
        assert!(!is_valid_id("."));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("..."));
        assert!(is_valid_id(".a"));
        assert!(is_valid_id("v1.2"));
    }
}
