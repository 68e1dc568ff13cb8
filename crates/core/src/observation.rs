//! Observation resource (hemogram results) and its intake validator

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use crate::error::ValidationError;

/// Coding from a terminology system (LOINC for blood counts)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Coded concept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Reference to another resource, e.g. `Patient/123`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Measured amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One analyte of a panel (hemoglobin, leukocytes, platelets...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Typed view of an inbound Observation.
///
/// Only `resourceType`, `status` and `code` are required. Fields this view
/// does not model are kept in `extra` so the resource serializes back
/// unchanged when forwarded upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub status: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,

    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Observation {
    /// Human-readable label of the observed concept for logs
    pub fn display_code(&self) -> Option<&str> {
        let coding = self.code.coding.first();
        coding
            .and_then(|c| c.display.as_deref().or(c.code.as_deref()))
            .or(self.code.text.as_deref())
    }
}

/// Validate an inbound payload and return its typed Observation view
pub fn validate(payload: &JsonValue) -> Result<Observation, ValidationError> {
    let object = payload.as_object().ok_or_else(|| {
        ValidationError::InvalidStructure("resource must be a JSON object".to_string())
    })?;

    match object.get("resourceType") {
        Some(JsonValue::String(t)) if t == "Observation" => {}
        Some(JsonValue::String(t)) => {
            return Err(ValidationError::WrongResourceType(Some(t.clone())));
        }
        _ => return Err(ValidationError::WrongResourceType(None)),
    }

    for field in ["status", "code"] {
        if object.get(field).is_none_or(JsonValue::is_null) {
            return Err(ValidationError::MissingField(field));
        }
    }

    Observation::deserialize(payload)
        .map_err(|e| ValidationError::InvalidStructure(e.to_string()))
}

/// Opaque identifier for resources submitted without an `id`
pub fn new_resource_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cbc_panel() -> JsonValue {
        json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {
                "coding": [{"system": "http://loinc.org", "code": "58410-2", "display": "CBC panel"}]
            }
        })
    }

    #[test]
    fn accepts_minimal_observation() {
        let obs = validate(&cbc_panel()).unwrap();
        assert_eq!(obs.status, "final");
        assert_eq!(obs.id, None);
        assert_eq!(obs.display_code(), Some("CBC panel"));
        assert!(obs.component.is_empty());
    }

    #[test]
    fn accepts_full_hemogram() {
        let payload = json!({
            "resourceType": "Observation",
            "id": "hemo-1",
            "status": "final",
            "category": [{"coding": [{"system": "http://terminology.hl7.org/CodeSystem/observation-category", "code": "laboratory"}]}],
            "code": {"coding": [{"system": "http://loinc.org", "code": "58410-2"}]},
            "subject": {"reference": "Patient/123"},
            "effectiveDateTime": "2025-06-01T10:00:00Z",
            "component": [
                {
                    "code": {"coding": [{"system": "http://loinc.org", "code": "718-7", "display": "Hemoglobin"}]},
                    "valueQuantity": {"value": 13.5, "unit": "g/dL", "system": "http://unitsofmeasure.org", "code": "g/dL"},
                    "referenceRange": [{"low": {"value": 12.0, "unit": "g/dL"}}]
                },
                {
                    "code": {"coding": [{"system": "http://loinc.org", "code": "777-3", "display": "Platelets"}]}
                }
            ],
            "issued": "2025-06-01T11:00:00Z"
        });

        let obs = validate(&payload).unwrap();
        assert_eq!(obs.id.as_deref(), Some("hemo-1"));
        assert_eq!(obs.component.len(), 2);
        assert_eq!(
            obs.component[0].value_quantity.as_ref().and_then(|q| q.value),
            Some(13.5)
        );
        assert_eq!(obs.display_code(), Some("58410-2"));

        // Unmodelled fields survive a round trip.
        let back = serde_json::to_value(&obs).unwrap();
        assert_eq!(back["issued"], "2025-06-01T11:00:00Z");
        assert_eq!(back["subject"]["reference"], "Patient/123");
        assert_eq!(back["component"][0]["referenceRange"][0]["low"]["value"], 12.0);
    }

    #[test]
    fn rejects_wrong_resource_type() {
        let err = validate(&json!({"resourceType": "Patient", "status": "final", "code": {}}))
            .unwrap_err();
        assert_eq!(err, ValidationError::WrongResourceType(Some("Patient".into())));

        let err = validate(&json!({"status": "final"})).unwrap_err();
        assert_eq!(err, ValidationError::WrongResourceType(None));
        assert_eq!(
            err.to_string(),
            "Invalid resource type. Expected Observation, got nothing"
        );
    }

    #[test]
    fn rejects_missing_fields() {
        let mut payload = cbc_panel();
        payload.as_object_mut().unwrap().remove("status");
        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::MissingField("status")
        );

        let mut payload = cbc_panel();
        payload["code"] = JsonValue::Null;
        assert_eq!(
            validate(&payload).unwrap_err(),
            ValidationError::MissingField("code")
        );
    }

    #[test]
    fn rejects_misshapen_fields() {
        let mut payload = cbc_panel();
        payload["code"] = json!("58410-2");
        assert!(matches!(
            validate(&payload),
            Err(ValidationError::InvalidStructure(_))
        ));

        assert!(matches!(
            validate(&json!(["Observation"])),
            Err(ValidationError::InvalidStructure(_))
        ));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = new_resource_id();
        let b = new_resource_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
