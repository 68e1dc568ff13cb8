use serde::{Deserialize, Serialize};

/// Severity of the issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

/// Type of issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Invalid,
    Structure,
    Required,
    Value,
    Processing,
    NotSupported,
    NotFound,
    Transient,
    Exception,
    Timeout,
    Throttled,
    Informational,
}

/// A single issue reported inside an OperationOutcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcomeIssue {
    pub severity: IssueSeverity,
    pub code: IssueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// FHIR OperationOutcome resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    pub issue: Vec<OperationOutcomeIssue>,
}

impl OperationOutcome {
    fn single(severity: IssueSeverity, code: IssueType, diagnostics: &str) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            issue: vec![OperationOutcomeIssue {
                severity,
                code,
                diagnostics: Some(diagnostics.to_string()),
            }],
        }
    }

    /// Informational outcome for a successfully handled operation
    pub fn information(diagnostics: &str) -> Self {
        Self::single(
            IssueSeverity::Information,
            IssueType::Informational,
            diagnostics,
        )
    }

    /// Error outcome with an explicit issue type
    pub fn error(code: IssueType, diagnostics: &str) -> Self {
        Self::single(IssueSeverity::Error, code, diagnostics)
    }

    /// Error outcome for content that failed basic checks
    pub fn invalid(diagnostics: &str) -> Self {
        Self::error(IssueType::Invalid, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn information_serializes_as_fhir() {
        let outcome = OperationOutcome::information("Bundle abc received");
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(
            value,
            json!({
                "resourceType": "OperationOutcome",
                "issue": [{
                    "severity": "information",
                    "code": "informational",
                    "diagnostics": "Bundle abc received"
                }]
            })
        );
    }

    #[test]
    fn kebab_case_issue_codes() {
        let outcome = OperationOutcome::error(IssueType::NotSupported, "nope");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["issue"][0]["severity"], "error");
        assert_eq!(value["issue"][0]["code"], "not-supported");
    }
}
