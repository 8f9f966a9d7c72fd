use crate::severity::ErrorSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full detail of a resolver failure that was hidden from the client.
///
/// The `correlation_id` is the token the client sees, so operators can find the
/// matching report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskedErrorReport {
    pub correlation_id: String,
    pub type_name: String,
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    pub severity: ErrorSeverity,
    pub timestamp: DateTime<Utc>,
}

impl MaskedErrorReport {
    pub fn new(
        correlation_id: impl Into<String>,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            type_name: type_name.into(),
            field_name: field_name.into(),
            path: None,
            message: message.into(),
            causes: Vec::new(),
            stack_trace: None,
            severity: ErrorSeverity::default(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// `Type.field`
    pub fn coordinate(&self) -> String {
        format!("{}.{}", self.type_name, self.field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let report = MaskedErrorReport::new("abc", "Query", "user", "db down")
            .with_path("user.name")
            .with_cause("connection refused")
            .with_severity(ErrorSeverity::Critical);

        assert_eq!(report.coordinate(), "Query.user");
        assert_eq!(report.path.as_deref(), Some("user.name"));
        assert_eq!(report.causes, vec!["connection refused".to_string()]);
        assert!(report.severity.should_alert());
    }

    #[test]
    fn test_serialization_skips_empty() {
        let report = MaskedErrorReport::new("abc", "Query", "user", "db down");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["correlation_id"], "abc");
        assert_eq!(json["severity"], "high");
        assert!(json.get("path").is_none());
        assert!(json.get("causes").is_none());
        assert!(json.get("stack_trace").is_none());
    }
}
