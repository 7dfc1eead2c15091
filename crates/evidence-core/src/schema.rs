//! JSON Schema validation for tool arguments.
//!
//! Each operation's argument schema is compiled once and reused. It checks
//! shape only: required fields are present and strings are strings. Values
//! the checks can interpret, such as an unlisted context or a `null`
//! evidence field, pass through. Arguments that fail never reach the checks.

use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;

use crate::catalog::Operation;

static CLAIM_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static REQUEST_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator(op: Operation) -> Result<&'static jsonschema::Validator, SchemaError> {
    let cell = match op {
        Operation::ValidateEvidenceClaim => &CLAIM_VALIDATOR,
        Operation::CheckEvidenceRequired => &REQUEST_VALIDATOR,
    };

    let result = cell.get_or_init(|| {
        jsonschema::options()
            .build(op.argument_schema())
            .map_err(|e| format!("Failed to compile schema for {}: {}", op, e))
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate arguments for an operation.
///
/// Returns every violation as `"<message> at <path>"`; root-level violations
/// carry no path.
pub fn validate_arguments(op: Operation, arguments: &Value) -> Result<(), Vec<String>> {
    let validator = get_validator(op).map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(arguments)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{} at {}", e, path)
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_claim_arguments_pass() {
        let args = json!({ "context": "status", "claim": "Service restarted" });
        assert!(validate_arguments(Operation::ValidateEvidenceClaim, &args).is_ok());
    }

    #[test]
    fn test_full_claim_arguments_pass() {
        let args = json!({
            "context": "verification",
            "claim": "Migration applied",
            "evidence": "$ sqlx migrate run\nApplied 3 migrations\n2025-01-04T10:00:00Z",
            "trigger_phrases": ["verify", "did it work"]
        });
        assert!(validate_arguments(Operation::ValidateEvidenceClaim, &args).is_ok());
    }

    #[test]
    fn test_missing_claim_fails() {
        let args = json!({ "context": "status" });
        let errors = validate_arguments(Operation::ValidateEvidenceClaim, &args).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("claim"));
    }

    #[test]
    fn test_unlisted_context_passes() {
        let args = json!({ "context": "debugging", "claim": "x" });
        assert!(validate_arguments(Operation::ValidateEvidenceClaim, &args).is_ok());
    }

    #[test]
    fn test_null_optional_fields_pass() {
        let args = json!({
            "context": "status",
            "claim": "x",
            "evidence": null,
            "trigger_phrases": null
        });
        assert!(validate_arguments(Operation::ValidateEvidenceClaim, &args).is_ok());
    }

    #[test]
    fn test_non_string_context_fails_with_path() {
        let args = json!({ "context": 7, "claim": "x" });
        let errors = validate_arguments(Operation::ValidateEvidenceClaim, &args).unwrap_err();
        assert!(errors.iter().any(|e| e.ends_with("at /context")));
    }

    #[test]
    fn test_trigger_phrases_must_be_strings() {
        let args = json!({ "context": "status", "claim": "x", "trigger_phrases": [1, 2] });
        let errors = validate_arguments(Operation::ValidateEvidenceClaim, &args).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_request_arguments() {
        let op = Operation::CheckEvidenceRequired;
        assert!(validate_arguments(op, &json!({ "user_request": "did it work?" })).is_ok());
        assert!(validate_arguments(op, &json!({ "user_request": 42 })).is_err());
        assert!(validate_arguments(op, &Value::Null).is_err());
    }

    #[test]
    fn test_extra_properties_are_tolerated() {
        let args = json!({ "user_request": "hi", "session": "abc" });
        assert!(validate_arguments(Operation::CheckEvidenceRequired, &args).is_ok());
    }
}
