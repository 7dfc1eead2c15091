//! # evidence-core
//!
//! Deterministic evidence checks for claims made by an assistant and for the
//! user requests that prompt them.
//!
//! Two operations are provided:
//! - `validate_evidence_claim`: does this claim carry the evidence its context demands?
//! - `check_evidence_required`: does this user request ask for evidence at all?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces the same verdict
//! 2. **Fixed rules**: Phrase lists and guards are compiled in, not configured
//! 3. **Shape-checked**: Structurally unusable arguments are rejected before any check runs
//!
//! ## Example
//!
//! ```rust
//! use evidence_core::{evaluate_claim, ClaimInput, ClaimVerdict, RequestContext};
//!
//! let input = ClaimInput::new(RequestContext::Status, "Deploy succeeded");
//! let assessment = evaluate_claim(&input);
//!
//! assert!(matches!(assessment.verdict, ClaimVerdict::EvidenceRequired { .. }));
//! assert!(!assessment.passed());
//! ```

pub mod catalog;
pub mod guards;
pub mod schema;
pub mod triggers;
pub mod types;

pub use catalog::{tool_descriptors, CatalogError, Operation};
pub use guards::Guard;
pub use schema::{validate_arguments, SchemaError};
pub use triggers::check_request;
pub use types::{
    Assessment, ClaimInput, ClaimVerdict, RequestContext, RequirementReport,
};

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while running an operation.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of running an operation on raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The text payload for the host.
    Text(String),

    /// Arguments were missing a required field or had the wrong type.
    InvalidArguments(Vec<String>),
}

/// Evaluate a claim against its context and the violation guards.
pub fn evaluate_claim(input: &ClaimInput) -> Assessment {
    let evidence_required = input.context.requires_evidence();

    if !input.trigger_phrases.is_empty() {
        tracing::debug!(
            context = %input.context,
            triggers = ?input.trigger_phrases,
            "Claim submitted with trigger phrases"
        );
    }

    let verdict = if let Some((guard, verdict)) = guards::first_violation(input) {
        tracing::info!(guard, context = %input.context, "Guard violation");
        verdict
    } else if evidence_required && !input.has_evidence() {
        ClaimVerdict::EvidenceRequired {
            claim: input.claim.clone(),
            context: input.context.clone(),
        }
    } else if evidence_required {
        ClaimVerdict::EvidenceProvided {
            claim: input.claim.clone(),
            context: input.context.clone(),
        }
    } else {
        ClaimVerdict::NoEvidenceRequired {
            context: input.context.clone(),
        }
    };
    tracing::debug!(verdict = verdict.kind(), "Claim evaluated");

    Assessment {
        verdict,
        evidence_required,
        evaluated_at: Utc::now(),
    }
}

/// Decide whether a user request calls for evidence.
pub fn check_evidence_required(user_request: &str) -> RequirementReport {
    let report = check_request(user_request);
    tracing::debug!(
        requires_evidence = report.requires_evidence,
        matched = ?report.matched_triggers,
        "Checked user request"
    );
    report
}

/// Validate raw arguments and run an operation, producing the host payload.
pub fn run_operation(op: Operation, arguments: &Value) -> Result<ToolOutcome, EvidenceError> {
    if let Err(errors) = validate_arguments(op, arguments) {
        return Ok(ToolOutcome::InvalidArguments(errors));
    }

    match op {
        Operation::ValidateEvidenceClaim => {
            let input: ClaimInput = match serde_json::from_value(arguments.clone()) {
                Ok(input) => input,
                Err(e) => return Ok(ToolOutcome::InvalidArguments(vec![e.to_string()])),
            };
            let assessment = evaluate_claim(&input);
            Ok(ToolOutcome::Text(assessment.verdict.message()))
        }
        Operation::CheckEvidenceRequired => {
            // Presence and type are guaranteed by the schema.
            let user_request = arguments
                .get("user_request")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let report = check_evidence_required(user_request);
            Ok(ToolOutcome::Text(serde_json::to_string_pretty(&report)?))
        }
    }
}

/// Look up an operation by name and run it.
pub fn run_tool(name: &str, arguments: &Value) -> Result<ToolOutcome, EvidenceError> {
    let op = Operation::from_name(name)?;
    run_operation(op, arguments)
}
