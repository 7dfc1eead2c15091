//! The two operations exposed to hosts, with their descriptions and schemas.

use std::fmt;

use lazy_static::lazy_static;
use serde_json::{json, Value};
use thiserror::Error;

const VALIDATE_EVIDENCE_CLAIM_SCHEMA: &str =
    include_str!("../../../schemas/validate_evidence_claim.schema.json");
const CHECK_EVIDENCE_REQUIRED_SCHEMA: &str =
    include_str!("../../../schemas/check_evidence_required.schema.json");
const VALIDATE_EVIDENCE_CLAIM_ARGUMENTS: &str =
    include_str!("../../../schemas/validate_evidence_claim.arguments.json");

lazy_static! {
    static ref CLAIM_SCHEMA: Value = serde_json::from_str(VALIDATE_EVIDENCE_CLAIM_SCHEMA).unwrap();
    static ref REQUEST_SCHEMA: Value = serde_json::from_str(CHECK_EVIDENCE_REQUIRED_SCHEMA).unwrap();
    static ref CLAIM_ARGUMENTS: Value = serde_json::from_str(VALIDATE_EVIDENCE_CLAIM_ARGUMENTS).unwrap();
}

/// Errors from looking up an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// A named operation a host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ValidateEvidenceClaim,
    CheckEvidenceRequired,
}

impl Operation {
    /// Registration order.
    pub const ALL: [Operation; 2] = [
        Operation::ValidateEvidenceClaim,
        Operation::CheckEvidenceRequired,
    ];

    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| CatalogError::UnknownTool(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::ValidateEvidenceClaim => "validate_evidence_claim",
            Operation::CheckEvidenceRequired => "check_evidence_required",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::ValidateEvidenceClaim => {
                "Validates claims only when evidence is required (context-aware)"
            }
            Operation::CheckEvidenceRequired => {
                "Checks if evidence is required based on user request context"
            }
        }
    }

    /// JSON Schema for the operation's arguments.
    pub fn input_schema(self) -> &'static Value {
        match self {
            Operation::ValidateEvidenceClaim => &CLAIM_SCHEMA,
            Operation::CheckEvidenceRequired => &REQUEST_SCHEMA,
        }
    }

    /// Shape arguments must have before the operation can run.
    ///
    /// Looser than `input_schema`: any context string is accepted and
    /// optional fields may be `null`.
    pub fn argument_schema(self) -> &'static Value {
        match self {
            Operation::ValidateEvidenceClaim => &CLAIM_ARGUMENTS,
            Operation::CheckEvidenceRequired => &REQUEST_SCHEMA,
        }
    }

    /// Descriptor in the shape hosts expect from a tool listing.
    pub fn descriptor(self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptors for every operation, in registration order.
pub fn tool_descriptors() -> Vec<Value> {
    Operation::ALL.into_iter().map(Operation::descriptor).collect()
}
