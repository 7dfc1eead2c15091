//! Core types for evidence checks.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The situation a claim or request was made in.
///
/// Hosts may send contexts outside the four known ones; those are kept
/// verbatim and never demand evidence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestContext {
    Evaluation,
    Status,
    Verification,
    NormalTask,
    Other(String),
}

impl RequestContext {
    pub const ALL: [RequestContext; 4] = [
        RequestContext::Evaluation,
        RequestContext::Status,
        RequestContext::Verification,
        RequestContext::NormalTask,
    ];

    /// Evaluation, status and verification contexts demand evidence.
    pub fn requires_evidence(&self) -> bool {
        matches!(
            self,
            RequestContext::Evaluation | RequestContext::Status | RequestContext::Verification
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestContext::Evaluation => "evaluation",
            RequestContext::Status => "status",
            RequestContext::Verification => "verification",
            RequestContext::NormalTask => "normal_task",
            RequestContext::Other(name) => name,
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RequestContext {
    fn from(s: &str) -> Self {
        RequestContext::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .unwrap_or_else(|| RequestContext::Other(s.to_string()))
    }
}

impl From<String> for RequestContext {
    fn from(s: String) -> Self {
        RequestContext::from(s.as_str())
    }
}

impl From<RequestContext> for String {
    fn from(context: RequestContext) -> Self {
        match context {
            RequestContext::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for RequestContext {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RequestContext::from(s))
    }
}

/// Arguments of `validate_evidence_claim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    pub context: RequestContext,

    pub claim: String,

    /// Free text offered in support of the claim (command, output, timestamp).
    #[serde(default)]
    pub evidence: Option<String>,

    /// Phrases from the user that made evidence necessary. Recorded, never scored.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trigger_phrases: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClaimInput {
    pub fn new(context: RequestContext, claim: impl Into<String>) -> Self {
        Self {
            context,
            claim: claim.into(),
            evidence: None,
            trigger_phrases: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_trigger_phrases(mut self, phrases: Vec<String>) -> Self {
        self.trigger_phrases = phrases;
        self
    }

    /// Evidence text, with a missing value read as empty.
    pub fn evidence_text(&self) -> &str {
        self.evidence.as_deref().unwrap_or("")
    }

    pub fn has_evidence(&self) -> bool {
        !self.evidence_text().is_empty()
    }
}

/// Outcome of `validate_evidence_claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ClaimVerdict {
    /// Claim mentions Playwright and the evidence carries no explicit permission.
    PlaywrightViolation,

    /// A script failure shows up in the evidence without an `ERROR TYPE` report.
    NonTerminatingErrorViolation,

    EvidenceRequired {
        claim: String,
        context: RequestContext,
    },

    EvidenceProvided {
        claim: String,
        context: RequestContext,
    },

    NoEvidenceRequired { context: RequestContext },
}

impl ClaimVerdict {
    /// Check if this verdict lets the claim stand.
    pub fn is_pass(&self) -> bool {
        matches!(
            self,
            ClaimVerdict::EvidenceProvided { .. } | ClaimVerdict::NoEvidenceRequired { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClaimVerdict::PlaywrightViolation => "playwright_violation",
            ClaimVerdict::NonTerminatingErrorViolation => "non_terminating_error_violation",
            ClaimVerdict::EvidenceRequired { .. } => "evidence_required",
            ClaimVerdict::EvidenceProvided { .. } => "evidence_provided",
            ClaimVerdict::NoEvidenceRequired { .. } => "no_evidence_required",
        }
    }

    /// The text returned to the host.
    pub fn message(&self) -> String {
        match self {
            ClaimVerdict::PlaywrightViolation => "❌ PLAYWRIGHT VIOLATION: Playwright usage detected without explicit user permission. Use macOS automation instead.".to_string(),
            ClaimVerdict::NonTerminatingErrorViolation => "❌ NON-TERMINATING ERROR VIOLATION: Script execution failure detected but not properly reported with ERROR TYPE format. Must report non-terminating errors immediately with full context.".to_string(),
            ClaimVerdict::EvidenceRequired { claim, context } => format!(
                "❌ EVIDENCE REQUIRED: Claim \"{}\" requires evidence in context \"{}\"",
                claim, context
            ),
            ClaimVerdict::EvidenceProvided { claim, context } => format!(
                "✅ EVIDENCE PROVIDED: Claim \"{}\" supported by evidence in context \"{}\"",
                claim, context
            ),
            ClaimVerdict::NoEvidenceRequired { context } => format!(
                "ℹ️ NO EVIDENCE REQUIRED: Context \"{}\" does not require evidence validation",
                context
            ),
        }
    }
}

impl fmt::Display for ClaimVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A verdict together with when it was reached.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub verdict: ClaimVerdict,

    /// Whether the claim's context demanded evidence at all
    pub evidence_required: bool,

    pub evaluated_at: DateTime<Utc>,
}

impl Assessment {
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }
}

/// Outcome of `check_evidence_required`.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementReport {
    pub requires_evidence: bool,
    pub context: RequestContext,
    pub matched_triggers: Vec<String>,
    pub recommendation: String,
}
