//! Trigger phrases that signal a user expects evidence.
//!
//! A request is lower-cased and scanned once for every phrase. Phrases are
//! plain substrings with no word boundaries, so `checkout` still counts as
//! `check`.

use lazy_static::lazy_static;
use regex::RegexSet;

use crate::types::{RequestContext, RequirementReport};

/// Phrases in priority order. Matches are reported in this order.
pub const TRIGGER_PHRASES: [&str; 15] = [
    "evaluate",
    "status",
    "verify",
    "check",
    "did it work",
    "is it working",
    "what happened",
    "show me proof",
    "back up your claim",
    "prove it",
    "evidence",
    "logs",
    "console",
    "screenshot",
    "result",
];

pub const EVIDENCE_RECOMMENDATION: &str = "Use CLAIM → EVIDENCE → STATUS format";
pub const NORMAL_TASK_RECOMMENDATION: &str = "Normal task - no evidence required";

lazy_static! {
    /// One literal pattern per trigger phrase, indexed like `TRIGGER_PHRASES`.
    static ref TRIGGER_SET: RegexSet =
        RegexSet::new(TRIGGER_PHRASES.iter().map(|p| regex::escape(p))).unwrap();
}

/// Return the trigger phrases found in a request, in list order.
pub fn matched_triggers(user_request: &str) -> Vec<&'static str> {
    let lowered = user_request.to_lowercase();
    TRIGGER_SET
        .matches(&lowered)
        .into_iter()
        .map(|index| TRIGGER_PHRASES[index])
        .collect()
}

/// Build the full report for `check_evidence_required`.
pub fn check_request(user_request: &str) -> RequirementReport {
    let matched = matched_triggers(user_request);
    let requires_evidence = !matched.is_empty();

    let (context, recommendation) = if requires_evidence {
        (RequestContext::Evaluation, EVIDENCE_RECOMMENDATION)
    } else {
        (RequestContext::NormalTask, NORMAL_TASK_RECOMMENDATION)
    };

    RequirementReport {
        requires_evidence,
        context,
        matched_triggers: matched.into_iter().map(str::to_string).collect(),
        recommendation: recommendation.to_string(),
    }
}
