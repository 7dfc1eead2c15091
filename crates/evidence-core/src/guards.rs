//! Violation guards run before the context check.
//!
//! Guards are evaluated in a fixed order and the first one that fires
//! decides the verdict.

use crate::types::{ClaimInput, ClaimVerdict};

/// Marker in the claim (case-insensitive) that needs permission.
pub const PLAYWRIGHT_MARKER: &str = "playwright";

/// Phrase the evidence must carry for Playwright usage to be accepted.
pub const PLAYWRIGHT_PERMISSION: &str = "explicit user permission";

pub const SCRIPT_FAILURE_MARKER: &str = "Script execution failed";

/// Report format that makes a script failure properly disclosed.
pub const ERROR_TYPE_MARKER: &str = "ERROR TYPE";

/// A single violation check over a claim and its evidence.
pub trait Guard: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &'static str;

    /// Return a violation verdict, or `None` to let later checks run.
    fn check(&self, input: &ClaimInput) -> Option<ClaimVerdict>;
}

/// Flags Playwright usage claimed without the user's explicit permission.
pub struct PlaywrightGuard;

impl Guard for PlaywrightGuard {
    fn id(&self) -> &'static str {
        "playwright"
    }

    fn check(&self, input: &ClaimInput) -> Option<ClaimVerdict> {
        let mentions_playwright =
            !input.claim.is_empty() && input.claim.to_lowercase().contains(PLAYWRIGHT_MARKER);

        if mentions_playwright && !input.evidence_text().contains(PLAYWRIGHT_PERMISSION) {
            Some(ClaimVerdict::PlaywrightViolation)
        } else {
            None
        }
    }
}

/// Flags script failures that were not reported in `ERROR TYPE` form.
pub struct ErrorReportingGuard;

impl Guard for ErrorReportingGuard {
    fn id(&self) -> &'static str {
        "non_terminating_error"
    }

    fn check(&self, input: &ClaimInput) -> Option<ClaimVerdict> {
        let evidence = input.evidence_text();
        if evidence.contains(SCRIPT_FAILURE_MARKER) && !evidence.contains(ERROR_TYPE_MARKER) {
            Some(ClaimVerdict::NonTerminatingErrorViolation)
        } else {
            None
        }
    }
}

static GUARDS: [&dyn Guard; 2] = [&PlaywrightGuard, &ErrorReportingGuard];

/// All guards in evaluation order.
pub fn guards() -> &'static [&'static dyn Guard] {
    &GUARDS
}

/// Run the guards in order and return the first violation.
pub fn first_violation(input: &ClaimInput) -> Option<(&'static str, ClaimVerdict)> {
    guards()
        .iter()
        .find_map(|guard| guard.check(input).map(|verdict| (guard.id(), verdict)))
}
