//! Build gate.
//!
//! Converts resolution reports into a build decision. Detection (the
//! resolver) and policy (this module) are separate, so the same report can
//! be judged under different policies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::Locale;
use crate::report::{BuildReport, ReferenceClass, ReferenceOutcome};
use crate::resolver::resolve_locales;
use crate::site::SiteInputs;

/// What to do with an unresolved reference of a given class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Abort the build.
    #[default]
    Fail,
    /// Log and proceed.
    Warn,
    /// Proceed silently.
    Ignore,
}

/// Handling of external references.
///
/// External targets are outside the site's authority and are never checked,
/// so ignoring them is the only policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalLinkPolicy {
    #[default]
    Ignore,
}

/// Per-class gate policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPolicy {
    /// Unresolved navigation references (sidebars, navbar, footer, homepage).
    pub on_broken_links: Severity,
    /// Unresolved links inside page bodies.
    pub on_broken_markdown_links: Severity,
    pub on_external_links: ExternalLinkPolicy,
}

impl Default for BuildPolicy {
    fn default() -> Self {
        Self {
            on_broken_links: Severity::Fail,
            on_broken_markdown_links: Severity::Warn,
            on_external_links: ExternalLinkPolicy::Ignore,
        }
    }
}

impl BuildPolicy {
    /// Severity applied to unresolved references of `class`.
    #[must_use]
    pub fn severity(&self, class: ReferenceClass) -> Severity {
        match class {
            ReferenceClass::Navigation => self.on_broken_links,
            ReferenceClass::Content => self.on_broken_markdown_links,
        }
    }
}

/// An unresolved reference flagged by the gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub locale: Locale,
    #[serde(flatten)]
    pub outcome: ReferenceOutcome,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.locale, self.outcome)
    }
}

/// Result of applying a policy to one or more reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GateDecision {
    Proceed {
        warnings: Vec<Violation>,
    },
    Abort {
        violations: Vec<Violation>,
        warnings: Vec<Violation>,
    },
}

impl GateDecision {
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }

    #[must_use]
    pub fn warnings(&self) -> &[Violation] {
        match self {
            Self::Proceed { warnings } | Self::Abort { warnings, .. } => warnings,
        }
    }

    /// Fatal violations; empty when proceeding.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Proceed { .. } => &[],
            Self::Abort { violations, .. } => violations,
        }
    }
}

fn classify(
    report: &BuildReport,
    policy: &BuildPolicy,
    violations: &mut Vec<Violation>,
    warnings: &mut Vec<Violation>,
) {
    for outcome in report.unresolved() {
        let bucket = match policy.severity(outcome.class) {
            Severity::Fail => &mut *violations,
            Severity::Warn => &mut *warnings,
            Severity::Ignore => continue,
        };
        bucket.push(Violation {
            locale: report.locale().clone(),
            outcome: outcome.clone(),
        });
    }
}

fn decide(violations: Vec<Violation>, warnings: Vec<Violation>) -> GateDecision {
    for warning in &warnings {
        tracing::warn!(
            locale = %warning.locale,
            path = %warning.outcome.path,
            target = %warning.outcome.target,
            "Unresolved reference"
        );
    }
    if violations.is_empty() {
        GateDecision::Proceed { warnings }
    } else {
        GateDecision::Abort {
            violations,
            warnings,
        }
    }
}

/// Apply `policy` to one report.
///
/// Every unresolved reference lands in exactly one bucket according to its
/// class severity; `Abort` carries all of them, not just the first.
#[must_use]
pub fn evaluate(report: &BuildReport, policy: &BuildPolicy) -> GateDecision {
    evaluate_all(std::slice::from_ref(report), policy)
}

/// Apply `policy` to several locale reports, keeping report order.
#[must_use]
pub fn evaluate_all(reports: &[BuildReport], policy: &BuildPolicy) -> GateDecision {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();
    for report in reports {
        classify(report, policy, &mut violations, &mut warnings);
    }
    decide(violations, warnings)
}

/// Site inputs that passed the gate.
///
/// Only obtainable from [`validate`], so holding one guarantees every
/// internal navigation reference resolves in every configured locale.
#[derive(Debug)]
pub struct ValidatedSite {
    inputs: SiteInputs,
    reports: Vec<BuildReport>,
    warnings: Vec<Violation>,
}

impl ValidatedSite {
    #[must_use]
    pub fn inputs(&self) -> &SiteInputs {
        &self.inputs
    }

    /// Per-locale reports in configured locale order.
    #[must_use]
    pub fn reports(&self) -> &[BuildReport] {
        &self.reports
    }

    #[must_use]
    pub fn warnings(&self) -> &[Violation] {
        &self.warnings
    }

    /// Report for a locale.
    #[must_use]
    pub fn report(&self, locale: &Locale) -> Option<&BuildReport> {
        self.reports.iter().find(|r| r.locale() == locale)
    }
}

/// Gate rejection carrying every violation.
#[derive(Debug, thiserror::Error)]
#[error("Build aborted: {} unresolved reference(s)", .violations.len())]
pub struct GateFailure {
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
    pub reports: Vec<BuildReport>,
}

/// Resolve all locales and run the gate.
///
/// # Errors
///
/// Returns [`GateFailure`] when any unresolved reference has `Fail` severity.
pub fn validate(inputs: SiteInputs, policy: &BuildPolicy) -> Result<ValidatedSite, GateFailure> {
    let reports = resolve_locales(&inputs);
    match evaluate_all(&reports, policy) {
        GateDecision::Proceed { warnings } => Ok(ValidatedSite {
            inputs,
            reports,
            warnings,
        }),
        GateDecision::Abort {
            violations,
            warnings,
        } => Err(GateFailure {
            violations,
            warnings,
            reports,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavLeaf, NavPath};
    use crate::report::{Resolution, ResolutionResult, UnresolvedReason};
    use pretty_assertions::assert_eq;

    fn report(outcomes: &[(ReferenceClass, &str, bool)]) -> BuildReport {
        let mut report = BuildReport::new(Locale::from("en"));
        for &(class, target, resolved) in outcomes {
            let result = if resolved {
                ResolutionResult::Resolved(Resolution::StaticRoute {
                    route: target.to_owned(),
                })
            } else {
                ResolutionResult::Unresolved(UnresolvedReason::TargetNotFound)
            };
            report.push(ReferenceOutcome {
                path: NavPath::root("sidebar:docs").child(target),
                class,
                target: target.to_owned(),
                result,
            });
        }
        report
    }

    fn targets(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.outcome.target.as_str()).collect()
    }

    #[test]
    fn test_default_policy() {
        let policy = BuildPolicy::default();
        assert_eq!(policy.on_broken_links, Severity::Fail);
        assert_eq!(policy.on_broken_markdown_links, Severity::Warn);
        assert_eq!(policy.on_external_links, ExternalLinkPolicy::Ignore);
    }

    #[test]
    fn test_all_resolved_proceeds() {
        let decision = evaluate(
            &report(&[(ReferenceClass::Navigation, "intro", true)]),
            &BuildPolicy::default(),
        );
        assert_eq!(decision, GateDecision::Proceed { warnings: vec![] });
    }

    #[test]
    fn test_navigation_failure_aborts_with_every_violation() {
        let decision = evaluate(
            &report(&[
                (ReferenceClass::Navigation, "a", false),
                (ReferenceClass::Navigation, "b", true),
                (ReferenceClass::Navigation, "c", false),
                (ReferenceClass::Content, "d.md", false),
            ]),
            &BuildPolicy::default(),
        );

        assert!(!decision.is_proceed());
        assert_eq!(targets(decision.violations()), ["a", "c"]);
        assert_eq!(targets(decision.warnings()), ["d.md"]);
    }

    #[test]
    fn test_content_failure_only_warns_by_default() {
        let decision = evaluate(
            &report(&[(ReferenceClass::Content, "missing.md", false)]),
            &BuildPolicy::default(),
        );

        assert!(decision.is_proceed());
        assert_eq!(targets(decision.warnings()), ["missing.md"]);
    }

    #[test]
    fn test_severity_per_class() {
        let policy = BuildPolicy {
            on_broken_links: Severity::Warn,
            on_broken_markdown_links: Severity::Fail,
            on_external_links: ExternalLinkPolicy::Ignore,
        };
        let decision = evaluate(
            &report(&[
                (ReferenceClass::Navigation, "nav", false),
                (ReferenceClass::Content, "body.md", false),
            ]),
            &policy,
        );

        assert_eq!(targets(decision.violations()), ["body.md"]);
        assert_eq!(targets(decision.warnings()), ["nav"]);
    }

    #[test]
    fn test_ignore_drops_references() {
        let policy = BuildPolicy {
            on_broken_links: Severity::Ignore,
            on_broken_markdown_links: Severity::Ignore,
            ..BuildPolicy::default()
        };
        let decision = evaluate(
            &report(&[
                (ReferenceClass::Navigation, "nav", false),
                (ReferenceClass::Content, "body.md", false),
            ]),
            &policy,
        );
        assert_eq!(decision, GateDecision::Proceed { warnings: vec![] });
    }

    #[test]
    fn test_evaluate_all_merges_locales() {
        let en = report(&[(ReferenceClass::Navigation, "a", false)]);
        let mut fr = BuildReport::new(Locale::from("fr"));
        fr.push(ReferenceOutcome {
            path: NavPath::root("navbar").child("b"),
            class: ReferenceClass::Navigation,
            target: "b".to_owned(),
            result: ResolutionResult::Unresolved(UnresolvedReason::InvalidIdentifier),
        });

        let decision = evaluate_all(&[en, fr], &BuildPolicy::default());

        let locales: Vec<_> = decision
            .violations()
            .iter()
            .map(|v| v.locale.as_str())
            .collect();
        assert_eq!(locales, ["en", "fr"]);
        assert_eq!(
            decision.violations()[1].to_string(),
            "[fr] navbar > b: 'b' (invalid identifier)"
        );
    }

    #[test]
    fn test_severity_deserializes_lowercase() {
        let policy: BuildPolicy = serde_json::from_str(
            r#"{"on_broken_links":"warn","on_broken_markdown_links":"ignore","on_external_links":"ignore"}"#,
        )
        .unwrap();
        assert_eq!(policy.on_broken_links, Severity::Warn);
        assert_eq!(policy.on_broken_markdown_links, Severity::Ignore);
    }

    #[test]
    fn test_external_leaf_never_reaches_gate() {
        let leaf = NavLeaf::external("https://example.com", None);
        let mut report = BuildReport::new(Locale::from("en"));
        report.push(ReferenceOutcome {
            path: NavPath::root("navbar").child(leaf.target()),
            class: ReferenceClass::Navigation,
            target: leaf.target().to_owned(),
            result: ResolutionResult::Resolved(Resolution::External {
                url: leaf.target().to_owned(),
            }),
        });

        let decision = evaluate(&report, &BuildPolicy::default());
        assert!(decision.is_proceed());
        assert!(decision.warnings().is_empty());
    }
}
