//! Resolution results and build reports.

use std::fmt;

use serde::Serialize;

use crate::navigation::NavPath;
use crate::page::{ContentPage, Locale};

/// Tier a reference belongs to; each tier has its own gate severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceClass {
    /// Structured references: sidebars, navbar, footer, homepage actions.
    Navigation,
    /// Free-text links inside page bodies.
    Content,
}

impl fmt::Display for ReferenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigation => f.write_str("navigation"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// What a resolved reference points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A registered page in the same locale.
    Page(ContentPage),
    /// A declared site route outside the docs tree.
    StaticRoute { route: String },
    /// External URL, accepted without checking.
    External { url: String },
}

/// Why a reference did not resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Well-formed target with no matching page or route.
    TargetNotFound,
    /// Target failed the identifier syntax check; lookup was not attempted.
    InvalidIdentifier,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound => f.write_str("target not found"),
            Self::InvalidIdentifier => f.write_str("invalid identifier"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum ResolutionResult {
    Resolved(Resolution),
    Unresolved(UnresolvedReason),
}

impl ResolutionResult {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The resolved page, if the reference points at one.
    #[must_use]
    pub fn page(&self) -> Option<&ContentPage> {
        match self {
            Self::Resolved(Resolution::Page(page)) => Some(page),
            _ => None,
        }
    }
}

/// Resolution of a single reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReferenceOutcome {
    /// Location of the containing node.
    pub path: NavPath,
    pub class: ReferenceClass,
    /// Target as declared.
    pub target: String,
    pub result: ResolutionResult,
}

impl fmt::Display for ReferenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            ResolutionResult::Resolved(_) => write!(f, "{}: '{}' resolved", self.path, self.target),
            ResolutionResult::Unresolved(reason) => {
                write!(f, "{}: '{}' ({reason})", self.path, self.target)
            }
        }
    }
}

/// Resolved/unresolved tallies for one reference class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Every reference of one locale, in walk order.
///
/// Built deterministically: resolving the same inputs twice yields reports
/// that serialize byte-for-byte identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    locale: Locale,
    outcomes: Vec<ReferenceOutcome>,
    navigation: ClassCounts,
    content: ClassCounts,
}

impl BuildReport {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            outcomes: Vec::new(),
            navigation: ClassCounts::default(),
            content: ClassCounts::default(),
        }
    }

    /// Append an outcome and update the class tallies.
    pub fn push(&mut self, outcome: ReferenceOutcome) {
        let counts = match outcome.class {
            ReferenceClass::Navigation => &mut self.navigation,
            ReferenceClass::Content => &mut self.content,
        };
        if outcome.result.is_resolved() {
            counts.resolved += 1;
        } else {
            counts.unresolved += 1;
        }
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ReferenceOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn counts(&self, class: ReferenceClass) -> ClassCounts {
        match class {
            ReferenceClass::Navigation => self.navigation,
            ReferenceClass::Content => self.content,
        }
    }

    /// Unresolved outcomes in walk order.
    pub fn unresolved(&self) -> impl Iterator<Item = &ReferenceOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_resolved())
    }

    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.navigation.unresolved + self.content.unresolved
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
