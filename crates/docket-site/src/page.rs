//! Documentation pages and locales.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Language/region partition under which identifiers are scoped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a language tag (e.g. `en`, `pt-BR`).
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The language tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Check that a string is a well-formed page identifier.
///
/// Identifiers are `/`-separated, non-empty segments of ASCII letters,
/// digits, `_`, `-` and `.`; `.` and `..` segments are rejected, as are
/// leading or trailing slashes.
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        })
}

/// A registered documentation page.
///
/// Immutable once built: identifier and locale never change, the registry
/// only adds or removes whole pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPage {
    id: String,
    locale: Locale,
    title: String,
    parent_path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_path: Option<PathBuf>,
    #[serde(default, skip_serializing)]
    links: Vec<String>,
}

impl ContentPage {
    /// Create a top-level page.
    #[must_use]
    pub fn new(id: impl Into<String>, locale: Locale, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            locale,
            title: title.into(),
            parent_path: Vec::new(),
            slug: None,
            description: None,
            source_path: None,
            links: Vec::new(),
        }
    }

    /// Set the category path from root to the page's parent.
    #[must_use]
    pub fn with_parent_path(mut self, parent_path: Vec<String>) -> Self {
        self.parent_path = parent_path;
        self
    }

    /// Override the permalink (e.g. `/` for the docs landing page).
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Attach a short description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Record the source file, relative to the locale's docs root.
    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    /// Record link destinations found in the page body.
    #[must_use]
    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Category identifiers from root to the page's parent; empty at top level.
    #[must_use]
    pub fn parent_path(&self) -> &[String] {
        &self.parent_path
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn source_path(&self) -> Option<&std::path::Path> {
        self.source_path.as_deref()
    }

    /// Raw link destinations from the page body, in document order.
    #[must_use]
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Route of the page below the docs base, without surrounding slashes.
    ///
    /// The slug wins over the identifier; a slug of `/` yields `""`.
    #[must_use]
    pub fn permalink(&self) -> &str {
        match &self.slug {
            Some(slug) => slug.trim_matches('/'),
            None => &self.id,
        }
    }
}
