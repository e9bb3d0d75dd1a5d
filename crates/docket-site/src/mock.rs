//! Mock content source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use crate::homepage::HomepageSpec;
use crate::navigation::NavigationSpec;
use crate::page::ContentPage;
use crate::source::{ContentSource, SourceError};

/// In-memory content source.
///
/// # Example
///
/// ```ignore
/// use docket_site::{ContentPage, Locale, MockSource};
///
/// let source = MockSource::new()
///     .with_page(ContentPage::new("intro", Locale::from("en"), "Introduction"))
///     .with_navigation(spec);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    pages: Vec<ContentPage>,
    navigation: NavigationSpec,
    homepage: Option<HomepageSpec>,
    missing_navigation: bool,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page.
    #[must_use]
    pub fn with_page(mut self, page: ContentPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Add several pages in order.
    #[must_use]
    pub fn with_pages(mut self, pages: impl IntoIterator<Item = ContentPage>) -> Self {
        self.pages.extend(pages);
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: NavigationSpec) -> Self {
        self.navigation = navigation;
        self
    }

    #[must_use]
    pub fn with_homepage(mut self, homepage: HomepageSpec) -> Self {
        self.homepage = Some(homepage);
        self
    }

    /// Make [`ContentSource::navigation`] fail with a not-found error.
    #[must_use]
    pub fn without_navigation(mut self) -> Self {
        self.missing_navigation = true;
        self
    }
}

impl ContentSource for MockSource {
    fn scan(&self) -> Result<Vec<ContentPage>, SourceError> {
        Ok(self.pages.clone())
    }

    fn navigation(&self) -> Result<NavigationSpec, SourceError> {
        if self.missing_navigation {
            return Err(SourceError::not_found("navigation.yaml").with_backend("Mock"));
        }
        Ok(self.navigation.clone())
    }

    fn homepage(&self) -> Result<Option<HomepageSpec>, SourceError> {
        Ok(self.homepage.clone())
    }
}
