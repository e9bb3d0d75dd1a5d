//! Filesystem content source for Docket.
//!
//! This crate provides [`FsSource`], a filesystem implementation of the
//! [`ContentSource`](docket_site::ContentSource) trait. It handles:
//!
//! - Recursive directory scanning for `.md`/`.mdx` pages per locale
//! - YAML front matter (`id`, `title`, `slug`, `description`)
//! - Title extraction from the first H1, falling back to the file name
//! - In-body link extraction for content-link checking
//! - Loading the navigation and homepage YAML files
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docket_site::{ContentSource, Locale};
//! use docket_storage_fs::FsSource;
//!
//! let source = FsSource::new(PathBuf::from("docs"), Locale::from("en"))
//!     .with_navigation(PathBuf::from("navigation.yaml"));
//! for page in source.scan()? {
//!     println!("{}: {}", page.id(), page.title());
//! }
//! ```

mod frontmatter;
mod links;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use docket_site::{
    ContentPage, ContentSource, HomepageSpec, Locale, NavigationSpec, SourceError,
    SourceErrorKind,
};
use rayon::prelude::*;
use regex::Regex;

use links::extract_links;
use scanner::{PageRef, Scanner, page_identifier, path_segments};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Docs directory of one locale.
#[derive(Debug, Clone)]
struct LocaleRoot {
    locale: Locale,
    dir: PathBuf,
}

fn translation_dir(i18n_dir: &Path, locale: &Locale) -> PathBuf {
    i18n_dir.join(locale.as_str()).join("docs")
}

/// Filesystem content source.
///
/// The default locale is read from the docs directory; every other locale
/// from `<i18n_dir>/<locale>/docs`.
#[derive(Debug)]
pub struct FsSource {
    roots: Vec<LocaleRoot>,
    navigation_path: Option<PathBuf>,
    homepage_path: Option<PathBuf>,
    /// Regex for extracting first H1 heading.
    h1_regex: Regex,
}

impl FsSource {
    /// Create a source for a single-locale site.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded H1 regex is invalid (compile-time constant, never fails).
    #[must_use]
    pub fn new(docs_dir: PathBuf, default_locale: Locale) -> Self {
        Self::with_roots(vec![LocaleRoot {
            locale: default_locale,
            dir: docs_dir,
        }])
    }

    /// Create a source reading exactly `locales`.
    ///
    /// The default locale reads `docs_dir`; every other locale reads
    /// `<i18n_dir>/<locale>/docs`. When `locales` leaves out the default
    /// locale, `docs_dir` is not scanned.
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded H1 regex is invalid (compile-time constant, never fails).
    #[must_use]
    pub fn for_locales(
        docs_dir: &Path,
        default_locale: &Locale,
        i18n_dir: &Path,
        locales: &[Locale],
    ) -> Self {
        let roots = locales
            .iter()
            .map(|locale| LocaleRoot {
                locale: locale.clone(),
                dir: if locale == default_locale {
                    docs_dir.to_path_buf()
                } else {
                    translation_dir(i18n_dir, locale)
                },
            })
            .collect();
        Self::with_roots(roots)
    }

    fn with_roots(roots: Vec<LocaleRoot>) -> Self {
        Self {
            roots,
            navigation_path: None,
            homepage_path: None,
            h1_regex: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
        }
    }

    /// Add translated locales stored under `<i18n_dir>/<locale>/docs`.
    #[must_use]
    pub fn with_translations(mut self, i18n_dir: &Path, locales: &[Locale]) -> Self {
        for locale in locales {
            if self.roots.iter().any(|r| &r.locale == locale) {
                continue;
            }
            self.roots.push(LocaleRoot {
                locale: locale.clone(),
                dir: translation_dir(i18n_dir, locale),
            });
        }
        self
    }

    /// Set the navigation YAML file.
    #[must_use]
    pub fn with_navigation(mut self, path: PathBuf) -> Self {
        self.navigation_path = Some(path);
        self
    }

    /// Set the homepage YAML file; a missing file means no homepage.
    #[must_use]
    pub fn with_homepage(mut self, path: PathBuf) -> Self {
        self.homepage_path = Some(path);
        self
    }

    fn read_file(path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path).map_err(|e| SourceError::io(e, path).with_backend(BACKEND))
    }

    fn build_page(&self, locale: &Locale, page_ref: &PageRef) -> Result<ContentPage, SourceError> {
        let content = Self::read_file(&page_ref.abs_path)?;
        let (yaml, body) = frontmatter::split(&content);
        let front = match yaml {
            Some(yaml) => frontmatter::parse(yaml).map_err(|e| {
                SourceError::invalid_format(&page_ref.abs_path, e).with_backend(BACKEND)
            })?,
            None => frontmatter::FrontMatter::default(),
        };

        let id = page_identifier(&page_ref.rel_path, front.id.as_deref());
        let title = front
            .title
            .or_else(|| self.extract_h1(body))
            .unwrap_or_else(|| Self::title_from_filename(&page_ref.rel_path));

        let mut page = ContentPage::new(id, locale.clone(), title)
            .with_parent_path(path_segments(&page_ref.rel_path))
            .with_source_path(&page_ref.rel_path)
            .with_links(extract_links(body));
        if let Some(slug) = front.slug {
            page = page.with_slug(slug);
        }
        if let Some(description) = front.description {
            page = page.with_description(description.trim_end());
        }
        Ok(page)
    }

    fn extract_h1(&self, body: &str) -> Option<String> {
        self.h1_regex
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_owned())
    }

    fn title_from_filename(rel_path: &Path) -> String {
        rel_path
            .file_stem()
            .map(|s| titlecase_from_slug(&s.to_string_lossy()))
            .unwrap_or_default()
    }
}

impl ContentSource for FsSource {
    fn scan(&self) -> Result<Vec<ContentPage>, SourceError> {
        let mut pages = Vec::new();
        for root in &self.roots {
            if !root.dir.is_dir() {
                tracing::warn!(
                    locale = %root.locale,
                    path = %root.dir.display(),
                    "Docs directory not found"
                );
                continue;
            }
            let refs = Scanner::new(root.dir.clone()).scan();
            let built = refs
                .par_iter()
                .map(|page_ref| self.build_page(&root.locale, page_ref))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::debug!(locale = %root.locale, pages = built.len(), "Scanned docs");
            pages.extend(built);
        }
        Ok(pages)
    }

    fn navigation(&self) -> Result<NavigationSpec, SourceError> {
        let Some(path) = &self.navigation_path else {
            return Ok(NavigationSpec::default());
        };
        let content = Self::read_file(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| SourceError::invalid_format(path, e).with_backend(BACKEND))
    }

    fn homepage(&self) -> Result<Option<HomepageSpec>, SourceError> {
        let Some(path) = &self.homepage_path else {
            return Ok(None);
        };
        match Self::read_file(path) {
            Ok(content) => serde_yaml::from_str(&content)
                .map(Some)
                .map_err(|e| SourceError::invalid_format(path, e).with_backend(BACKEND)),
            Err(e) if e.kind == SourceErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
