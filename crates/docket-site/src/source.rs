//! Content source trait and error types.
//!
//! A [`ContentSource`] supplies the three inputs of a build: documentation
//! pages, the navigation description and the homepage blocks. Sources do
//! all their I/O up front; nothing downstream touches storage.

use std::path::PathBuf;

use crate::homepage::HomepageSpec;
use crate::navigation::NavigationSpec;
use crate::page::ContentPage;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Required file or directory does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// File exists but could not be parsed.
    InvalidFormat,
    /// Other/unknown error category.
    Other,
}

/// Content source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn invalid_format(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(SourceErrorKind::InvalidFormat)
            .with_path(path)
            .with_source(source)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            _ => SourceErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidFormat => "Invalid format",
            SourceErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Supplier of pages, navigation and homepage data.
pub trait ContentSource: Send + Sync {
    /// Scan every page of every locale.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a page cannot be read or its front matter
    /// cannot be parsed.
    fn scan(&self) -> Result<Vec<ContentPage>, SourceError>;

    /// Read the navigation description.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the description is missing or malformed.
    fn navigation(&self) -> Result<NavigationSpec, SourceError>;

    /// Read the homepage blocks, if the site has a homepage file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file exists but cannot be read or parsed.
    fn homepage(&self) -> Result<Option<HomepageSpec>, SourceError>;
}
