//! Content registry.
//!
//! Pages are partitioned by locale. Within a locale they are stored in a
//! flat `Vec<ContentPage>` in registration order, with identifier and
//! permalink indexes for O(1) lookups:
//!
//! - `lookup` by identifier (sidebar `doc` entries)
//! - `lookup_route` by permalink (navbar/footer `to:` links)
//!
//! Registration order is kept for enumeration since downstream ordering may
//! fall back to source order when navigation does not say otherwise.

use std::collections::HashMap;

use crate::page::{ContentPage, Locale};

/// Error returned when registering a page.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Another page already uses this identifier in the locale.
    #[error("Duplicate page identifier '{id}' in locale '{locale}'")]
    DuplicateIdentifier {
        /// Conflicting identifier.
        id: String,
        /// Locale of both pages.
        locale: Locale,
    },
    /// Another page already serves this permalink in the locale.
    #[error("Pages '{existing}' and '{id}' both resolve to route '/{route}' in locale '{locale}'")]
    DuplicateRoute {
        /// Permalink both pages claim.
        route: String,
        /// Identifier of the page registered first.
        existing: String,
        /// Identifier of the rejected page.
        id: String,
        /// Locale of both pages.
        locale: Locale,
    },
}

#[derive(Debug, Default)]
struct LocalePages {
    pages: Vec<ContentPage>,
    by_id: HashMap<String, usize>,
    by_route: HashMap<String, usize>,
}

impl LocalePages {
    fn reindex(&mut self) {
        self.by_id = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.id().to_owned(), i))
            .collect();
        self.by_route = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.permalink().to_owned(), i))
            .collect();
    }
}

/// Registry of documentation pages keyed by `(identifier, locale)`.
///
/// Populated completely before resolution starts and only read afterwards,
/// so it is shared across locale workers without locking.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    locales: Vec<Locale>,
    partitions: HashMap<Locale, LocalePages>,
}

impl ContentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateIdentifier`] if the identifier is
    /// already taken in the page's locale, or [`RegistryError::DuplicateRoute`]
    /// if another page in the locale already serves the same permalink.
    pub fn register(&mut self, page: ContentPage) -> Result<(), RegistryError> {
        let locale = page.locale().clone();
        if !self.partitions.contains_key(&locale) {
            self.locales.push(locale.clone());
        }
        let partition = self.partitions.entry(locale.clone()).or_default();

        if partition.by_id.contains_key(page.id()) {
            return Err(RegistryError::DuplicateIdentifier {
                id: page.id().to_owned(),
                locale,
            });
        }
        if let Some(&existing) = partition.by_route.get(page.permalink()) {
            return Err(RegistryError::DuplicateRoute {
                route: page.permalink().to_owned(),
                existing: partition.pages[existing].id().to_owned(),
                id: page.id().to_owned(),
                locale,
            });
        }

        let idx = partition.pages.len();
        partition.by_id.insert(page.id().to_owned(), idx);
        partition.by_route.insert(page.permalink().to_owned(), idx);
        tracing::debug!(id = page.id(), locale = %locale, "Registered page");
        partition.pages.push(page);
        Ok(())
    }

    /// Look up a page by identifier within a locale.
    ///
    /// Absence is a normal result; another locale is never consulted.
    #[must_use]
    pub fn lookup(&self, id: &str, locale: &Locale) -> Option<&ContentPage> {
        let partition = self.partitions.get(locale)?;
        partition.by_id.get(id).map(|&i| &partition.pages[i])
    }

    /// Look up a page by permalink (route below the docs base, no slashes).
    #[must_use]
    pub fn lookup_route(&self, route: &str, locale: &Locale) -> Option<&ContentPage> {
        let partition = self.partitions.get(locale)?;
        partition.by_route.get(route).map(|&i| &partition.pages[i])
    }

    /// All pages of a locale in registration order.
    #[must_use]
    pub fn all(&self, locale: &Locale) -> &[ContentPage] {
        self.partitions
            .get(locale)
            .map_or(&[], |partition| partition.pages.as_slice())
    }

    /// Remove a page, returning it if it was registered.
    ///
    /// Removing the last page of a locale forgets the locale.
    pub fn remove(&mut self, id: &str, locale: &Locale) -> Option<ContentPage> {
        let partition = self.partitions.get_mut(locale)?;
        let idx = *partition.by_id.get(id)?;
        let page = partition.pages.remove(idx);
        if partition.pages.is_empty() {
            self.partitions.remove(locale);
            self.locales.retain(|l| l != locale);
        } else {
            partition.reindex();
        }
        Some(page)
    }

    /// Locales with at least one registration, in first-seen order.
    #[must_use]
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Total number of pages across all locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.values().map(|p| p.pages.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
