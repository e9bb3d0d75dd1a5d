//! Loading site inputs from a content source.

use crate::homepage::{Homepage, HomepageError};
use crate::navigation::{NavOptions, NavigationError, NavigationModel};
use crate::page::Locale;
use crate::registry::{ContentRegistry, RegistryError};
use crate::resolver::RouteTable;
use crate::source::{ContentSource, SourceError};

/// Error raised before resolution starts.
///
/// Any of these means the input itself is not well-formed, so no report
/// is produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Homepage(#[from] HomepageError),
}

/// Site-wide settings needed to load and resolve a site.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    /// Locales to build, default locale first.
    pub locales: Vec<Locale>,
    pub nav: NavOptions,
    pub routes: RouteTable,
    /// Homepage variant to render; required when several exist.
    pub homepage_variant: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            locales: vec![Locale::from("en")],
            nav: NavOptions::default(),
            routes: RouteTable::default(),
            homepage_variant: None,
        }
    }
}

/// Everything the resolver reads: a populated registry, the navigation
/// model and the selected homepage.
///
/// Immutable once loaded and shared read-only across locale workers.
#[derive(Debug)]
pub struct SiteInputs {
    registry: ContentRegistry,
    navigation: NavigationModel,
    homepage: Option<Homepage>,
    routes: RouteTable,
    locales: Vec<Locale>,
}

impl SiteInputs {
    #[must_use]
    pub fn new(
        registry: ContentRegistry,
        navigation: NavigationModel,
        homepage: Option<Homepage>,
        routes: RouteTable,
        locales: Vec<Locale>,
    ) -> Self {
        Self {
            registry,
            navigation,
            homepage,
            routes,
            locales,
        }
    }

    /// Load and build all inputs from a source.
    ///
    /// Pages in locales that are not configured are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source fails, a page identifier or
    /// route is duplicated, the navigation is malformed, or the homepage
    /// variant cannot be selected.
    pub fn load(source: &dyn ContentSource, settings: &SiteSettings) -> Result<Self, LoadError> {
        let mut registry = ContentRegistry::new();
        for page in source.scan()? {
            if !settings.locales.contains(page.locale()) {
                tracing::warn!(
                    id = page.id(),
                    locale = %page.locale(),
                    "Skipping page in unconfigured locale"
                );
                continue;
            }
            registry.register(page)?;
        }

        let navigation = NavigationModel::from_spec(&source.navigation()?, &settings.nav)?;

        let homepage = match source.homepage()? {
            Some(spec) => Some(spec.select(settings.homepage_variant.as_deref())?),
            None => None,
        };

        tracing::info!(
            pages = registry.len(),
            locales = settings.locales.len(),
            "Loaded site inputs"
        );

        Ok(Self::new(
            registry,
            navigation,
            homepage,
            settings.routes.clone(),
            settings.locales.clone(),
        ))
    }

    #[must_use]
    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationModel {
        &self.navigation
    }

    #[must_use]
    pub fn homepage(&self) -> Option<&Homepage> {
        self.homepage.as_ref()
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Configured locales, default first.
    #[must_use]
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homepage::{ContentBlock, HomepageSpec};
    use crate::mock::MockSource;
    use crate::navigation::{ItemSpec, NavigationSpec, SidebarSpec};
    use crate::page::ContentPage;

    static_assertions::assert_impl_all!(SiteInputs: Send, Sync);

    fn en(id: &str) -> ContentPage {
        ContentPage::new(id, Locale::from("en"), id)
    }

    fn sidebar(items: &[&str]) -> NavigationSpec {
        NavigationSpec {
            sidebars: vec![SidebarSpec {
                name: "docs".to_owned(),
                items: items.iter().map(|&i| ItemSpec::Id(i.to_owned())).collect(),
            }],
            ..NavigationSpec::default()
        }
    }

    fn hero(title: &str) -> Vec<ContentBlock> {
        vec![ContentBlock::Hero {
            title: title.to_owned(),
            subtitle: None,
            actions: Vec::new(),
        }]
    }

    #[test]
    fn test_load_builds_registry_and_navigation() {
        let source = MockSource::new()
            .with_pages([en("intro"), en("guides/quickstart")])
            .with_navigation(sidebar(&["intro"]));

        let inputs = SiteInputs::load(&source, &SiteSettings::default()).unwrap();

        assert_eq!(inputs.registry().len(), 2);
        assert_eq!(inputs.navigation().sidebars().len(), 1);
        assert!(inputs.homepage().is_none());
    }

    #[test]
    fn test_load_skips_unconfigured_locale() {
        let source = MockSource::new()
            .with_page(en("intro"))
            .with_page(ContentPage::new("intro", Locale::from("de"), "Einleitung"));

        let inputs = SiteInputs::load(&source, &SiteSettings::default()).unwrap();

        assert_eq!(inputs.registry().len(), 1);
        assert!(inputs.registry().lookup("intro", &Locale::from("de")).is_none());
    }

    #[test]
    fn test_load_duplicate_identifier_aborts() {
        let source = MockSource::new().with_pages([en("intro"), en("intro")]);

        let err = SiteInputs::load(&source, &SiteSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Registry(RegistryError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn test_load_missing_navigation_aborts() {
        let source = MockSource::new().without_navigation();

        let err = SiteInputs::load(&source, &SiteSettings::default()).unwrap_err();
        assert!(matches!(err, LoadError::Source(_)));
    }

    #[test]
    fn test_load_ambiguous_homepage_aborts() {
        let mut homepage = HomepageSpec::default();
        homepage.variants.insert("a".to_owned(), hero("A"));
        homepage.variants.insert("b".to_owned(), hero("B"));
        let source = MockSource::new().with_homepage(homepage.clone());

        let err = SiteInputs::load(&source, &SiteSettings::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Homepage(HomepageError::VariantNotSelected { .. })
        ));

        let settings = SiteSettings {
            homepage_variant: Some("b".to_owned()),
            ..SiteSettings::default()
        };
        let source = MockSource::new().with_homepage(homepage);
        let inputs = SiteInputs::load(&source, &settings).unwrap();
        assert_eq!(inputs.homepage().unwrap().variant(), "b");
    }
}
