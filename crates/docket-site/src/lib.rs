//! Content registry, navigation model and build gate for Docket.
//!
//! This crate turns a declarative site description into a validated,
//! cross-linked model:
//!
//! - [`ContentRegistry`]: documentation pages keyed by `(identifier, locale)`
//! - [`NavigationModel`]: sidebars, navbar and footer built from a [`NavigationSpec`]
//! - [`resolve`] / [`resolve_site`]: reference resolution into a [`BuildReport`]
//! - [`evaluate`] / [`validate`]: the build gate producing a [`ValidatedSite`]
//! - [`compose`]: page descriptors for the renderer
//!
//! # Quick Start
//!
//! ```ignore
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docket_site::{BuildPolicy, ComposeOptions, SiteInputs, SiteSettings, compose, validate};
//! # let source = docket_site::MockSource::new();
//!
//! let inputs = SiteInputs::load(&source, &SiteSettings::default())?;
//! let site = validate(inputs, &BuildPolicy::default())?;
//! let manifest = compose(&site, &ComposeOptions::default());
//! # Ok(())
//! # }
//! ```

mod composer;
mod gate;
mod homepage;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod navigation;
mod page;
mod registry;
mod report;
mod resolver;
mod site;
mod source;

pub use composer::{
    ComposeOptions, FooterManifest, HomepageManifest, LinkGroupManifest, LinkManifest,
    LocaleManifest, NavbarManifest, PageDescriptor, PageLink, SidebarEntry, SidebarManifest,
    SiteManifest, compose,
};
pub use gate::{
    BuildPolicy, ExternalLinkPolicy, GateDecision, GateFailure, Severity, ValidatedSite,
    Violation, evaluate, evaluate_all, validate,
};
pub use homepage::{Action, ContentBlock, Feature, Homepage, HomepageError, HomepageSpec, Stat, Step};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;
pub use navigation::{
    NavOptions, NavPath, NavigationError, NavigationModel, NavigationSpec, NodeRef,
};
pub use page::{ContentPage, Locale, is_valid_identifier};
pub use registry::{ContentRegistry, RegistryError};
pub use report::{
    BuildReport, ClassCounts, ReferenceClass, ReferenceOutcome, Resolution, ResolutionResult,
    UnresolvedReason,
};
pub use resolver::{RouteTable, resolve, resolve_locales, resolve_site, resolve_with_routes};
pub use site::{LoadError, SiteInputs, SiteSettings};
pub use source::{ContentSource, SourceError, SourceErrorKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{EntrySpec, ItemSpec, SidebarSpec};
    use pretty_assertions::assert_eq;

    fn en() -> Locale {
        Locale::from("en")
    }

    fn registry() -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        registry
            .register(ContentPage::new("intro", en(), "Introduction"))
            .unwrap();
        registry
            .register(ContentPage::new("guides/quickstart", en(), "Quickstart"))
            .unwrap();
        registry
    }

    fn model(items: Vec<ItemSpec>) -> NavigationModel {
        let spec = NavigationSpec {
            sidebars: vec![SidebarSpec {
                name: "docs".to_owned(),
                items,
            }],
            ..NavigationSpec::default()
        };
        NavigationModel::from_spec(&spec, &NavOptions::default()).unwrap()
    }

    fn id(id: &str) -> ItemSpec {
        ItemSpec::Id(id.to_owned())
    }

    #[test]
    fn test_missing_guide_aborts_build() {
        let nav = model(vec![
            id("intro"),
            ItemSpec::Entry(EntrySpec {
                kind: Some("category".to_owned()),
                label: Some("Guides".to_owned()),
                items: Some(vec![id("guides/quickstart"), id("guides/missing")]),
                ..EntrySpec::default()
            }),
        ]);

        let report = resolve(&nav, &registry(), &en());

        let resolved: Vec<_> = report
            .outcomes()
            .iter()
            .filter_map(|o| o.result.page().map(ContentPage::id))
            .collect();
        assert_eq!(resolved, ["intro", "guides/quickstart"]);
        let unresolved: Vec<_> = report.unresolved().collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].target, "guides/missing");
        assert_eq!(
            unresolved[0].result,
            ResolutionResult::Unresolved(UnresolvedReason::TargetNotFound)
        );
        assert_eq!(
            unresolved[0].path.to_string(),
            "sidebar:docs > Guides > guides/missing"
        );

        let decision = evaluate(&report, &BuildPolicy::default());
        let GateDecision::Abort { violations, .. } = decision else {
            panic!("expected abort");
        };
        let targets: Vec<_> = violations.iter().map(|v| v.outcome.target.as_str()).collect();
        assert_eq!(targets, ["guides/missing"]);
    }

    #[test]
    fn test_external_only_navigation_proceeds() {
        let nav = model(vec![ItemSpec::Entry(EntrySpec {
            kind: Some("link".to_owned()),
            href: Some("https://example.com".to_owned()),
            ..EntrySpec::default()
        })]);

        let report = resolve(&nav, &registry(), &en());
        let decision = evaluate(&report, &BuildPolicy::default());

        assert_eq!(report.unresolved_count(), 0);
        assert_eq!(decision, GateDecision::Proceed { warnings: vec![] });
    }

    #[test]
    fn test_load_validate_compose_pipeline() {
        let nav: NavigationSpec = serde_yaml::from_str(
            r"
sidebars:
  docs:
    - intro
    - guides/quickstart
navbar:
  items:
    - { to: /docs/intro, label: Docs }
",
        )
        .unwrap();
        let source = MockSource::new()
            .with_page(ContentPage::new("intro", en(), "Introduction"))
            .with_page(
                ContentPage::new("guides/quickstart", en(), "Quickstart")
                    .with_links(vec!["./missing.md".to_owned()]),
            )
            .with_navigation(nav);

        let inputs = SiteInputs::load(&source, &SiteSettings::default()).unwrap();
        let site = validate(inputs, &BuildPolicy::default()).unwrap();

        assert_eq!(site.warnings().len(), 1);
        assert_eq!(site.warnings()[0].outcome.class, ReferenceClass::Content);

        let manifest = compose(&site, &ComposeOptions::default());
        assert_eq!(manifest.locales[0].pages.len(), 2);
        assert_eq!(
            manifest.locales[0].navbar.items[0].href.as_deref(),
            Some("/docs/intro")
        );
    }

    #[test]
    fn test_validate_rejects_broken_navigation() {
        let source = MockSource::new()
            .with_page(ContentPage::new("intro", en(), "Introduction"))
            .with_navigation(NavigationSpec {
                sidebars: vec![SidebarSpec {
                    name: "docs".to_owned(),
                    items: vec![id("intro"), id("gone")],
                }],
                ..NavigationSpec::default()
            });

        let inputs = SiteInputs::load(&source, &SiteSettings::default()).unwrap();
        let failure = validate(inputs, &BuildPolicy::default()).unwrap_err();

        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].outcome.target, "gone");
        assert_eq!(failure.reports.len(), 1);
        assert_eq!(failure.to_string(), "Build aborted: 1 unresolved reference(s)");
    }
}
