//! Reference resolution.
//!
//! Turns every reference of a locale into a [`ReferenceOutcome`]:
//!
//! - navigation leaves (sidebars, navbar, footer) and homepage actions are
//!   the navigation class;
//! - links written inside page bodies are the content class.
//!
//! Resolution is a pure function over immutable inputs; it never mutates the
//! registry or the navigation model and never consults another locale.

use std::collections::HashMap;
use std::path::Path;

use percent_encoding::percent_decode_str;
use rayon::prelude::*;

use crate::navigation::{LeafKind, NavLeaf, NavPath, NavigationModel, RefTarget, is_external_url};
use crate::page::{ContentPage, Locale, is_valid_identifier};
use crate::registry::ContentRegistry;
use crate::report::{
    BuildReport, ReferenceClass, ReferenceOutcome, Resolution, ResolutionResult, UnresolvedReason,
};
use crate::site::SiteInputs;

/// Known site routes: the docs route base and static routes outside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    docs_base: String,
    static_routes: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new("docs", vec!["/".to_owned()])
    }
}

impl RouteTable {
    /// Create a route table; surrounding slashes are ignored.
    #[must_use]
    pub fn new(docs_base: impl Into<String>, static_routes: Vec<String>) -> Self {
        let docs_base: String = docs_base.into();
        Self {
            docs_base: docs_base.trim_matches('/').to_owned(),
            static_routes: static_routes
                .iter()
                .map(|r| r.trim_matches('/').to_owned())
                .collect(),
        }
    }

    /// Docs route base without slashes (`""` when docs are served at `/`).
    #[must_use]
    pub fn docs_base(&self) -> &str {
        &self.docs_base
    }

    /// Site route for a page permalink, e.g. `/docs/guides/quickstart`.
    #[must_use]
    pub fn page_route(&self, permalink: &str) -> String {
        match (self.docs_base.is_empty(), permalink.is_empty()) {
            (true, _) => format!("/{permalink}"),
            (false, true) => format!("/{}", self.docs_base),
            (false, false) => format!("/{}/{permalink}", self.docs_base),
        }
    }

    /// Permalink below the docs base, if the route is inside it.
    fn docs_permalink<'a>(&self, route: &'a str) -> Option<&'a str> {
        if self.docs_base.is_empty() {
            return Some(route);
        }
        let rest = route.strip_prefix(self.docs_base.as_str())?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('/')
        }
    }

    fn is_static(&self, route: &str) -> bool {
        self.static_routes.iter().any(|r| r == route)
    }
}

/// Drop `#fragment` and `?query`.
fn strip_suffixes(target: &str) -> &str {
    target.split(['#', '?']).next().unwrap_or_default()
}

fn unresolved(reason: UnresolvedReason) -> ResolutionResult {
    ResolutionResult::Unresolved(reason)
}

fn resolve_id(id: &str, registry: &ContentRegistry, locale: &Locale) -> ResolutionResult {
    if !is_valid_identifier(id) {
        return unresolved(UnresolvedReason::InvalidIdentifier);
    }
    match registry.lookup(id, locale) {
        Some(page) => ResolutionResult::Resolved(Resolution::Page(page.clone())),
        None => unresolved(UnresolvedReason::TargetNotFound),
    }
}

/// Resolve a site route such as `/docs/intro#setup` or `/`.
fn resolve_route(
    route: &str,
    registry: &ContentRegistry,
    locale: &Locale,
    routes: &RouteTable,
) -> ResolutionResult {
    let stripped = strip_suffixes(route);
    if stripped.is_empty() {
        return unresolved(UnresolvedReason::InvalidIdentifier);
    }
    let trimmed = stripped.trim_matches('/');
    if !trimmed.is_empty() && !is_valid_identifier(trimmed) {
        return unresolved(UnresolvedReason::InvalidIdentifier);
    }

    if let Some(permalink) = routes.docs_permalink(trimmed)
        && let Some(page) = registry.lookup_route(permalink, locale)
    {
        return ResolutionResult::Resolved(Resolution::Page(page.clone()));
    }
    if routes.is_static(trimmed) {
        return ResolutionResult::Resolved(Resolution::StaticRoute {
            route: format!("/{trimmed}"),
        });
    }
    unresolved(UnresolvedReason::TargetNotFound)
}

pub(crate) fn resolve_leaf(
    leaf: &NavLeaf,
    registry: &ContentRegistry,
    locale: &Locale,
    routes: &RouteTable,
) -> ResolutionResult {
    match &leaf.kind {
        LeafKind::External { url } => {
            ResolutionResult::Resolved(Resolution::External { url: url.clone() })
        }
        LeafKind::Internal {
            target: RefTarget::Doc(id),
        } => resolve_id(id, registry, locale),
        LeafKind::Internal {
            target: RefTarget::Route(route),
        } => resolve_route(route, registry, locale, routes),
    }
}

fn push_leaf(
    report: &mut BuildReport,
    path: NavPath,
    leaf: &NavLeaf,
    registry: &ContentRegistry,
    locale: &Locale,
    routes: &RouteTable,
) {
    report.push(ReferenceOutcome {
        path,
        class: ReferenceClass::Navigation,
        target: leaf.target().to_owned(),
        result: resolve_leaf(leaf, registry, locale, routes),
    });
}

/// Resolve every navigation leaf of a locale with the default route table.
///
/// External leaves are recorded as resolved without checking; internal
/// leaves must name a page of `locale` (or a known site route).
#[must_use]
pub fn resolve(nav: &NavigationModel, registry: &ContentRegistry, locale: &Locale) -> BuildReport {
    resolve_with_routes(nav, registry, locale, &RouteTable::default())
}

/// Resolve every navigation leaf of a locale.
#[must_use]
pub fn resolve_with_routes(
    nav: &NavigationModel,
    registry: &ContentRegistry,
    locale: &Locale,
    routes: &RouteTable,
) -> BuildReport {
    let mut report = BuildReport::new(locale.clone());
    for (path, leaf) in nav.leaves() {
        push_leaf(&mut report, path, leaf, registry, locale, routes);
    }
    report
}

/// Normalize `base/link`, applying `.` and `..` segments.
///
/// Returns `None` when the link climbs above the docs root.
fn join_relative(base: &Path, link: &str) -> Option<String> {
    let mut segments: Vec<String> = if link.starts_with('/') {
        Vec::new()
    } else {
        base.iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    };
    for segment in link.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other.to_owned()),
        }
    }
    Some(segments.join("/"))
}

/// Pages of a locale keyed by source path relative to the docs root.
struct SourceIndex<'a> {
    by_source: HashMap<String, &'a ContentPage>,
}

impl<'a> SourceIndex<'a> {
    fn new(pages: &'a [ContentPage]) -> Self {
        let by_source = pages
            .iter()
            .filter_map(|page| {
                let source = page.source_path()?.to_string_lossy().replace('\\', "/");
                Some((source, page))
            })
            .collect();
        Self { by_source }
    }
}

/// Directory of a page relative to the docs root.
fn page_dir(page: &ContentPage) -> &Path {
    match page.source_path() {
        Some(source) => source.parent().unwrap_or(Path::new("")),
        None => Path::new(page.id()).parent().unwrap_or(Path::new("")),
    }
}

/// Resolve a link written in a page body.
///
/// Returns `None` for links that are not checked: external URLs, in-page
/// fragments and bare relative routes.
fn resolve_content_link(
    page: &ContentPage,
    link: &str,
    registry: &ContentRegistry,
    sources: &SourceIndex<'_>,
    routes: &RouteTable,
) -> Option<ResolutionResult> {
    if link.starts_with('#') || is_external_url(link) {
        return None;
    }
    let path = strip_suffixes(link);
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let locale = page.locale();

    let is_file = Path::new(&*decoded)
        .extension()
        .is_some_and(|ext| ext == "md" || ext == "mdx");
    if is_file {
        let Some(file) = join_relative(page_dir(page), &decoded) else {
            return Some(unresolved(UnresolvedReason::InvalidIdentifier));
        };
        if let Some(target) = sources.by_source.get(&file) {
            return Some(ResolutionResult::Resolved(Resolution::Page((*target).clone())));
        }
        // Pages without a recorded source fall back to their identifier
        let id = file
            .strip_suffix(".mdx")
            .or_else(|| file.strip_suffix(".md"))
            .unwrap_or(&file);
        return Some(resolve_id(id, registry, locale));
    }

    if decoded.starts_with('/') {
        return Some(resolve_route(&decoded, registry, locale, routes));
    }
    None
}

/// Resolve navigation, homepage and in-body links of one locale.
///
/// Outcomes are ordered: navigation walk, then homepage actions, then pages
/// in registration order with their links in document order.
#[must_use]
pub fn resolve_site(inputs: &SiteInputs, locale: &Locale) -> BuildReport {
    let registry = inputs.registry();
    let routes = inputs.routes();
    let mut report = resolve_with_routes(inputs.navigation(), registry, locale, routes);

    if let Some(homepage) = inputs.homepage() {
        for (path, leaf) in homepage.links() {
            push_leaf(&mut report, path.clone(), leaf, registry, locale, routes);
        }
    }

    let pages = registry.all(locale);
    let sources = SourceIndex::new(pages);
    for page in pages {
        for link in page.links() {
            let Some(result) = resolve_content_link(page, link, registry, &sources, routes)
            else {
                continue;
            };
            report.push(ReferenceOutcome {
                path: NavPath::root(format!("page:{}", page.id())),
                class: ReferenceClass::Content,
                target: link.clone(),
                result,
            });
        }
    }

    tracing::info!(
        locale = %locale,
        references = report.outcomes().len(),
        unresolved = report.unresolved_count(),
        "Resolved references"
    );
    report
}

/// Resolve every configured locale in parallel.
///
/// Reports are returned in configured locale order.
#[must_use]
pub fn resolve_locales(inputs: &SiteInputs) -> Vec<BuildReport> {
    inputs
        .locales()
        .par_iter()
        .map(|locale| resolve_site(inputs, locale))
        .collect()
}
