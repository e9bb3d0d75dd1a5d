//! Page descriptor assembly.
//!
//! Consumes a [`ValidatedSite`] and produces a [`SiteManifest`]: every doc
//! page with its permalink, sidebar membership, breadcrumbs and pagination,
//! plus sidebars, navbar and footer with concrete hrefs. Rendering is left
//! to whatever consumes the manifest.

use std::collections::HashMap;

use serde::Serialize;

use crate::gate::ValidatedSite;
use crate::homepage::ContentBlock;
use crate::navigation::{LeafKind, LinkGroup, NavLeaf, NavNode, RefTarget, Sidebar};
use crate::page::{ContentPage, Locale};
use crate::registry::ContentRegistry;
use crate::report::{Resolution, ResolutionResult};
use crate::resolver::{RouteTable, resolve_leaf};

/// Site-wide settings that shape hrefs.
#[derive(Clone, Debug)]
pub struct ComposeOptions {
    pub title: String,
    pub tagline: Option<String>,
    /// Path the site is served under, e.g. `/` or `/jobel/`.
    pub base_url: String,
    /// Append `/` to generated page hrefs.
    pub trailing_slash: bool,
    /// Prefix for "edit this page" links; the source path is appended.
    pub edit_url: Option<String>,
    /// Locale served without a prefix; the first built locale when unset.
    pub default_locale: Option<Locale>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            tagline: None,
            base_url: "/".to_owned(),
            trailing_slash: false,
            edit_url: None,
            default_locale: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteManifest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub base_url: String,
    pub locales: Vec<LocaleManifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<HomepageManifest>,
}

/// Everything rendered for one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleManifest {
    pub locale: Locale,
    pub pages: Vec<PageDescriptor>,
    pub sidebars: Vec<SidebarManifest>,
    pub navbar: NavbarManifest,
    pub footer: FooterManifest,
}

/// A renderable doc page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub href: String,
    /// First sidebar listing the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    /// Category labels from the sidebar root to the page.
    pub breadcrumbs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub title: String,
    pub href: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarManifest {
    pub name: String,
    pub items: Vec<SidebarEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarEntry {
    Category {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        collapsed: bool,
        items: Vec<SidebarEntry>,
    },
    Link(LinkManifest),
}

/// A leaf with its final href.
///
/// `href` is `None` only for references the gate let through unresolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkManifest {
    pub label: String,
    pub href: Option<String>,
    pub external: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavbarManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<LinkManifest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterManifest {
    pub groups: Vec<LinkGroupManifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkGroupManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<LinkManifest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HomepageManifest {
    pub variant: String,
    pub blocks: Vec<ContentBlock>,
}

/// Builds hrefs for one locale.
struct Linker<'a> {
    registry: &'a ContentRegistry,
    routes: &'a RouteTable,
    locale: &'a Locale,
    /// `base_url` without trailing slash plus the locale prefix.
    prefix: String,
    trailing_slash: bool,
}

impl Linker<'_> {
    fn site_href(&self, route: &str) -> String {
        let mut href = format!("{}{route}", self.prefix);
        if self.trailing_slash && !href.ends_with('/') {
            href.push('/');
        }
        if href.is_empty() {
            href.push('/');
        }
        href
    }

    fn page_href(&self, page: &ContentPage) -> String {
        self.site_href(&self.routes.page_route(page.permalink()))
    }

    fn leaf(&self, leaf: &NavLeaf) -> LinkManifest {
        let result = resolve_leaf(leaf, self.registry, self.locale, self.routes);
        let (href, title) = match &result {
            ResolutionResult::Resolved(Resolution::Page(page)) => {
                let mut href = self.page_href(page);
                if let LeafKind::Internal {
                    target: RefTarget::Route(route),
                } = &leaf.kind
                    && let Some((_, fragment)) = route.split_once('#')
                {
                    href = format!("{href}#{fragment}");
                }
                (Some(href), Some(page.title().to_owned()))
            }
            ResolutionResult::Resolved(Resolution::StaticRoute { route }) => {
                (Some(self.site_href(route)), None)
            }
            ResolutionResult::Resolved(Resolution::External { url }) => (Some(url.clone()), None),
            ResolutionResult::Unresolved(_) => (None, None),
        };
        LinkManifest {
            label: leaf
                .label
                .clone()
                .or(title)
                .unwrap_or_else(|| leaf.target().to_owned()),
            href,
            external: matches!(leaf.kind, LeafKind::External { .. }),
        }
    }

    fn group(&self, group: &LinkGroup) -> Vec<LinkManifest> {
        group.items.iter().map(|leaf| self.leaf(leaf)).collect()
    }

    fn sidebar_entries(&self, nodes: &[NavNode]) -> Vec<SidebarEntry> {
        nodes
            .iter()
            .map(|node| match node {
                NavNode::Category(category) => SidebarEntry::Category {
                    label: category.label.clone(),
                    collapsed: category.collapsed,
                    items: self.sidebar_entries(&category.items),
                },
                NavNode::Leaf(leaf) => SidebarEntry::Link(self.leaf(leaf)),
            })
            .collect()
    }
}

/// Doc leaf position inside a sidebar.
struct Placement {
    sidebar: String,
    breadcrumbs: Vec<String>,
    previous: Option<String>,
    next: Option<String>,
}

/// Doc identifiers of a sidebar in reading order, with their category labels.
fn sidebar_docs(sidebar: &Sidebar) -> Vec<(String, Vec<String>)> {
    fn collect(nodes: &[NavNode], trail: &mut Vec<String>, out: &mut Vec<(String, Vec<String>)>) {
        for node in nodes {
            match node {
                NavNode::Category(category) => {
                    trail.push(category.label.clone().unwrap_or_default());
                    collect(&category.items, trail, out);
                    trail.pop();
                }
                NavNode::Leaf(NavLeaf {
                    kind:
                        LeafKind::Internal {
                            target: RefTarget::Doc(id),
                        },
                    ..
                }) => {
                    if !out.iter().any(|(seen, _)| seen == id) {
                        out.push((id.clone(), trail.clone()));
                    }
                }
                NavNode::Leaf(_) => {}
            }
        }
    }

    let mut out = Vec::new();
    collect(&sidebar.items, &mut Vec::new(), &mut out);
    out
}

/// Placement of every page listed in a sidebar; the first sidebar wins.
fn placements(sidebars: &[Sidebar], registry: &ContentRegistry, locale: &Locale) -> HashMap<String, Placement> {
    let mut placements = HashMap::new();
    for sidebar in sidebars {
        let docs: Vec<_> = sidebar_docs(sidebar)
            .into_iter()
            .filter(|(id, _)| registry.lookup(id, locale).is_some())
            .collect();
        for (idx, (id, breadcrumbs)) in docs.iter().enumerate() {
            if placements.contains_key(id) {
                continue;
            }
            let previous = idx.checked_sub(1).map(|i| docs[i].0.clone());
            let next = docs.get(idx + 1).map(|(next, _)| next.clone());
            placements.insert(
                id.clone(),
                Placement {
                    sidebar: sidebar.name.clone(),
                    breadcrumbs: breadcrumbs.clone(),
                    previous,
                    next,
                },
            );
        }
    }
    placements
}

fn compose_locale(
    validated: &ValidatedSite,
    locale: &Locale,
    is_default: bool,
    options: &ComposeOptions,
) -> LocaleManifest {
    let inputs = validated.inputs();
    let registry = inputs.registry();
    let nav = inputs.navigation();

    let mut prefix = options.base_url.trim_end_matches('/').to_owned();
    if !is_default {
        prefix = format!("{prefix}/{locale}");
    }
    let linker = Linker {
        registry,
        routes: inputs.routes(),
        locale,
        prefix,
        trailing_slash: options.trailing_slash,
    };

    let placements = placements(nav.sidebars(), registry, locale);
    let page_link = |id: &String| {
        registry.lookup(id, locale).map(|page| PageLink {
            title: page.title().to_owned(),
            href: linker.page_href(page),
        })
    };

    let pages = registry
        .all(locale)
        .iter()
        .map(|page| {
            let placement = placements.get(page.id());
            PageDescriptor {
                id: page.id().to_owned(),
                title: page.title().to_owned(),
                description: page.description().map(str::to_owned),
                href: linker.page_href(page),
                sidebar: placement.map(|p| p.sidebar.clone()),
                breadcrumbs: placement.map(|p| p.breadcrumbs.clone()).unwrap_or_default(),
                previous: placement.and_then(|p| p.previous.as_ref()).and_then(page_link),
                next: placement.and_then(|p| p.next.as_ref()).and_then(page_link),
                edit_url: match (&options.edit_url, page.source_path()) {
                    (Some(base), Some(source)) => Some(format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        source.to_string_lossy().replace('\\', "/")
                    )),
                    _ => None,
                },
            }
        })
        .collect();

    let sidebars = nav
        .sidebars()
        .iter()
        .map(|sidebar| SidebarManifest {
            name: sidebar.name.clone(),
            items: linker.sidebar_entries(&sidebar.items),
        })
        .collect();

    LocaleManifest {
        locale: locale.clone(),
        pages,
        sidebars,
        navbar: NavbarManifest {
            title: nav.navbar().title.clone(),
            items: linker.group(&nav.navbar().links),
        },
        footer: FooterManifest {
            groups: nav
                .footer()
                .groups
                .iter()
                .map(|group| LinkGroupManifest {
                    title: group.label.clone(),
                    items: linker.group(group),
                })
                .collect(),
            copyright: nav.footer().copyright.clone(),
        },
    }
}

/// Assemble descriptors for every configured locale.
///
/// The default locale is served without a locale prefix. Building only
/// other locales keeps their prefixes.
#[must_use]
pub fn compose(validated: &ValidatedSite, options: &ComposeOptions) -> SiteManifest {
    let inputs = validated.inputs();
    let default_locale = options
        .default_locale
        .as_ref()
        .or_else(|| inputs.locales().first());
    let locales = inputs
        .locales()
        .iter()
        .map(|locale| {
            compose_locale(validated, locale, Some(locale) == default_locale, options)
        })
        .collect::<Vec<_>>();

    tracing::info!(
        locales = locales.len(),
        pages = locales.iter().map(|l| l.pages.len()).sum::<usize>(),
        "Composed site manifest"
    );

    SiteManifest {
        title: options.title.clone(),
        tagline: options.tagline.clone(),
        base_url: options.base_url.clone(),
        locales,
        homepage: inputs.homepage().map(|homepage| HomepageManifest {
            variant: homepage.variant().to_owned(),
            blocks: homepage.blocks().to_vec(),
        }),
    }
}
