//! Declarative navigation description and model construction.
//!
//! The YAML shape follows a classic docs site layout:
//!
//! ```yaml
//! sidebars:
//!   tutorialSidebar:
//!     - intro
//!     - type: category
//!       label: Guides
//!       items: [guides/quickstart]
//! navbar:
//!   title: Jobel
//!   items:
//!     - { type: docSidebar, sidebarId: tutorialSidebar, label: Docs }
//!     - { to: /docs/api/overview, label: API }
//! footer:
//!   links:
//!     - title: Community
//!       items:
//!         - { label: Discord, href: "https://discord.gg/jobel" }
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::{
    Footer, LinkGroup, NavCategory, NavLeaf, NavNode, NavOptions, NavPath, Navbar,
    NavigationError, NavigationModel, Sidebar,
};

/// Root of the navigation description.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationSpec {
    /// Sidebars in declared order.
    #[serde(deserialize_with = "deserialize_sidebars")]
    pub sidebars: Vec<SidebarSpec>,
    pub navbar: NavbarSpec,
    pub footer: FooterSpec,
}

/// A named sidebar.
#[derive(Clone, Debug, Default)]
pub struct SidebarSpec {
    pub name: String,
    pub items: Vec<ItemSpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavbarSpec {
    pub title: Option<String>,
    pub items: Vec<ItemSpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FooterSpec {
    pub links: Vec<LinkGroupSpec>,
    pub copyright: Option<String>,
}

/// Footer column.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkGroupSpec {
    pub title: Option<String>,
    pub items: Vec<ItemSpec>,
}

/// A navigation item: a bare doc identifier or a full entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ItemSpec {
    Id(String),
    Entry(EntrySpec),
}

/// Navigation entry as declared.
///
/// The declared `type` is optional; when absent it is inferred from the
/// fields present (`items` → category, `href` → link, `id` → doc).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntrySpec {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(alias = "docId")]
    pub id: Option<String>,
    pub label: Option<String>,
    pub href: Option<String>,
    pub to: Option<String>,
    pub items: Option<Vec<ItemSpec>>,
    pub collapsed: Option<bool>,
    #[serde(rename = "sidebarId")]
    pub sidebar_id: Option<String>,
}

impl EntrySpec {
    fn segment(&self) -> String {
        self.label
            .as_ref()
            .or(self.id.as_ref())
            .or(self.to.as_ref())
            .or(self.href.as_ref())
            .or(self.sidebar_id.as_ref())
            .cloned()
            .unwrap_or_else(|| "(unlabeled)".to_owned())
    }
}

impl ItemSpec {
    fn segment(&self) -> String {
        match self {
            Self::Id(id) => id.clone(),
            Self::Entry(entry) => entry.segment(),
        }
    }
}

fn deserialize_sidebars<'de, D>(deserializer: D) -> Result<Vec<SidebarSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SidebarsVisitor;

    impl<'de> Visitor<'de> for SidebarsVisitor {
        type Value = Vec<SidebarSpec>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping of sidebar names to item lists")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sidebars = Vec::new();
            while let Some((name, items)) = map.next_entry::<String, Vec<ItemSpec>>()? {
                sidebars.push(SidebarSpec { name, items });
            }
            Ok(sidebars)
        }
    }

    deserializer.deserialize_map(SidebarsVisitor)
}

/// Whether a link target carries a URL scheme (or is protocol-relative).
pub(crate) fn is_external_url(target: &str) -> bool {
    if target.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn malformed(path: NavPath, reason: impl Into<String>) -> NavigationError {
    NavigationError::MalformedTree {
        path,
        reason: reason.into(),
    }
}

impl NavigationModel {
    /// Build the model from its declarative description.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MalformedTree`] naming the first offending
    /// entry when the description contradicts itself or nests categories
    /// deeper than `options.max_depth`.
    pub fn from_spec(spec: &NavigationSpec, options: &NavOptions) -> Result<Self, NavigationError> {
        let mut seen = HashSet::new();
        let mut sidebars = Vec::with_capacity(spec.sidebars.len());
        for sidebar in &spec.sidebars {
            let path = NavPath::root(format!("sidebar:{}", sidebar.name));
            if !seen.insert(sidebar.name.as_str()) {
                return Err(malformed(path, "duplicate sidebar name"));
            }
            let items = build_nodes(&sidebar.items, &path, 0, options)?;
            sidebars.push(Sidebar {
                name: sidebar.name.clone(),
                items,
            });
        }

        let navbar = Navbar {
            title: spec.navbar.title.clone(),
            links: LinkGroup {
                label: None,
                items: build_leaves(&spec.navbar.items, &NavPath::root("navbar"), &sidebars)?,
            },
        };

        let mut groups = Vec::with_capacity(spec.footer.links.len());
        for (idx, group) in spec.footer.links.iter().enumerate() {
            let root = match &group.title {
                Some(title) => format!("footer:{title}"),
                None => format!("footer:{idx}"),
            };
            groups.push(LinkGroup {
                label: group.title.clone(),
                items: build_leaves(&group.items, &NavPath::root(root), &sidebars)?,
            });
        }
        let footer = Footer {
            groups,
            copyright: spec.footer.copyright.clone(),
        };

        tracing::debug!(
            sidebars = sidebars.len(),
            navbar = navbar.links.items.len(),
            footer_groups = footer.groups.len(),
            "Built navigation model"
        );
        Ok(Self::new(sidebars, navbar, footer))
    }
}

/// Build sidebar children of a container at `depth` (0 for the sidebar itself).
fn build_nodes(
    items: &[ItemSpec],
    parent: &NavPath,
    depth: usize,
    options: &NavOptions,
) -> Result<Vec<NavNode>, NavigationError> {
    items
        .iter()
        .map(|item| build_node(item, parent, depth, options))
        .collect()
}

fn build_node(
    item: &ItemSpec,
    parent: &NavPath,
    depth: usize,
    options: &NavOptions,
) -> Result<NavNode, NavigationError> {
    let path = parent.child(item.segment());
    let entry = match item {
        ItemSpec::Id(id) => return Ok(NavNode::Leaf(NavLeaf::doc(id.clone(), None))),
        ItemSpec::Entry(entry) => entry,
    };

    let kind = match entry.kind.as_deref() {
        Some(kind) => kind,
        None if entry.items.is_some() => "category",
        None if entry.href.is_some() => "link",
        None if entry.id.is_some() => "doc",
        None => return Err(malformed(path, "cannot infer item type")),
    };

    match kind {
        "doc" => {
            if entry.items.is_some() {
                return Err(malformed(path, "doc entry cannot have items"));
            }
            if entry.href.is_some() || entry.to.is_some() {
                return Err(malformed(path, "doc entry cannot have a link target"));
            }
            let Some(id) = &entry.id else {
                return Err(malformed(path, "doc entry requires 'id'"));
            };
            Ok(NavNode::Leaf(NavLeaf::doc(id.clone(), entry.label.clone())))
        }
        "link" => {
            if entry.items.is_some() {
                return Err(malformed(path, "link entry cannot have items"));
            }
            if entry.to.is_some() {
                return Err(malformed(path, "sidebar link uses 'href', not 'to'"));
            }
            let Some(href) = &entry.href else {
                return Err(malformed(path, "link entry requires 'href'"));
            };
            let leaf = if is_external_url(href) {
                NavLeaf::external(href.clone(), entry.label.clone())
            } else {
                NavLeaf::route(href.clone(), entry.label.clone())
            };
            Ok(NavNode::Leaf(leaf))
        }
        "category" => {
            let Some(children) = &entry.items else {
                return Err(malformed(path, "category requires 'items'"));
            };
            if entry.id.is_some() || entry.href.is_some() || entry.to.is_some() {
                return Err(malformed(path, "category cannot have a link target"));
            }
            if children.is_empty() && entry.label.is_none() {
                return Err(malformed(path, "category has neither children nor label"));
            }
            let depth = depth + 1;
            if depth > options.max_depth {
                return Err(malformed(
                    path,
                    format!(
                        "category nesting depth {depth} exceeds maximum of {}",
                        options.max_depth
                    ),
                ));
            }
            Ok(NavNode::Category(NavCategory {
                label: entry.label.clone(),
                collapsed: entry.collapsed.unwrap_or(true),
                items: build_nodes(children, &path, depth, options)?,
            }))
        }
        "docSidebar" => Err(malformed(
            path,
            "'docSidebar' is only allowed in the navbar and footer",
        )),
        other => Err(malformed(path, format!("unknown item type '{other}'"))),
    }
}

/// Build a flat link group (navbar or footer column).
fn build_leaves(
    items: &[ItemSpec],
    parent: &NavPath,
    sidebars: &[Sidebar],
) -> Result<Vec<NavLeaf>, NavigationError> {
    items
        .iter()
        .map(|item| build_leaf(item, parent, sidebars))
        .collect()
}

fn build_leaf(
    item: &ItemSpec,
    parent: &NavPath,
    sidebars: &[Sidebar],
) -> Result<NavLeaf, NavigationError> {
    let path = parent.child(item.segment());
    let entry = match item {
        ItemSpec::Id(_) => {
            return Err(malformed(path, "link group entries must be mappings"));
        }
        ItemSpec::Entry(entry) => entry,
    };
    if entry.items.is_some() {
        return Err(malformed(path, "link groups cannot be nested"));
    }

    match entry.kind.as_deref().unwrap_or("link") {
        "link" => match (&entry.to, &entry.href) {
            (Some(_), Some(_)) => Err(malformed(path, "item has both 'to' and 'href'")),
            (Some(to), None) => Ok(NavLeaf::route(to.clone(), entry.label.clone())),
            (None, Some(href)) if is_external_url(href) => {
                Ok(NavLeaf::external(href.clone(), entry.label.clone()))
            }
            (None, Some(href)) => Ok(NavLeaf::route(href.clone(), entry.label.clone())),
            (None, None) => Err(malformed(path, "link requires 'to' or 'href'")),
        },
        "doc" => {
            let Some(id) = &entry.id else {
                return Err(malformed(path, "doc entry requires 'id'"));
            };
            Ok(NavLeaf::doc(id.clone(), entry.label.clone()))
        }
        "docSidebar" => {
            let Some(name) = &entry.sidebar_id else {
                return Err(malformed(path, "docSidebar entry requires 'sidebarId'"));
            };
            let Some(sidebar) = sidebars.iter().find(|s| &s.name == name) else {
                return Err(malformed(path, format!("unknown sidebar '{name}'")));
            };
            let Some(first) = sidebar.doc_ids().first().copied() else {
                return Err(malformed(path, format!("sidebar '{name}' has no docs")));
            };
            Ok(NavLeaf::doc(first, entry.label.clone()))
        }
        other => Err(malformed(path, format!("unknown item type '{other}'"))),
    }
}
