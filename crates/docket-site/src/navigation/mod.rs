//! Navigation model.
//!
//! Describes how content is surfaced: named sidebars (nested category
//! trees), a flat navbar link group, and labelled footer link groups.
//! Built once from a declarative [`NavigationSpec`] and never mutated;
//! nodes are owned values, so the sidebar is a tree by construction.

mod spec;
mod walk;

use serde::Serialize;

pub use spec::{
    EntrySpec, FooterSpec, ItemSpec, LinkGroupSpec, NavbarSpec, NavigationSpec, SidebarSpec,
};
pub use walk::{NavPath, NodeRef, Walk};

pub(crate) use spec::is_external_url;

/// Default maximum category nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Error raised while building the navigation model.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The declared tree contradicts itself.
    #[error("Malformed navigation at {path}: {reason}")]
    MalformedTree {
        /// Location of the offending entry.
        path: NavPath,
        /// What is wrong with it.
        reason: String,
    },
}

/// Options controlling navigation construction.
#[derive(Clone, Debug)]
pub struct NavOptions {
    /// Deepest allowed category nesting; a top-level category has depth 1.
    pub max_depth: usize,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What an internal reference points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum RefTarget {
    /// Page identifier (sidebar `doc` entries).
    Doc(String),
    /// Site route such as `/docs/api/overview` (navbar/footer `to:` links).
    Route(String),
}

impl RefTarget {
    /// The raw target string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Doc(s) | Self::Route(s) => s,
        }
    }
}

/// Kind of a navigation leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LeafKind {
    /// Must resolve to a page or known route.
    Internal { target: RefTarget },
    /// Opaque absolute URL, never checked.
    External { url: String },
}

/// A reference to content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLeaf {
    /// Display label; docs fall back to the page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: LeafKind,
}

impl NavLeaf {
    /// Internal reference to a page identifier.
    #[must_use]
    pub fn doc(id: impl Into<String>, label: Option<String>) -> Self {
        Self {
            label,
            kind: LeafKind::Internal {
                target: RefTarget::Doc(id.into()),
            },
        }
    }

    /// Internal reference to a site route.
    #[must_use]
    pub fn route(path: impl Into<String>, label: Option<String>) -> Self {
        Self {
            label,
            kind: LeafKind::Internal {
                target: RefTarget::Route(path.into()),
            },
        }
    }

    /// External reference.
    #[must_use]
    pub fn external(url: impl Into<String>, label: Option<String>) -> Self {
        Self {
            label,
            kind: LeafKind::External { url: url.into() },
        }
    }

    /// Raw target: identifier, route or URL.
    #[must_use]
    pub fn target(&self) -> &str {
        match &self.kind {
            LeafKind::Internal { target } => target.as_str(),
            LeafKind::External { url } => url,
        }
    }

    pub(crate) fn segment(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.target().to_owned())
    }
}

/// A named, orderable grouping of navigation nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Collapsed when first displayed.
    pub collapsed: bool,
    pub items: Vec<NavNode>,
}

impl NavCategory {
    pub(crate) fn segment(&self) -> String {
        self.label.clone().unwrap_or_else(|| "(unlabeled)".to_owned())
    }
}

/// Child of a sidebar or category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavNode {
    Category(NavCategory),
    Leaf(NavLeaf),
}

/// Ordered, unnested list of leaves with an optional label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub items: Vec<NavLeaf>,
}

/// A named sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub name: String,
    pub items: Vec<NavNode>,
}

impl Sidebar {
    /// Identifiers of doc leaves in pre-order, first occurrence only.
    #[must_use]
    pub fn doc_ids(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [NavNode], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    NavNode::Category(category) => collect(&category.items, out),
                    NavNode::Leaf(NavLeaf {
                        kind:
                            LeafKind::Internal {
                                target: RefTarget::Doc(id),
                            },
                        ..
                    }) => {
                        if !out.contains(&id.as_str()) {
                            out.push(id);
                        }
                    }
                    NavNode::Leaf(_) => {}
                }
            }
        }

        let mut ids = Vec::new();
        collect(&self.items, &mut ids);
        ids
    }
}

/// Top navigation bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Navbar {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub links: LinkGroup,
}

/// Page footer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub groups: Vec<LinkGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// The complete, immutable navigation of a site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavigationModel {
    sidebars: Vec<Sidebar>,
    navbar: Navbar,
    footer: Footer,
}

impl NavigationModel {
    /// Assemble a model from already-validated parts.
    ///
    /// Prefer [`NavigationModel::from_spec`], which enforces the tree rules.
    #[must_use]
    pub fn new(sidebars: Vec<Sidebar>, navbar: Navbar, footer: Footer) -> Self {
        Self {
            sidebars,
            navbar,
            footer,
        }
    }

    #[must_use]
    pub fn sidebars(&self) -> &[Sidebar] {
        &self.sidebars
    }

    #[must_use]
    pub fn sidebar(&self, name: &str) -> Option<&Sidebar> {
        self.sidebars.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    #[must_use]
    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    /// Walk every node depth-first, pre-order.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }

    /// Iterate over leaves only, with their paths.
    pub fn leaves(&self) -> impl Iterator<Item = (NavPath, &NavLeaf)> {
        self.walk().filter_map(|(path, node)| match node {
            NodeRef::Leaf(leaf) => Some((path, leaf)),
            NodeRef::Category(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_model() -> NavigationModel {
        let sidebar = Sidebar {
            name: "docs".to_owned(),
            items: vec![
                NavNode::Leaf(NavLeaf::doc("intro", None)),
                NavNode::Category(NavCategory {
                    label: Some("Guides".to_owned()),
                    collapsed: true,
                    items: vec![
                        NavNode::Leaf(NavLeaf::doc("guides/quickstart", None)),
                        NavNode::Category(NavCategory {
                            label: Some("Advanced".to_owned()),
                            collapsed: true,
                            items: vec![NavNode::Leaf(NavLeaf::doc("guides/custom", None))],
                        }),
                    ],
                }),
                NavNode::Leaf(NavLeaf::external(
                    "https://example.com",
                    Some("Example".to_owned()),
                )),
            ],
        };
        let navbar = Navbar {
            title: Some("Jobel".to_owned()),
            links: LinkGroup {
                label: None,
                items: vec![NavLeaf::route("/docs/api/overview", Some("API".to_owned()))],
            },
        };
        let footer = Footer {
            groups: vec![LinkGroup {
                label: Some("Community".to_owned()),
                items: vec![NavLeaf::external(
                    "https://discord.gg/jobel",
                    Some("Discord".to_owned()),
                )],
            }],
            copyright: None,
        };
        NavigationModel::new(vec![sidebar], navbar, footer)
    }

    fn walked_paths(model: &NavigationModel) -> Vec<String> {
        model.walk().map(|(path, _)| path.to_string()).collect()
    }

    #[test]
    fn test_walk_is_preorder() {
        let model = sample_model();

        assert_eq!(
            walked_paths(&model),
            vec![
                "sidebar:docs > intro",
                "sidebar:docs > Guides",
                "sidebar:docs > Guides > guides/quickstart",
                "sidebar:docs > Guides > Advanced",
                "sidebar:docs > Guides > Advanced > guides/custom",
                "sidebar:docs > Example",
                "navbar > API",
                "footer:Community > Discord",
            ]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let model = sample_model();

        let mut partial = model.walk();
        partial.next();
        partial.next();

        assert_eq!(walked_paths(&model), walked_paths(&model));
        assert_eq!(model.walk().count(), 8);
    }

    #[test]
    fn test_walk_empty_model() {
        let model = NavigationModel::default();
        assert_eq!(model.walk().count(), 0);
    }

    #[test]
    fn test_walk_yields_node_kinds() {
        let model = sample_model();
        let categories = model
            .walk()
            .filter(|(_, node)| matches!(node, NodeRef::Category(_)))
            .count();
        assert_eq!(categories, 2);
        assert_eq!(model.leaves().count(), 6);
    }

    #[test]
    fn test_sidebar_doc_ids() {
        let model = sample_model();
        let sidebar = model.sidebar("docs").unwrap();
        assert_eq!(
            sidebar.doc_ids(),
            vec!["intro", "guides/quickstart", "guides/custom"]
        );
        assert!(model.sidebar("missing").is_none());
    }

    #[test]
    fn test_leaf_serialization() {
        let leaf = NavLeaf::doc("intro", None);
        assert_eq!(
            serde_json::to_string(&leaf).unwrap(),
            r#"{"kind":"internal","target":{"by":"doc","value":"intro"}}"#
        );

        let leaf = NavLeaf::external("https://example.com", Some("Ex".to_owned()));
        assert_eq!(
            serde_json::to_string(&leaf).unwrap(),
            r#"{"label":"Ex","kind":"external","url":"https://example.com"}"#
        );
    }
}
