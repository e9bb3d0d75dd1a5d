//! Depth-first traversal of the navigation model.

use std::fmt;

use serde::Serialize;

use super::{LinkGroup, NavCategory, NavLeaf, NavNode, NavigationModel};

/// Location of a node: root segment, then category labels, then the leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NavPath(Vec<String>);

impl NavPath {
    /// Path consisting of a single root segment.
    #[must_use]
    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Borrowed view of a walked node.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Category(&'a NavCategory),
    Leaf(&'a NavLeaf),
}

enum Frame<'a> {
    Nodes {
        path: NavPath,
        iter: std::slice::Iter<'a, NavNode>,
    },
    Leaves {
        path: NavPath,
        iter: std::slice::Iter<'a, NavLeaf>,
    },
}

impl<'a> Frame<'a> {
    fn advance(&mut self) -> Option<(NavPath, NodeRef<'a>)> {
        match self {
            Frame::Nodes { path, iter } => iter.next().map(|node| match node {
                NavNode::Category(category) => {
                    (path.child(category.segment()), NodeRef::Category(category))
                }
                NavNode::Leaf(leaf) => (path.child(leaf.segment()), NodeRef::Leaf(leaf)),
            }),
            Frame::Leaves { path, iter } => iter
                .next()
                .map(|leaf| (path.child(leaf.segment()), NodeRef::Leaf(leaf))),
        }
    }
}

/// Lazy pre-order iterator over `(path, node)` pairs.
///
/// Visits sidebars in declared order, then the navbar, then footer groups.
/// Obtained from [`NavigationModel::walk`]; calling `walk` again restarts
/// from the beginning and yields the same sequence.
pub struct Walk<'a> {
    model: &'a NavigationModel,
    next_root: usize,
    stack: Vec<Frame<'a>>,
}

impl<'a> Walk<'a> {
    pub(super) fn new(model: &'a NavigationModel) -> Self {
        Self {
            model,
            next_root: 0,
            stack: Vec::new(),
        }
    }

    /// Push the frame for the next root, if any.
    fn push_next_root(&mut self) -> bool {
        let sidebars = self.model.sidebars();
        let footer = &self.model.footer().groups;
        let idx = self.next_root;
        self.next_root += 1;

        let frame = if let Some(sidebar) = sidebars.get(idx) {
            Frame::Nodes {
                path: NavPath::root(format!("sidebar:{}", sidebar.name)),
                iter: sidebar.items.iter(),
            }
        } else if idx == sidebars.len() {
            leaves_frame(NavPath::root("navbar"), &self.model.navbar().links)
        } else if let Some(group) = footer.get(idx - sidebars.len() - 1) {
            let root = match &group.label {
                Some(label) => format!("footer:{label}"),
                None => format!("footer:{}", idx - sidebars.len() - 1),
            };
            leaves_frame(NavPath::root(root), group)
        } else {
            return false;
        };
        self.stack.push(frame);
        true
    }
}

fn leaves_frame(path: NavPath, group: &LinkGroup) -> Frame<'_> {
    Frame::Leaves {
        path,
        iter: group.items.iter(),
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NavPath, NodeRef<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                if self.push_next_root() {
                    continue;
                }
                return None;
            };

            let Some((path, node)) = frame.advance() else {
                self.stack.pop();
                continue;
            };

            if let NodeRef::Category(category) = node {
                self.stack.push(Frame::Nodes {
                    path: path.clone(),
                    iter: category.items.iter(),
                });
            }
            return Some((path, node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_path_display() {
        let path = NavPath::root("sidebar:docs").child("Guides").child("guides/quickstart");
        assert_eq!(path.to_string(), "sidebar:docs > Guides > guides/quickstart");
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn test_nav_path_serializes_as_list() {
        let path = NavPath::root("navbar").child("API");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["navbar","API"]"#);
    }
}
