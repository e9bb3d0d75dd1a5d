//! Homepage content blocks.
//!
//! The homepage is data: a set of named variants, each an ordered list of
//! blocks. Exactly one variant is rendered and it must be chosen explicitly
//! unless only one exists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::navigation::{NavLeaf, NavPath, is_external_url};

/// Error selecting or validating the homepage.
#[derive(Debug, thiserror::Error)]
pub enum HomepageError {
    /// Several variants exist and none was selected.
    #[error("Homepage has variants {available:?} but none is selected; set [homepage] variant")]
    VariantNotSelected { available: Vec<String> },
    /// The selected variant does not exist.
    #[error("Unknown homepage variant '{name}' (available: {available:?})")]
    UnknownVariant {
        name: String,
        available: Vec<String>,
    },
    /// The homepage file declares no variants.
    #[error("Homepage declares no variants")]
    NoVariants,
    /// An action has no usable target.
    #[error("Invalid action '{label}' in homepage variant '{variant}': {reason}")]
    InvalidAction {
        variant: String,
        label: String,
        reason: String,
    },
}

/// All declared homepage variants, keyed by name.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HomepageSpec {
    pub variants: BTreeMap<String, Vec<ContentBlock>>,
}

/// Button or link on the homepage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Action {
    fn leaf(&self, variant: &str) -> Result<NavLeaf, HomepageError> {
        let invalid = |reason: &str| HomepageError::InvalidAction {
            variant: variant.to_owned(),
            label: self.label.clone(),
            reason: reason.to_owned(),
        };
        let label = Some(self.label.clone());
        match (&self.to, &self.href) {
            (Some(_), Some(_)) => Err(invalid("has both 'to' and 'href'")),
            (None, None) => Err(invalid("requires 'to' or 'href'")),
            (Some(to), None) => Ok(NavLeaf::route(to.clone(), label)),
            (None, Some(href)) if is_external_url(href) => Ok(NavLeaf::external(href.clone(), label)),
            (None, Some(href)) => Ok(NavLeaf::route(href.clone(), label)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Rendered with emphasis.
    #[serde(default)]
    pub highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub description: String,
}

/// One section of the homepage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Hero {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(default)]
        actions: Vec<Action>,
    },
    Features {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        items: Vec<Feature>,
    },
    Stats {
        items: Vec<Stat>,
    },
    Steps {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        items: Vec<Step>,
    },
    CallToAction {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default)]
        actions: Vec<Action>,
    },
}

impl ContentBlock {
    /// Path segment naming this block.
    fn segment(&self) -> &str {
        match self {
            Self::Hero { .. } => "hero",
            Self::Features { .. } => "features",
            Self::Stats { .. } => "stats",
            Self::Steps { .. } => "steps",
            Self::CallToAction { .. } => "callToAction",
        }
    }

    /// Actions in declared order.
    fn actions(&self) -> Vec<&Action> {
        match self {
            Self::Hero { actions, .. } | Self::CallToAction { actions, .. } => {
                actions.iter().collect()
            }
            Self::Features { items, .. } => items.iter().filter_map(|f| f.link.as_ref()).collect(),
            Self::Stats { .. } | Self::Steps { .. } => Vec::new(),
        }
    }
}

/// The selected homepage variant with its links checked for shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Homepage {
    variant: String,
    blocks: Vec<ContentBlock>,
    #[serde(skip)]
    links: Vec<(NavPath, NavLeaf)>,
}

impl Homepage {
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    #[must_use]
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Every action as a navigation leaf with its location.
    #[must_use]
    pub fn links(&self) -> &[(NavPath, NavLeaf)] {
        &self.links
    }
}

impl HomepageSpec {
    /// Variant names in sorted order.
    #[must_use]
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.keys().cloned().collect()
    }

    /// Pick the variant to build.
    ///
    /// A single declared variant is used without selection; with several,
    /// `selected` is mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`HomepageError::VariantNotSelected`] when the choice is
    /// ambiguous, [`HomepageError::UnknownVariant`] for a missing name,
    /// [`HomepageError::NoVariants`] for an empty file and
    /// [`HomepageError::InvalidAction`] for an action without a single target.
    pub fn select(&self, selected: Option<&str>) -> Result<Homepage, HomepageError> {
        let (name, blocks) = match selected {
            Some(name) => self.variants.get_key_value(name).ok_or_else(|| {
                HomepageError::UnknownVariant {
                    name: name.to_owned(),
                    available: self.variant_names(),
                }
            })?,
            None => {
                let mut iter = self.variants.iter();
                match (iter.next(), iter.next()) {
                    (None, _) => return Err(HomepageError::NoVariants),
                    (Some(only), None) => only,
                    (Some(_), Some(_)) => {
                        return Err(HomepageError::VariantNotSelected {
                            available: self.variant_names(),
                        });
                    }
                }
            }
        };

        let root = NavPath::root(format!("homepage:{name}"));
        let mut links = Vec::new();
        for block in blocks {
            let block_path = root.child(block.segment());
            for action in block.actions() {
                links.push((block_path.child(action.label.clone()), action.leaf(name)?));
            }
        }

        tracing::debug!(variant = %name, blocks = blocks.len(), "Selected homepage variant");
        Ok(Homepage {
            variant: name.clone(),
            blocks: blocks.clone(),
            links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HOMEPAGE: &str = r#"
variants:
  agents:
    - type: hero
      title: Your AI Solutions Architect
      subtitle: 4 AI agents collaborate to transform intent into code.
      actions:
        - label: Get Started
          to: /docs/intro
        - label: Architecture
          to: /docs/architecture/overview
    - type: stats
      items:
        - { value: "100%", label: Code Accuracy, sublabel: Grounded in documentation }
        - { value: "50+", label: Security Rules }
    - type: callToAction
      title: Ready to build?
      actions:
        - label: Quickstart
          to: /docs/guides/quickstart
        - label: GitHub
          href: https://github.com/jobel-ai/jobel-ai.github.io
  minimal:
    - type: hero
      title: Jobel
"#;

    fn spec() -> HomepageSpec {
        serde_yaml::from_str(HOMEPAGE).unwrap()
    }

    #[test]
    fn test_select_named_variant() {
        let homepage = spec().select(Some("agents")).unwrap();

        assert_eq!(homepage.variant(), "agents");
        assert_eq!(homepage.blocks().len(), 3);
        let paths: Vec<_> = homepage.links().iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "homepage:agents > hero > Get Started",
                "homepage:agents > hero > Architecture",
                "homepage:agents > callToAction > Quickstart",
                "homepage:agents > callToAction > GitHub",
            ]
        );
        assert_eq!(
            homepage.links()[3].1,
            NavLeaf::external(
                "https://github.com/jobel-ai/jobel-ai.github.io",
                Some("GitHub".to_owned())
            )
        );
    }

    #[test]
    fn test_ambiguous_variant_is_refused() {
        let err = spec().select(None).unwrap_err();

        match err {
            HomepageError::VariantNotSelected { available } => {
                assert_eq!(available, vec!["agents", "minimal"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_variant_needs_no_selection() {
        let mut spec = spec();
        spec.variants.remove("agents");

        let homepage = spec.select(None).unwrap();
        assert_eq!(homepage.variant(), "minimal");
        assert!(homepage.links().is_empty());
    }

    #[test]
    fn test_unknown_variant() {
        let err = spec().select(Some("legacy")).unwrap_err();
        assert!(matches!(err, HomepageError::UnknownVariant { ref name, .. } if name == "legacy"));
    }

    #[test]
    fn test_no_variants() {
        let err = HomepageSpec::default().select(None).unwrap_err();
        assert!(matches!(err, HomepageError::NoVariants));
    }

    #[test]
    fn test_action_without_target_is_invalid() {
        let spec: HomepageSpec = serde_yaml::from_str(
            r"
variants:
  main:
    - type: hero
      title: Jobel
      actions:
        - label: Nowhere
",
        )
        .unwrap();

        let err = spec.select(None).unwrap_err();
        assert!(matches!(err, HomepageError::InvalidAction { ref label, .. } if label == "Nowhere"));
    }

    #[test]
    fn test_feature_links_are_collected() {
        let spec: HomepageSpec = serde_yaml::from_str(
            r"
variants:
  main:
    - type: features
      title: Why Jobel
      items:
        - title: Zero-Hallucination Engine
          description: Verified API contracts only.
          highlight: true
          link: { label: Learn more, to: /docs/features/contract-authority }
        - title: Multi-LLM Support
          description: Switch providers without changing code.
",
        )
        .unwrap();

        let homepage = spec.select(None).unwrap();
        assert_eq!(homepage.links().len(), 1);
        assert_eq!(
            homepage.links()[0].0.to_string(),
            "homepage:main > features > Learn more"
        );
    }
}
