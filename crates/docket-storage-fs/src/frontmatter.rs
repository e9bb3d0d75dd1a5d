//! YAML front matter parsing.

use serde::Deserialize;

/// Fields read from a page's front matter block.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct FrontMatter {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Split a document into its front matter block and body.
///
/// The block must open on the first line with `---` and close with a line
/// containing only `---`. Without one, the whole input is the body.
pub(crate) fn split(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse front matter YAML; an empty block yields defaults.
///
/// # Errors
///
/// Returns the YAML error if the block is malformed.
pub(crate) fn parse(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_with_front_matter() {
        let (fm, body) = split("---\ntitle: Intro\n---\n# Heading\n");
        assert_eq!(fm, Some("title: Intro\n"));
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn test_split_crlf() {
        let (fm, body) = split("---\r\nslug: /\r\n---\r\nBody");
        assert_eq!(fm, Some("slug: /\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_front_matter() {
        let (fm, body) = split("# Title\n\n---\n");
        assert!(fm.is_none());
        assert_eq!(body, "# Title\n\n---\n");
    }

    #[test]
    fn test_split_unterminated_is_body() {
        let content = "---\ntitle: Oops\n# Heading";
        assert_eq!(split(content), (None, content));
    }

    #[test]
    fn test_parse_fields() {
        let fm = parse(
            "id: docker-setup\ntitle: \"Docker Setup\"\nslug: /guides/docker\ndescription: |\n  Run it\n  in containers\nsidebar_position: 3\n",
        )
        .unwrap();

        assert_eq!(
            fm,
            FrontMatter {
                id: Some("docker-setup".to_owned()),
                title: Some("Docker Setup".to_owned()),
                slug: Some("/guides/docker".to_owned()),
                description: Some("Run it\nin containers\n".to_owned()),
            }
        );
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert_eq!(parse("  \n").unwrap(), FrontMatter::default());
        assert!(parse("title: [unclosed").is_err());
    }
}
