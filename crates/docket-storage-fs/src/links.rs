//! In-body link extraction.

use pulldown_cmark::{Event, Parser, Tag};

/// Collect link destinations from markdown, in document order.
///
/// Images are not links and are skipped; reference-style links are
/// reported with their resolved destination.
pub(crate) fn extract_links(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) if !dest_url.is_empty() => {
                Some(dest_url.into_string())
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_links_in_order() {
        let markdown = "\
See the [quickstart](./quickstart.md) and [API](/docs/api/overview#auth).

![diagram](./diagram.png)

Join us on [Discord][discord] or jump to [setup](#setup).

```md
[not a link](./ignored.md)
```

[discord]: https://discord.gg/jobel
";

        assert_eq!(
            extract_links(markdown),
            vec![
                "./quickstart.md",
                "/docs/api/overview#auth",
                "https://discord.gg/jobel",
                "#setup",
            ]
        );
    }

    #[test]
    fn test_extract_links_none() {
        assert!(extract_links("# Title\n\nPlain text.").is_empty());
    }
}
