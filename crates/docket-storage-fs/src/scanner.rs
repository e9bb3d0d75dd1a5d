//! Page discovery by filesystem walking.
//!
//! The scanner only finds candidate files; reading and parsing them is left
//! to `FsSource`.

use std::fs;
use std::path::{Path, PathBuf};

/// Reference to a page source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageRef {
    /// Path relative to the scanned root (e.g. `guides/quickstart.md`).
    pub rel_path: PathBuf,
    /// Absolute path for reading.
    pub abs_path: PathBuf,
}

/// Walks one locale's docs directory.
pub(crate) struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Scan the tree and return page references sorted by relative path.
    ///
    /// Returns an empty Vec if the root doesn't exist.
    pub fn scan(&self) -> Vec<PageRef> {
        let mut refs = Vec::new();
        if self.root.is_dir() {
            self.scan_directory(&self.root, Path::new(""), &mut refs);
        }
        refs
    }

    fn scan_directory(&self, dir_path: &Path, rel_prefix: &Path, refs: &mut Vec<PageRef>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            tracing::warn!(path = %dir_path.display(), "Failed to read directory");
            return;
        };

        // Directory order is platform-dependent
        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                (e, is_dir)
            })
            .collect();
        entries.sort_by_key(|(e, _)| e.file_name());

        for (entry, is_dir) in entries {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            // Hidden entries and `_partials` are not pages
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let path = entry.path();
            let rel_path = rel_prefix.join(&*name);
            if is_dir {
                self.scan_directory(&path, &rel_path, refs);
            } else if is_page_file(&path) {
                refs.push(PageRef {
                    rel_path,
                    abs_path: path,
                });
            }
        }
    }
}

fn is_page_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md" || e == "mdx")
}

/// Convert a relative file path to a page identifier.
///
/// - `intro.md` -> `"intro"`
/// - `guides/quickstart.mdx` -> `"guides/quickstart"`
/// - `guides/index.md` -> `"guides/index"`
///
/// A front matter `id` replaces the file name segment and keeps the
/// directory prefix.
pub(crate) fn page_identifier(rel_path: &Path, id_override: Option<&str>) -> String {
    let mut segments = path_segments(rel_path);
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    segments.push(id_override.map_or(stem, str::to_owned));
    segments.join("/")
}

/// Directory segments of a relative file path.
pub(crate) fn path_segments(rel_path: &Path) -> Vec<String> {
    rel_path
        .parent()
        .map(|p| {
            p.iter()
                .map(|s| s.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rel_paths(refs: &[PageRef]) -> Vec<String> {
        refs.iter()
            .map(|r| r.rel_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_page_identifier() {
        assert_eq!(page_identifier(Path::new("intro.md"), None), "intro");
        assert_eq!(
            page_identifier(Path::new("guides/quickstart.mdx"), None),
            "guides/quickstart"
        );
        assert_eq!(page_identifier(Path::new("guides/index.md"), None), "guides/index");
        assert_eq!(
            page_identifier(Path::new("guides/docker.md"), Some("docker-setup")),
            "guides/docker-setup"
        );
    }

    #[test]
    fn test_path_segments() {
        assert!(path_segments(Path::new("intro.md")).is_empty());
        assert_eq!(
            path_segments(Path::new("api/v1/overview.md")),
            vec!["api", "v1"]
        );
    }

    #[test]
    fn test_scan_missing_dir() {
        let scanner = Scanner::new(PathBuf::from("/nonexistent/docs"));
        assert!(scanner.scan().is_empty());
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("guides")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("_partials")).unwrap();
        fs::write(root.join("why-jobel.md"), "# Why").unwrap();
        fs::write(root.join("intro.md"), "# Intro").unwrap();
        fs::write(root.join("guides/quickstart.mdx"), "# Quickstart").unwrap();
        fs::write(root.join("guides/_draft.md"), "# Draft").unwrap();
        fs::write(root.join("guides/diagram.png"), "").unwrap();
        fs::write(root.join(".git/HEAD.md"), "").unwrap();
        fs::write(root.join("_partials/snippet.md"), "").unwrap();

        let refs = Scanner::new(root.to_path_buf()).scan();

        assert_eq!(
            rel_paths(&refs),
            vec!["guides/quickstart.mdx", "intro.md", "why-jobel.md"]
        );
        assert_eq!(refs[1].abs_path, root.join("intro.md"));
    }
}
