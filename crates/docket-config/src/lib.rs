//! Configuration management for Docket.
//!
//! Parses `docket.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `docs.edit_url`

mod expand;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Build only these configured locales.
    pub locales: Option<Vec<String>>,
    /// Override severity of broken in-content links.
    pub on_broken_markdown_links: Option<LinkSeverity>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docket.toml";

/// Default maximum sidebar category nesting.
const DEFAULT_MAX_DEPTH: usize = 6;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteConfig,
    /// Documentation sources (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Locale partitions.
    pub i18n: I18nConfig,
    /// Build gate settings (output path is a relative string from TOML).
    build: BuildConfigRaw,
    /// Homepage content selection.
    pub homepage: HomepageConfig,
    /// Site-wide theme settings handed to the renderer.
    pub theme: ThemeConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Locales selected on the command line (set by CLI settings).
    #[serde(skip)]
    locale_filter: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the navbar and page titles.
    pub title: String,
    /// One-line tagline.
    pub tagline: String,
    /// Production URL (scheme and host).
    pub url: String,
    /// Path prefix the site is served under.
    pub base_url: String,
    /// Favicon path relative to static assets.
    pub favicon: Option<String>,
    /// Social card image path relative to static assets.
    pub social_card: Option<String>,
    /// Whether generated routes end with a slash.
    pub trailing_slash: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Docket".to_owned(),
            tagline: String::new(),
            url: "http://localhost".to_owned(),
            base_url: "/".to_owned(),
            favicon: None,
            social_card: None,
            trailing_slash: false,
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    route_base_path: Option<String>,
    navigation: Option<String>,
    homepage: Option<String>,
    edit_url: Option<String>,
    static_routes: Option<Vec<String>>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for default-locale markdown files.
    pub source_dir: PathBuf,
    /// Directory holding per-locale translations (`i18n/<locale>/docs`).
    pub i18n_dir: PathBuf,
    /// Declarative navigation file (sidebars, navbar, footer).
    pub navigation_path: PathBuf,
    /// Homepage content blocks file.
    pub homepage_path: PathBuf,
    /// Route segment documentation pages are served under.
    pub route_base_path: String,
    /// Base URL for "edit this page" links.
    pub edit_url: Option<String>,
    /// Site routes outside the docs that internal links may target.
    pub static_routes: Vec<String>,
}

/// Locale configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale served at the root.
    pub default_locale: String,
    /// All locales to build, in build order.
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
        }
    }
}

/// How a class of broken references affects the build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSeverity {
    /// Abort the build.
    #[serde(alias = "throw")]
    Fail,
    /// Log and continue.
    Warn,
    /// Continue silently.
    Ignore,
}

/// Raw build configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    on_broken_links: Option<LinkSeverity>,
    on_broken_markdown_links: Option<LinkSeverity>,
    max_depth: Option<usize>,
    output_dir: Option<String>,
}

/// Resolved build configuration.
#[derive(Debug)]
pub struct BuildConfig {
    /// Severity for broken sidebar, navbar, footer and homepage references.
    pub on_broken_links: LinkSeverity,
    /// Severity for broken links inside page bodies.
    pub on_broken_markdown_links: LinkSeverity,
    /// Maximum sidebar category nesting depth.
    pub max_depth: usize,
    /// Directory the site manifest is written to.
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            on_broken_links: LinkSeverity::Fail,
            on_broken_markdown_links: LinkSeverity::Warn,
            max_depth: DEFAULT_MAX_DEPTH,
            output_dir: PathBuf::from("build"),
        }
    }
}

/// Homepage configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HomepageConfig {
    /// Name of the homepage content variant to publish.
    pub variant: Option<String>,
}

/// Theme configuration passed through to the renderer.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Dismissable banner above the navbar.
    pub announcement_bar: Option<AnnouncementBar>,
    /// Light/dark mode behaviour.
    pub color_mode: ColorModeConfig,
}

/// Announcement banner.
#[derive(Debug, Deserialize, Serialize)]
pub struct AnnouncementBar {
    /// Stable id; changing it re-shows the bar to readers who dismissed it.
    pub id: String,
    /// HTML content.
    pub content: String,
    /// CSS background color.
    #[serde(default = "default_announcement_background")]
    pub background_color: String,
    /// CSS text color.
    #[serde(default = "default_announcement_text")]
    pub text_color: String,
    /// Whether readers can dismiss the bar.
    #[serde(default = "default_true")]
    pub is_closeable: bool,
}

fn default_announcement_background() -> String {
    "#ffffff".to_owned()
}

fn default_announcement_text() -> String {
    "#000000".to_owned()
}

fn default_true() -> bool {
    true
}

/// Color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

/// Color mode configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorModeConfig {
    /// Mode used before the reader picks one.
    pub default_mode: ColorMode,
    /// Hide the mode switch.
    pub disable_switch: bool,
    /// Follow the `prefers-color-scheme` media query.
    pub respect_prefers_color_scheme: bool,
}

impl Default for ColorModeConfig {
    fn default() -> Self {
        Self {
            default_mode: ColorMode::Light,
            disable_switch: false,
            respect_prefers_color_scheme: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a locale tag: one path segment of ASCII letters, digits, `-` or `_`.
fn require_locale_tag(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(ConfigError::Validation(format!(
            "{field} entries must be locale tags like 'en' or 'pt-BR', got '{value}'"
        )));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a CSS hex color (`#rgb` or `#rrggbb`).
fn require_hex_color(value: &str, field: &str) -> Result<(), ConfigError> {
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must be a hex color like #6366f1, got '{value}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docket.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(locales) = &settings.locales {
            self.locale_filter = Some(locales.clone());
        }
        if let Some(severity) = settings.on_broken_markdown_links {
            self.build_resolved.on_broken_markdown_links = severity;
        }
    }

    /// Locales to build: the default locale first, then the others in
    /// configured order, narrowed to the CLI selection if there is one.
    #[must_use]
    pub fn build_locales(&self) -> Vec<&str> {
        let default = self.i18n.default_locale.as_str();
        std::iter::once(default)
            .chain(
                self.i18n
                    .locales
                    .iter()
                    .map(String::as_str)
                    .filter(|l| *l != default),
            )
            .filter(|l| {
                self.locale_filter
                    .as_ref()
                    .is_none_or(|selected| selected.iter().any(|s| s == l))
            })
            .collect()
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            docs: DocsConfigRaw::default(),
            i18n: I18nConfig::default(),
            build: BuildConfigRaw::default(),
            homepage: HomepageConfig::default(),
            theme: ThemeConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                i18n_dir: base.join("i18n"),
                navigation_path: base.join("navigation.yaml"),
                homepage_path: base.join("homepage.yaml"),
                route_base_path: "docs".to_owned(),
                edit_url: None,
                static_routes: vec!["/".to_owned()],
            },
            build_resolved: BuildConfig {
                output_dir: base.join("build"),
                ..BuildConfig::default()
            },
            config_path: None,
            locale_filter: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_i18n()?;
        self.validate_build()?;
        self.validate_theme()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.url, "site.url")?;
        require_http_url(&self.site.url, "site.url")?;
        if !self.site.base_url.starts_with('/') || !self.site.base_url.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.base_url must start and end with '/', got '{}'",
                self.site.base_url
            )));
        }
        if let Some(edit_url) = &self.docs_resolved.edit_url {
            require_http_url(edit_url, "docs.edit_url")?;
        }
        if self.docs_resolved.route_base_path.contains('/') {
            return Err(ConfigError::Validation(
                "docs.route_base_path must be a single path segment".to_owned(),
            ));
        }
        for route in &self.docs_resolved.static_routes {
            if !route.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "docs.static_routes entries must start with '/', got '{route}'"
                )));
            }
        }
        Ok(())
    }

    fn validate_i18n(&self) -> Result<(), ConfigError> {
        let i18n = &self.i18n;
        if i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales cannot be empty".to_owned(),
            ));
        }
        for (i, locale) in i18n.locales.iter().enumerate() {
            require_locale_tag(locale, "i18n.locales")?;
            if i18n.locales[..i].contains(locale) {
                return Err(ConfigError::Validation(format!(
                    "i18n.locales lists '{locale}' more than once"
                )));
            }
        }
        if !i18n.locales.contains(&i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale '{}' is not listed in i18n.locales",
                i18n.default_locale
            )));
        }
        if let Some(selected) = &self.locale_filter {
            if selected.is_empty() {
                return Err(ConfigError::Validation(
                    "locale selection cannot be empty".to_owned(),
                ));
            }
            for locale in selected {
                require_locale_tag(locale, "locale selection")?;
                if !i18n.locales.contains(locale) {
                    return Err(ConfigError::Validation(format!(
                        "locale '{locale}' is not listed in i18n.locales"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        if self.build_resolved.max_depth == 0 {
            return Err(ConfigError::Validation(
                "build.max_depth must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_theme(&self) -> Result<(), ConfigError> {
        if let Some(bar) = &self.theme.announcement_bar {
            require_non_empty(&bar.id, "theme.announcement_bar.id")?;
            require_non_empty(&bar.content, "theme.announcement_bar.content")?;
            require_hex_color(
                &bar.background_color,
                "theme.announcement_bar.background_color",
            )?;
            require_hex_color(&bar.text_color, "theme.announcement_bar.text_color")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;

        if let Some(ref url) = self.docs.edit_url {
            self.docs.edit_url = Some(expand::expand_env(url, "docs.edit_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            i18n_dir: config_dir.join("i18n"),
            navigation_path: resolve(self.docs.navigation.as_deref(), "navigation.yaml"),
            homepage_path: resolve(self.docs.homepage.as_deref(), "homepage.yaml"),
            route_base_path: self
                .docs
                .route_base_path
                .as_deref()
                .unwrap_or("docs")
                .trim_matches('/')
                .to_owned(),
            edit_url: self.docs.edit_url.clone(),
            static_routes: self
                .docs
                .static_routes
                .clone()
                .unwrap_or_else(|| vec!["/".to_owned()]),
        };

        let defaults = BuildConfig::default();
        self.build_resolved = BuildConfig {
            on_broken_links: self.build.on_broken_links.unwrap_or(defaults.on_broken_links),
            on_broken_markdown_links: self
                .build
                .on_broken_markdown_links
                .unwrap_or(defaults.on_broken_markdown_links),
            max_depth: self.build.max_depth.unwrap_or(defaults.max_depth),
            output_dir: resolve(self.build.output_dir.as_deref(), "build"),
        };
    }
}
