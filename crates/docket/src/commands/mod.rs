//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;

use std::path::PathBuf;

use clap::Args;
use docket_config::{CliSettings, Config, LinkSeverity};
use docket_site::{
    BuildPolicy, ComposeOptions, Locale, NavOptions, ReferenceClass, RouteTable, Severity,
    SiteInputs, SiteSettings, ValidatedSite, validate,
};
use docket_storage_fs::FsSource;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Arguments shared by every command that loads a site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover docket.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Build only these configured locales (repeatable).
    #[arg(long = "locale", value_name = "LOCALE")]
    locales: Vec<String>,

    /// Severity for broken links inside pages: fail, warn or ignore.
    #[arg(long, value_parser = parse_severity)]
    on_broken_markdown_links: Option<LinkSeverity>,

    /// Enable verbose output (resolution and gate logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Load configuration with command-line overrides applied.
    pub(crate) fn load_config(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir,
            locales: (!self.locales.is_empty()).then(|| self.locales.clone()),
            on_broken_markdown_links: self.on_broken_markdown_links,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

fn parse_severity(value: &str) -> Result<LinkSeverity, String> {
    match value {
        "fail" | "throw" => Ok(LinkSeverity::Fail),
        "warn" => Ok(LinkSeverity::Warn),
        "ignore" => Ok(LinkSeverity::Ignore),
        other => Err(format!("expected fail, warn or ignore, got '{other}'")),
    }
}

fn severity(value: LinkSeverity) -> Severity {
    match value {
        LinkSeverity::Fail => Severity::Fail,
        LinkSeverity::Warn => Severity::Warn,
        LinkSeverity::Ignore => Severity::Ignore,
    }
}

/// Locales to build, default locale first.
fn locales(config: &Config) -> Vec<Locale> {
    config.build_locales().into_iter().map(Locale::from).collect()
}

fn default_locale(config: &Config) -> Locale {
    Locale::new(config.i18n.default_locale.as_str())
}

pub(crate) fn site_settings(config: &Config) -> SiteSettings {
    SiteSettings {
        locales: locales(config),
        nav: NavOptions {
            max_depth: config.build_resolved.max_depth,
        },
        routes: RouteTable::new(
            config.docs_resolved.route_base_path.as_str(),
            config.docs_resolved.static_routes.clone(),
        ),
        homepage_variant: config.homepage.variant.clone(),
    }
}

pub(crate) fn build_policy(config: &Config) -> BuildPolicy {
    BuildPolicy {
        on_broken_links: severity(config.build_resolved.on_broken_links),
        on_broken_markdown_links: severity(config.build_resolved.on_broken_markdown_links),
        ..BuildPolicy::default()
    }
}

pub(crate) fn compose_options(config: &Config) -> ComposeOptions {
    let site = &config.site;
    ComposeOptions {
        title: site.title.clone(),
        tagline: (!site.tagline.is_empty()).then(|| site.tagline.clone()),
        base_url: site.base_url.clone(),
        trailing_slash: site.trailing_slash,
        edit_url: config.docs_resolved.edit_url.clone(),
        default_locale: Some(default_locale(config)),
    }
}

/// Filesystem source for the locales being built.
///
/// Only the configured default locale reads the docs source directory.
/// A navigation file that does not exist yields an empty navigation model.
pub(crate) fn content_source(config: &Config, locales: &[Locale]) -> FsSource {
    let docs = &config.docs_resolved;
    let mut source = FsSource::for_locales(
        &docs.source_dir,
        &default_locale(config),
        &docs.i18n_dir,
        locales,
    )
    .with_homepage(docs.homepage_path.clone());
    if docs.navigation_path.exists() {
        source = source.with_navigation(docs.navigation_path.clone());
    } else {
        tracing::info!(
            path = %docs.navigation_path.display(),
            "Navigation file not found, building without sidebars"
        );
    }
    source
}

/// Load the site from disk and run it through the build gate.
///
/// Every violation and warning is printed; a failed gate is returned as
/// [`CliError::Gate`].
pub(crate) fn check_site(config: &Config, output: &Output) -> Result<ValidatedSite, CliError> {
    let settings = site_settings(config);
    let source = content_source(config, &settings.locales);
    let inputs = SiteInputs::load(&source, &settings)?;

    match validate(inputs, &build_policy(config)) {
        Ok(site) => {
            for warning in site.warnings() {
                output.warning(&format!("Warning: {warning}"));
            }
            for report in site.reports() {
                let nav = report.counts(ReferenceClass::Navigation);
                let content = report.counts(ReferenceClass::Content);
                output.detail(&format!(
                    "{}: {} page(s), navigation {}/{} resolved, links {}/{} resolved",
                    report.locale(),
                    site.inputs().registry().all(report.locale()).len(),
                    nav.resolved,
                    nav.resolved + nav.unresolved,
                    content.resolved,
                    content.resolved + content.unresolved,
                ));
            }
            Ok(site)
        }
        Err(failure) => {
            for warning in &failure.warnings {
                output.warning(&format!("Warning: {warning}"));
            }
            for violation in &failure.violations {
                output.error(&violation.to_string());
            }
            Err(failure.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn write_site(root: &Path, sidebar: &str) -> PathBuf {
        fs::create_dir_all(root.join("docs/guides")).unwrap();
        fs::write(root.join("docs/intro.md"), "# Introduction\n").unwrap();
        fs::write(
            root.join("docs/guides/quickstart.md"),
            "---\ntitle: Quickstart\n---\nRead the [intro](../intro.md).\n",
        )
        .unwrap();
        fs::write(root.join("navigation.yaml"), sidebar).unwrap();
        let config_path = root.join("docket.toml");
        fs::write(
            &config_path,
            "[site]\ntitle = \"Jobel\"\nurl = \"https://jobel.dev\"\n\n[i18n]\ndefault_locale = \"en\"\nlocales = [\"fr\", \"en\"]\n",
        )
        .unwrap();
        config_path
    }

    fn site_args(config: PathBuf) -> SiteArgs {
        SiteArgs {
            config: Some(config),
            source_dir: None,
            locales: vec!["en".to_owned()],
            on_broken_markdown_links: None,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("throw"), Ok(LinkSeverity::Fail));
        assert_eq!(parse_severity("warn"), Ok(LinkSeverity::Warn));
        assert!(parse_severity("loud").is_err());
    }

    #[test]
    fn test_locales_default_first() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = write_site(temp.path(), "sidebars: {}\n");
        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(locales(&config), vec![Locale::from("en"), Locale::from("fr")]);
    }

    #[test]
    fn test_build_policy_from_config() {
        let config = Config::default();
        let policy = build_policy(&config);

        assert_eq!(policy.severity(ReferenceClass::Navigation), Severity::Fail);
        assert_eq!(policy.severity(ReferenceClass::Content), Severity::Warn);
    }

    #[test]
    fn test_check_site_resolves_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = write_site(
            temp.path(),
            "sidebars:\n  docs:\n    - intro\n    - guides/quickstart\n",
        );
        let config = site_args(config_path).load_config(None).unwrap();

        let site = check_site(&config, &Output::new()).unwrap();

        assert_eq!(site.reports().len(), 1);
        assert_eq!(site.reports()[0].unresolved_count(), 0);
        assert!(site.warnings().is_empty());
    }

    #[test]
    fn test_selected_locale_reads_its_own_docs() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = write_site(temp.path(), "sidebars:\n  docs:\n    - intro\n");
        fs::create_dir_all(temp.path().join("i18n/fr/docs")).unwrap();
        fs::write(
            temp.path().join("i18n/fr/docs/quickstart.md"),
            "# Démarrage rapide\n",
        )
        .unwrap();
        let args = SiteArgs {
            locales: vec!["fr".to_owned()],
            ..site_args(config_path)
        };
        let config = args.load_config(None).unwrap();

        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(locales(&config), vec![Locale::from("fr")]);

        let Err(CliError::Gate(failure)) = check_site(&config, &Output::new()) else {
            panic!("expected gate failure");
        };
        let violations: Vec<_> = failure
            .violations
            .iter()
            .map(|v| (v.locale.as_str(), v.outcome.target.as_str()))
            .collect();
        assert_eq!(violations, [("fr", "intro")]);
    }

    #[test]
    fn test_check_site_reports_missing_doc() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = write_site(
            temp.path(),
            "sidebars:\n  docs:\n    - intro\n    - guides/missing\n",
        );
        let config = site_args(config_path).load_config(None).unwrap();

        let Err(CliError::Gate(failure)) = check_site(&config, &Output::new()) else {
            panic!("expected gate failure");
        };
        let targets: Vec<_> = failure
            .violations
            .iter()
            .map(|v| v.outcome.target.as_str())
            .collect();
        assert_eq!(targets, ["guides/missing"]);
    }
}
