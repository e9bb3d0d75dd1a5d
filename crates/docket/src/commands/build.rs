//! `docket build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use docket_config::Config;
use docket_site::{ValidatedSite, compose};

use super::{SiteArgs, check_site, compose_options};
use crate::error::CliError;
use crate::output::Output;

/// Manifest consumed by the renderer.
const MANIFEST_FILENAME: &str = "manifest.json";
/// Theme settings passed through from `docket.toml`.
const THEME_FILENAME: &str = "theme.json";
/// Per-locale reference reports.
const REPORTS_DIR: &str = "reports";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Output directory for the manifest (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site fails to load, the build gate aborts or
    /// the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(self.output_dir)?;
        let output_dir = config.build_resolved.output_dir.clone();

        output.info(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let site = check_site(&config, &output)?;
        write_outputs(&config, &site, &output_dir)?;

        output.success(&format!(
            "Site manifest written to {}",
            output_dir.join(MANIFEST_FILENAME).display()
        ));
        Ok(())
    }
}

/// Write the manifest, theme and reports of a validated site.
fn write_outputs(config: &Config, site: &ValidatedSite, output_dir: &Path) -> Result<(), CliError> {
    let manifest = compose(site, &compose_options(config));

    let reports_dir = output_dir.join(REPORTS_DIR);
    fs::create_dir_all(&reports_dir)?;
    fs::write(
        output_dir.join(MANIFEST_FILENAME),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    fs::write(
        output_dir.join(THEME_FILENAME),
        serde_json::to_string_pretty(&config.theme)?,
    )?;
    for report in site.reports() {
        fs::write(
            reports_dir.join(format!("{}.json", report.locale())),
            report.to_json()?,
        )?;
    }

    tracing::info!(
        locales = site.reports().len(),
        dir = %output_dir.display(),
        "Wrote site outputs"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_outputs() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/intro.md"), "# Introduction\n").unwrap();
        fs::write(
            root.join("navigation.yaml"),
            "sidebars:\n  docs:\n    - intro\nnavbar:\n  items:\n    - { href: 'https://github.com/jobel', label: GitHub }\n",
        )
        .unwrap();
        let config_path = root.join("docket.toml");
        fs::write(
            &config_path,
            "[site]\ntitle = \"Jobel\"\nurl = \"https://jobel.dev\"\n\n[theme.color_mode]\ndefault_mode = \"dark\"\n",
        )
        .unwrap();
        let config = Config::load(Some(&config_path), None).unwrap();
        let out = root.join("build");

        let site = check_site(&config, &Output::new()).unwrap();
        write_outputs(&config, &site, &out).unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(manifest["title"], "Jobel");
        assert_eq!(manifest["locales"][0]["pages"][0]["href"], "/docs/intro");

        let theme: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(THEME_FILENAME)).unwrap()).unwrap();
        assert_eq!(theme["color_mode"]["default_mode"], "dark");

        assert!(out.join("reports/en.json").exists());
    }
}
