//! `docket check` command implementation.

use clap::Args;

use super::{SiteArgs, check_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site fails to load or the build gate aborts.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(None)?;

        output.info(&format!(
            "Checking {}",
            config.docs_resolved.source_dir.display()
        ));
        let site = check_site(&config, &output)?;

        let warnings = site.warnings().len();
        if warnings == 0 {
            output.success("All references resolved");
        } else {
            output.success(&format!("Check passed with {warnings} warning(s)"));
        }
        Ok(())
    }
}
