//! Charm-style CLI prompts using cliclack

use super::workflow::{install_packages, InstallArgs, WorkflowOutcome};
use crate::error::Result as InstallerResult;
use crate::product::SuiteConfig;
use crate::runtime::process::{SystemRunner, Toolchain};
use crate::selection::{Prompter, SelectOption};
use anyhow::Result;

/// [`Prompter`] backed by cliclack
#[derive(Debug, Clone, Copy, Default)]
pub struct ClackPrompter;

impl Prompter for ClackPrompter {
    fn multiselect(
        &self,
        label: &str,
        hint: &str,
        options: &[SelectOption],
    ) -> InstallerResult<Vec<String>> {
        let mut multi = cliclack::multiselect(format!("{} ({})", label, hint));

        for option in options {
            multi = multi.item(option.value.clone(), &option.label, "");
        }

        Ok(multi.required(false).interact()?)
    }

    fn confirm(&self, label: &str, default: bool) -> InstallerResult<bool> {
        Ok(cliclack::confirm(label).initial_value(default).interact()?)
    }

    fn note(&self, message: &str) -> InstallerResult<()> {
        Ok(cliclack::log::info(message)?)
    }
}

/// Run the installer with interactive prompts.
///
/// Fatal errors are reported to the user here before being returned, so
/// callers only need to turn them into an exit status.
pub async fn run<C: SuiteConfig>(config: &C, args: InstallArgs) -> Result<WorkflowOutcome> {
    cliclack::intro(format!("{} installer", config.display_name()))?;

    let tools = Toolchain::from_config(config);
    let runner = SystemRunner::new(args.resolved_project_dir()).with_timeout(args.timeout);

    let outcome = match install_packages(config, &args, &tools, &ClackPrompter, &runner).await {
        Ok(outcome) => outcome,
        Err(e) => {
            cliclack::log::error(e.to_string())?;
            cliclack::outro_cancel("Installation aborted")?;
            return Err(e.into());
        }
    };

    match &outcome {
        WorkflowOutcome::NothingSelected => cliclack::outro("Nothing to install")?,
        WorkflowOutcome::DryRun => cliclack::outro("Dry run finished")?,
        WorkflowOutcome::Cancelled => cliclack::outro_cancel("Installation cancelled")?,
        WorkflowOutcome::Completed(report) if report.has_failures() => {
            cliclack::outro_cancel("Some installation steps failed")?
        }
        WorkflowOutcome::Completed(_) => cliclack::outro("Happy coding!")?,
    }

    Ok(outcome)
}
