//! The install-packages workflow
//!
//! Validator -> lock file discovery -> selection -> summary (dry-run stops
//! here) -> confirmation -> installation phases -> next steps.

use crate::catalog::discover_installed;
use crate::error::Result;
use crate::orchestrator::{InstallReport, Orchestrator, PhaseOutcome};
use crate::plan::{next_steps, planned_commands, InstallationPlan, PlanOptions};
use crate::product::SuiteConfig;
use crate::runtime::check;
use crate::runtime::process::{CommandRunner, Toolchain};
use crate::runtime::version;
use crate::selection::{
    select_npm_packages, select_server_packages, NpmMode, Prompter, Selection, ServerMode,
};
use crate::summary::{render_summary, SummaryOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Arguments for the install-packages command
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    /// Comma-separated Composer packages (non-interactive)
    pub packages: Option<String>,

    /// Comma-separated npm packages (non-interactive)
    pub npm_packages: Option<String>,

    pub skip_npm: bool,

    /// Don't run the configuration scaffold command afterwards
    pub skip_scaffold: bool,

    /// Don't run package-specific post-install commands
    pub skip_post_install: bool,

    /// Install every package that is not installed yet
    pub all: bool,

    /// Show what would be installed without executing anything
    pub dry_run: bool,

    /// Auto-confirm the proceed prompt
    pub yes: bool,

    /// Skip all remaining phases after the first failure
    pub fail_fast: bool,

    /// Skip the PHP and Laravel version checks
    pub skip_version_check: bool,

    /// Laravel project root (defaults to the current directory)
    pub project_dir: Option<PathBuf>,

    /// Per-command time limit for Composer, npm and Artisan
    pub timeout: Option<Duration>,
}

impl InstallArgs {
    pub fn resolved_project_dir(&self) -> PathBuf {
        match &self.project_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| dir.clone()),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// How a workflow run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    NothingSelected,
    DryRun,
    Cancelled,
    Completed(InstallReport),
}

impl WorkflowOutcome {
    /// False only when an installation phase failed
    pub fn is_success(&self) -> bool {
        !matches!(self, WorkflowOutcome::Completed(report) if report.has_failures())
    }
}

fn check_versions<C: SuiteConfig>(config: &C, tools: &Toolchain, project_dir: &Path) -> Result<()> {
    cliclack::log::step("Checking version compatibility...")?;

    let php = check::check_php(&tools.php).require_version()?;
    version::validate(
        &php,
        || check::check_laravel(&tools.php, project_dir).require_version(),
        config.min_runtime_version(),
        config.min_framework_version(),
        |passed| Ok(cliclack::log::success(passed.confirmation())?),
    )
}

/// Warn about missing installers before running them
fn check_tools(tools: &Toolchain, plan: &InstallationPlan) -> Result<()> {
    if plan.composer_count() > 0 && !check::check_composer(&tools.composer).available {
        cliclack::log::warning(format!(
            "Composer was not found ({}); Composer packages will fail to install",
            tools.composer
        ))?;
    }
    if !plan.npm.is_empty() && !check::check_npm(&tools.npm).available {
        cliclack::log::warning(format!(
            "npm was not found ({}); NPM packages will fail to install",
            tools.npm
        ))?;
    }
    Ok(())
}

fn print_completion<C: SuiteConfig>(
    config: &C,
    plan: &InstallationPlan,
    report: &InstallReport,
) -> Result<()> {
    println!();
    if report.has_failures() {
        cliclack::log::warning(format!(
            "Installation finished with errors ({} of {} steps failed):",
            report.failures().count(),
            report.attempted().count()
        ))?;
        for failed in report.failures() {
            if let PhaseOutcome::Failed(reason) = &failed.outcome {
                cliclack::log::error(format!("{} ({})", failed.command, reason))?;
            }
        }
    } else {
        cliclack::log::success("Installation complete!")?;
    }

    println!();
    println!("  Next steps");
    println!();
    for step in next_steps(config, plan) {
        println!("  • {}", step);
    }
    println!();

    Ok(())
}

/// Run the install-packages workflow
#[tracing::instrument(skip_all, fields(suite = config.name()))]
pub async fn install_packages<C, P, R>(
    config: &C,
    args: &InstallArgs,
    tools: &Toolchain,
    prompter: &P,
    runner: &R,
) -> Result<WorkflowOutcome>
where
    C: SuiteConfig,
    P: Prompter + ?Sized,
    R: CommandRunner + ?Sized,
{
    let project_dir = args.resolved_project_dir();

    if args.skip_version_check {
        cliclack::log::info("Skipping version check")?;
    } else {
        check_versions(config, tools, &project_dir)?;
    }

    let catalog = config.catalog();
    let installed = discover_installed(&project_dir.join(config.lock_file()), config.vendor_prefix())?;

    let server_mode = ServerMode::from_flags(args.all, args.packages.as_deref());
    let npm_mode = NpmMode::from_flags(args.skip_npm, args.all, args.npm_packages.as_deref());

    let selection = Selection {
        packages: select_server_packages(&catalog, &installed, &server_mode, prompter)?,
        npm_packages: select_npm_packages(&catalog, &npm_mode, prompter)?,
    };

    let plan = InstallationPlan::new(&catalog, &selection);
    if plan.is_empty() {
        cliclack::log::info("No packages selected for installation.")?;
        return Ok(WorkflowOutcome::NothingSelected);
    }

    let commands = planned_commands(
        &plan,
        tools,
        config.scaffold_command(),
        PlanOptions {
            skip_scaffold: args.skip_scaffold,
            skip_post_install: args.skip_post_install,
        },
    );
    tracing::debug!(commands = commands.len(), "planned installation");

    println!();
    for line in render_summary(
        &plan,
        &commands,
        SummaryOptions {
            dry_run: args.dry_run,
            skip_post_install: args.skip_post_install,
        },
    ) {
        println!("{}", line);
    }
    println!();

    if args.dry_run {
        cliclack::log::info("Dry run mode - no changes were made.")?;
        return Ok(WorkflowOutcome::DryRun);
    }

    if !args.yes && !prompter.confirm("Proceed with installation?", true)? {
        cliclack::log::info("Installation cancelled.")?;
        return Ok(WorkflowOutcome::Cancelled);
    }

    check_tools(tools, &plan)?;

    let report = Orchestrator::new(runner, config.display_name())
        .fail_fast(args.fail_fast)
        .execute(&commands)
        .await;

    print_completion(config, &plan, &report)?;

    Ok(WorkflowOutcome::Completed(report))
}
