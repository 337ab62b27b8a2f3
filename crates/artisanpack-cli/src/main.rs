//! ArtisanPack CLI - Interactive installer for ArtisanPack UI packages

use anyhow::Result;
use clap::{Parser, Subcommand};
use installer_core::catalog::{ARTISANPACK_NPM_PACKAGES, ARTISANPACK_PACKAGES, VENDOR_PREFIX};
use installer_core::tui::{InstallArgs, WorkflowOutcome};
use installer_core::{InstallerError, JsPackageSpec, PackageSpec, SuiteConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling diagnostic log output
const LOG_ENV: &str = "ARTISANPACK_LOG";

/// ArtisanPack UI suite configuration
#[derive(Clone)]
pub struct ArtisanPackConfig;

impl SuiteConfig for ArtisanPackConfig {
    fn name(&self) -> &'static str {
        "artisanpack"
    }

    fn display_name(&self) -> &'static str {
        "ArtisanPack UI"
    }

    fn vendor_prefix(&self) -> &'static str {
        VENDOR_PREFIX
    }

    fn packages(&self) -> &'static [PackageSpec] {
        ARTISANPACK_PACKAGES
    }

    fn npm_packages(&self) -> &'static [JsPackageSpec] {
        ARTISANPACK_NPM_PACKAGES
    }

    fn min_runtime_version(&self) -> &'static str {
        "8.2.0"
    }

    fn min_framework_version(&self) -> &'static str {
        "10.0.0"
    }

    fn scaffold_command(&self) -> &'static str {
        "artisanpack:scaffold-config"
    }

    fn migration_packages(&self) -> &'static [&'static str] {
        &["artisanpack-ui/media-library", "artisanpack-ui/cms-framework"]
    }

    fn ui_components_package(&self) -> Option<&'static str> {
        Some("artisanpack-ui/livewire-ui-components")
    }

    fn config_file(&self) -> &'static str {
        "config/artisanpack.php"
    }

    fn env_prefix(&self) -> &'static str {
        "ARTISANPACK"
    }
}

#[derive(Parser, Debug)]
#[command(name = "artisanpack")]
#[command(about = "Install ArtisanPack UI packages interactively")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install ArtisanPack UI packages interactively
    InstallPackages(CliInstallArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliInstallArgs {
    /// Comma-separated list of packages for non-interactive mode
    #[arg(long)]
    pub packages: Option<String>,

    /// Comma-separated list of NPM packages for non-interactive mode
    #[arg(long = "npm-packages")]
    pub npm_packages: Option<String>,

    /// Skip NPM packages prompt
    #[arg(long = "skip-npm")]
    pub skip_npm: bool,

    /// Skip running scaffold-config after installation
    #[arg(long = "skip-scaffold")]
    pub skip_scaffold: bool,

    /// Skip package-specific post-install commands
    #[arg(long = "skip-post-install")]
    pub skip_post_install: bool,

    /// Install all packages (non-interactive)
    #[arg(long)]
    pub all: bool,

    /// Show what would be installed without executing
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Auto-confirm the installation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Stop after the first failed installation step
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Skip the PHP and Laravel version checks
    #[arg(long = "skip-version-check")]
    pub skip_version_check: bool,

    /// Laravel project directory (defaults to the current directory)
    #[arg(short = 'd', long = "project-dir")]
    pub project_dir: Option<PathBuf>,

    /// Abort a Composer/npm/Artisan command after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl From<CliInstallArgs> for InstallArgs {
    fn from(args: CliInstallArgs) -> Self {
        InstallArgs {
            packages: args.packages,
            npm_packages: args.npm_packages,
            skip_npm: args.skip_npm,
            skip_scaffold: args.skip_scaffold,
            skip_post_install: args.skip_post_install,
            all: args.all,
            dry_run: args.dry_run,
            yes: args.yes,
            fail_fast: args.fail_fast,
            skip_version_check: args.skip_version_check,
            project_dir: args.project_dir,
            timeout: args.timeout.map(Duration::from_secs),
        }
    }
}

/// Exit status for a finished run. Errors raised by the workflow were already
/// shown by the installer; anything else (a broken terminal) is printed here.
fn exit_status(result: &Result<WorkflowOutcome>) -> u8 {
    match result {
        Ok(outcome) if outcome.is_success() => 0,
        Ok(_) => 1,
        Err(e) if e.downcast_ref::<InstallerError>().is_some() => {
            tracing::debug!(error = %format!("{:#}", e), "installer aborted");
            1
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = ArtisanPackConfig;

    // No subcommand defaults to the interactive install
    let install_args = match args.command {
        Some(Command::InstallPackages(install_args)) => install_args.into(),
        None => InstallArgs::default(),
    };
    tracing::debug!(args = ?install_args, "starting install");

    let result = installer_core::run(&config, install_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    ExitCode::from(exit_status(&result))
}
