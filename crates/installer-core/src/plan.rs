//! Installation plan: what runs, in which order
//!
//! The plan is derived from a [`Selection`] and drives both the dry-run
//! preview and the real execution, so the two can never disagree.

use crate::catalog::{Catalog, PackageSpec};
use crate::product::SuiteConfig;
use crate::runtime::process::{InstallCommand, Toolchain};
use crate::selection::Selection;
use std::fmt;

/// One discrete installation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// `composer require` for runtime packages
    Runtime,
    /// `composer require --dev`
    Dev,
    Npm,
    Scaffold,
    PostInstall,
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Runtime => "Composer packages",
            Phase::Dev => "Composer dev packages",
            Phase::Npm => "NPM packages",
            Phase::Scaffold => "configuration scaffold",
            Phase::PostInstall => "post-install command",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A follow-up Artisan command and the package that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInstall {
    pub command: &'static str,
    /// Short name of the triggering package (`livewire-ui-components`)
    pub package: String,
}

/// Post-install commands for the given packages.
///
/// Follows the order of `packages`; each command identifier appears once,
/// attributed to the first package that asked for it.
pub fn post_install_commands(catalog: &Catalog, packages: &[&PackageSpec]) -> Vec<PostInstall> {
    let mut commands: Vec<PostInstall> = Vec::new();

    for spec in packages {
        let Some(command) = spec.post_install else {
            continue;
        };
        if commands.iter().any(|existing| existing.command == command) {
            continue;
        }
        commands.push(PostInstall {
            command,
            package: catalog.short_name(spec.name).to_string(),
        });
    }

    commands
}

/// Selected packages partitioned by how they are installed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallationPlan {
    pub runtime: Vec<&'static str>,
    pub dev: Vec<&'static str>,
    pub npm: Vec<&'static str>,
    pub post_install: Vec<PostInstall>,
}

impl InstallationPlan {
    pub fn new(catalog: &Catalog, selection: &Selection) -> Self {
        let (dev, runtime): (Vec<&PackageSpec>, Vec<&PackageSpec>) =
            selection.packages.iter().copied().partition(|spec| spec.dev);

        Self {
            runtime: runtime.iter().map(|spec| spec.name).collect(),
            dev: dev.iter().map(|spec| spec.name).collect(),
            npm: selection.npm_packages.iter().map(|spec| spec.name).collect(),
            post_install: post_install_commands(catalog, &selection.packages),
        }
    }

    /// Number of Composer packages (runtime and dev)
    pub fn composer_count(&self) -> usize {
        self.runtime.len() + self.dev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composer_count() == 0 && self.npm.is_empty()
    }
}

/// Phases turned off from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    pub skip_scaffold: bool,
    pub skip_post_install: bool,
}

/// A command bound to the phase it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub phase: Phase,
    pub command: InstallCommand,
    /// Short package name for post-install commands
    pub package: Option<String>,
}

impl PlannedCommand {
    fn new(phase: Phase, command: InstallCommand) -> Self {
        Self {
            phase,
            command,
            package: None,
        }
    }
}

/// The external commands to run, in execution order:
/// runtime install, dev install, npm install, scaffold, post-install commands.
pub fn planned_commands(
    plan: &InstallationPlan,
    tools: &Toolchain,
    scaffold_command: &str,
    options: PlanOptions,
) -> Vec<PlannedCommand> {
    let mut commands = Vec::new();

    if !plan.runtime.is_empty() {
        commands.push(PlannedCommand::new(
            Phase::Runtime,
            tools.composer_require(&plan.runtime, false),
        ));
    }

    if !plan.dev.is_empty() {
        commands.push(PlannedCommand::new(
            Phase::Dev,
            tools.composer_require(&plan.dev, true),
        ));
    }

    if !plan.npm.is_empty() {
        commands.push(PlannedCommand::new(Phase::Npm, tools.npm_install(&plan.npm)));
    }

    if !options.skip_scaffold {
        commands.push(PlannedCommand::new(
            Phase::Scaffold,
            tools.artisan(scaffold_command),
        ));
    }

    if !options.skip_post_install {
        for post in &plan.post_install {
            commands.push(PlannedCommand {
                phase: Phase::PostInstall,
                command: tools.artisan(post.command),
                package: Some(post.package.clone()),
            });
        }
    }

    commands
}

/// Follow-up instructions shown after installation
pub fn next_steps<C: SuiteConfig>(config: &C, plan: &InstallationPlan) -> Vec<String> {
    let mut steps = Vec::new();
    let selected = |name: &str| plan.runtime.iter().chain(&plan.dev).any(|n| *n == name);

    if config.migration_packages().iter().any(|name| selected(*name)) {
        steps.push("Run migrations: php artisan migrate".to_string());
    }

    let ui_components = config.ui_components_package().is_some_and(|name| selected(name));

    if ui_components {
        steps.push("Import theme CSS in your main stylesheet".to_string());
    }

    if !plan.npm.is_empty() || ui_components {
        steps.push("Recompile assets: npm run dev".to_string());
    }

    steps.push(format!("Review configuration: {}", config.config_file()));

    steps
}
