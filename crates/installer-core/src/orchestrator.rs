//! Runs the planned installation phases
//!
//! Phases are gated independently: a failed phase is reported and the run
//! moves on to the next one. The one exception is the dev install, which is
//! never attempted after the runtime install failed. Nothing is rolled back,
//! so a partial installation is a possible end state. With `fail_fast`
//! every phase after the first failure is skipped instead.

use crate::plan::{Phase, PlannedCommand};
use crate::runtime::process::{CommandRunner, InstallCommand};
use colored::Colorize;

/// What happened to one planned command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Succeeded,
    Failed(String),
    Skipped(String),
}

/// Outcome of one planned command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub command: InstallCommand,
    pub outcome: PhaseOutcome,
}

/// Outcome of a whole installation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub phases: Vec<PhaseReport>,
}

impl InstallReport {
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PhaseReport> {
        self.phases
            .iter()
            .filter(|report| matches!(report.outcome, PhaseOutcome::Failed(_)))
    }

    /// Commands that were actually started
    pub fn attempted(&self) -> impl Iterator<Item = &PhaseReport> {
        self.phases
            .iter()
            .filter(|report| !matches!(report.outcome, PhaseOutcome::Skipped(_)))
    }
}

/// Executes planned commands through a [`CommandRunner`]
pub struct Orchestrator<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    suite_name: &'a str,
    fail_fast: bool,
}

impl<'a, R: CommandRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(runner: &'a R, suite_name: &'a str) -> Self {
        Self {
            runner,
            suite_name,
            fail_fast: false,
        }
    }

    /// Skip every remaining phase once one fails
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    fn announce(&self, planned: &PlannedCommand) {
        match planned.phase {
            Phase::Runtime | Phase::Dev | Phase::Npm => {
                println!("{}", format!("Installing {}...", planned.phase).cyan());
            }
            Phase::Scaffold => {
                println!(
                    "{}",
                    format!("Scaffolding {} configuration...", self.suite_name).cyan()
                );
            }
            Phase::PostInstall => {
                let command = planned.command.args.last().map(String::as_str).unwrap_or("");
                let package = planned.package.as_deref().unwrap_or("");
                println!("Running {} for {}...", command, package);
            }
        }
        println!("{} {}", "Running:".dimmed(), planned.command.to_string().yellow());
        println!();
    }

    fn report_failure(&self, planned: &PlannedCommand, reason: &str) {
        let message = match planned.phase {
            Phase::Runtime | Phase::Dev | Phase::Npm => {
                format!("Failed to install {}.", planned.phase)
            }
            Phase::Scaffold | Phase::PostInstall => {
                format!("{} failed.", planned.command)
            }
        };
        eprintln!("{} {} ({})", "Error:".red().bold(), message, reason);
    }

    fn report_success(&self, planned: &PlannedCommand) {
        if matches!(planned.phase, Phase::Runtime | Phase::Dev | Phase::Npm) {
            println!();
            println!(
                "{}",
                format!("{} installed successfully.", planned.phase).green()
            );
        }
    }

    async fn run_one(&self, planned: &PlannedCommand) -> PhaseOutcome {
        self.announce(planned);

        let outcome = match self.runner.run(&planned.command).await {
            Ok(status) if status.success() => PhaseOutcome::Succeeded,
            Ok(status) => PhaseOutcome::Failed(status.to_string()),
            Err(e) => PhaseOutcome::Failed(format!("{:#}", e)),
        };

        match &outcome {
            PhaseOutcome::Succeeded => self.report_success(planned),
            PhaseOutcome::Failed(reason) => {
                tracing::warn!(phase = ?planned.phase, %reason, "phase failed");
                self.report_failure(planned, reason);
            }
            PhaseOutcome::Skipped(_) => {}
        }

        outcome
    }

    /// Run every planned command in order and report what happened
    pub async fn execute(&self, commands: &[PlannedCommand]) -> InstallReport {
        let mut report = InstallReport::default();
        let mut runtime_failed = false;
        let mut post_install_started = false;

        for planned in commands {
            let skip_reason = if self.fail_fast && report.has_failures() {
                Some("an earlier phase failed")
            } else if planned.phase == Phase::Dev && runtime_failed {
                Some("Composer packages failed to install")
            } else {
                None
            };

            let outcome = match skip_reason {
                Some(reason) => {
                    tracing::debug!(phase = ?planned.phase, reason, "skipping phase");
                    PhaseOutcome::Skipped(reason.to_string())
                }
                None => {
                    if planned.phase == Phase::PostInstall && !post_install_started {
                        post_install_started = true;
                        println!("{}", "Running post-install commands...".cyan());
                    }
                    self.run_one(planned).await
                }
            };

            if planned.phase == Phase::Runtime && matches!(outcome, PhaseOutcome::Failed(_)) {
                runtime_failed = true;
            }

            report.phases.push(PhaseReport {
                phase: planned.phase,
                command: planned.command.clone(),
                outcome,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::plan::{planned_commands, InstallationPlan, PlanOptions};
    use crate::runtime::process::{MockCommandRunner, RunStatus, Toolchain};
    use crate::selection::Selection;
    use std::sync::{Arc, Mutex};

    fn all_commands() -> Vec<PlannedCommand> {
        let catalog = Catalog::artisanpack();
        let selection = Selection {
            packages: catalog.packages.iter().collect(),
            npm_packages: catalog.npm_packages.iter().collect(),
        };
        planned_commands(
            &InstallationPlan::new(&catalog, &selection),
            &Toolchain::default(),
            "artisanpack:scaffold-config",
            PlanOptions::default(),
        )
    }

    /// Runner that records every command and fails the ones matching `fail`
    fn recording_runner(
        fail: fn(&InstallCommand) -> bool,
    ) -> (MockCommandRunner, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(move |command| {
            log.lock().unwrap().push(command.to_string());
            if fail(command) {
                Ok(RunStatus::Exited(1))
            } else {
                Ok(RunStatus::Exited(0))
            }
        });
        (runner, seen)
    }

    fn outcomes(report: &InstallReport) -> Vec<(Phase, bool)> {
        report
            .phases
            .iter()
            .map(|p| (p.phase, matches!(p.outcome, PhaseOutcome::Succeeded)))
            .collect()
    }

    #[tokio::test]
    async fn test_all_phases_succeed() {
        let (runner, seen) = recording_runner(|_| false);
        let report = Orchestrator::new(&runner, "ArtisanPack").execute(&all_commands()).await;

        assert!(!report.has_failures());
        assert_eq!(seen.lock().unwrap().len(), 5);
        assert_eq!(report.attempted().count(), 5);
    }

    #[tokio::test]
    async fn test_runtime_failure_skips_dev_but_not_later_phases() {
        let (runner, seen) = recording_runner(|c| {
            c.program == "composer" && !c.args.iter().any(|arg| arg == "--dev")
        });
        let report = Orchestrator::new(&runner, "ArtisanPack").execute(&all_commands()).await;

        assert_eq!(
            outcomes(&report),
            vec![
                (Phase::Runtime, false),
                (Phase::Dev, false),
                (Phase::Npm, true),
                (Phase::Scaffold, true),
                (Phase::PostInstall, true),
            ]
        );
        assert!(matches!(report.phases[0].outcome, PhaseOutcome::Failed(_)));
        assert!(matches!(report.phases[1].outcome, PhaseOutcome::Skipped(_)));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(!seen.iter().any(|c| c.contains("--dev")));
    }

    #[tokio::test]
    async fn test_npm_failure_does_not_stop_scaffold() {
        let (runner, _) = recording_runner(|c| c.program == "npm");
        let report = Orchestrator::new(&runner, "ArtisanPack").execute(&all_commands()).await;

        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().unwrap().phase, Phase::Npm);
        assert_eq!(report.attempted().count(), 5);
    }

    #[tokio::test]
    async fn test_fail_fast_skips_everything_after_failure() {
        let (runner, seen) = recording_runner(|c| c.program == "npm");
        let report = Orchestrator::new(&runner, "ArtisanPack")
            .fail_fast(true)
            .execute(&all_commands())
            .await;

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert!(matches!(report.phases[3].outcome, PhaseOutcome::Skipped(_)));
        assert!(matches!(report.phases[4].outcome, PhaseOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_spawn_error_is_phase_failure() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| Err(anyhow::anyhow!("Failed to start composer")));

        let commands = &all_commands()[..1];
        let report = Orchestrator::new(&runner, "ArtisanPack").execute(commands).await;
        match &report.phases[0].outcome {
            PhaseOutcome::Failed(reason) => assert!(reason.contains("Failed to start composer")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_phase_failure() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_| Ok(RunStatus::TimedOut));

        let commands = &all_commands()[2..3];
        let report = Orchestrator::new(&runner, "ArtisanPack").execute(commands).await;
        assert_eq!(
            report.phases[0].outcome,
            PhaseOutcome::Failed("timed out".to_string())
        );
    }
}
