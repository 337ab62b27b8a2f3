//! Subprocess execution for Composer, npm and Artisan
//!
//! Commands are plain values so the dry-run preview and the real run are
//! built from the same list. Execution goes through [`CommandRunner`] so the
//! orchestrator can be driven without spawning anything.

use crate::product::SuiteConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// An external command to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Binaries used to install packages and run Artisan commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub php: String,
    pub composer: String,
    pub npm: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            php: "php".to_string(),
            composer: "composer".to_string(),
            npm: "npm".to_string(),
        }
    }
}

impl Toolchain {
    /// Resolve binaries from `<PREFIX>_PHP`, `<PREFIX>_COMPOSER` and `<PREFIX>_NPM`,
    /// falling back to the names on PATH
    pub fn from_config<C: SuiteConfig>(config: &C) -> Self {
        let defaults = Self::default();
        let lookup = |suffix: &str, fallback: String| {
            std::env::var(format!("{}_{}", config.env_prefix(), suffix)).unwrap_or(fallback)
        };

        Self {
            php: lookup("PHP", defaults.php),
            composer: lookup("COMPOSER", defaults.composer),
            npm: lookup("NPM", defaults.npm),
        }
    }

    /// `composer require [--dev] <packages...> --with-all-dependencies`
    pub fn composer_require(&self, packages: &[&str], dev: bool) -> InstallCommand {
        let mut args = vec!["require".to_string()];
        if dev {
            args.push("--dev".to_string());
        }
        args.extend(packages.iter().map(|p| p.to_string()));
        args.push("--with-all-dependencies".to_string());
        InstallCommand::new(self.composer.clone(), args)
    }

    /// `npm install <packages...>`
    pub fn npm_install(&self, packages: &[&str]) -> InstallCommand {
        InstallCommand::new(
            self.npm.clone(),
            std::iter::once("install").chain(packages.iter().copied()),
        )
    }

    /// `php artisan <command>`
    pub fn artisan(&self, command: &str) -> InstallCommand {
        InstallCommand::new(self.php.clone(), ["artisan", command])
    }
}

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Exited(i32),
    /// Killed by a signal before reporting an exit code
    Terminated,
    TimedOut,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        matches!(self, RunStatus::Exited(0))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Exited(code) => write!(f, "exit code {}", code),
            RunStatus::Terminated => write!(f, "terminated by signal"),
            RunStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Executes external commands, blocking the workflow until each one exits
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &InstallCommand) -> Result<RunStatus>;
}

/// Runs commands as child processes of the installer
#[derive(Debug, Clone)]
pub struct SystemRunner {
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            timeout: None,
        }
    }

    /// Kill commands that run longer than `limit`
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    #[tracing::instrument(skip(self, command), fields(command = %command))]
    async fn run(&self, command: &InstallCommand) -> Result<RunStatus> {
        // Output is passed straight through so Composer and npm can draw
        // their own progress and prompts.
        let mut child = TokioCommand::new(&command.program)
            .args(&command.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", command.program))?;

        let status = match self.timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    tracing::warn!(seconds = limit.as_secs(), "command timed out, killing it");
                    let _ = child.kill().await;
                    return Ok(RunStatus::TimedOut);
                }
            },
            None => child.wait().await,
        }
        .with_context(|| format!("Failed to wait for {}", command.program))?;

        tracing::debug!(?status, "command finished");
        Ok(match status.code() {
            Some(code) => RunStatus::Exited(code),
            None => RunStatus::Terminated,
        })
    }
}
