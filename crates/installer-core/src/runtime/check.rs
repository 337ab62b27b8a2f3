//! Runtime detection for PHP, Laravel, Composer and npm

use crate::error::{InstallerError, Result};
use std::path::Path;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl RuntimeInfo {
    fn missing(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            available: false,
        }
    }

    /// The detected version, or a detection error naming the tool
    pub fn require_version(self) -> Result<String> {
        match self.version {
            Some(version) if self.available => Ok(version),
            _ => Err(InstallerError::VersionDetection {
                tool: self.name,
                reason: "command failed or produced no version".to_string(),
            }),
        }
    }
}

/// Pull the first version-looking token out of a tool's output.
///
/// `Composer version 2.7.1 2024-02-09` -> `2.7.1`,
/// `Laravel Framework 11.9.2` -> `11.9.2`.
pub fn extract_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|token| token.strip_prefix('v').unwrap_or(token))
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()) && token.contains('.'))
        .map(|token| token.to_string())
}

fn probe(name: &'static str, program: &str, args: &[&str], dir: Option<&Path>) -> RuntimeInfo {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    match command.output() {
        Ok(out) if out.status.success() => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            let version = extract_version(&stdout);
            tracing::debug!(tool = name, ?version, "probed tool");
            RuntimeInfo {
                name,
                available: version.is_some(),
                version,
            }
        }
        Ok(out) => {
            tracing::debug!(tool = name, status = ?out.status, "probe exited unsuccessfully");
            RuntimeInfo::missing(name)
        }
        Err(e) => {
            tracing::debug!(tool = name, error = %e, "probe could not start");
            RuntimeInfo::missing(name)
        }
    }
}

/// Check the PHP version (`PHP_VERSION` of the CLI interpreter)
pub fn check_php(php: &str) -> RuntimeInfo {
    probe("PHP", php, &["-r", "echo PHP_VERSION;"], None)
}

/// Check the Laravel version of the project in `project_dir`
pub fn check_laravel(php: &str, project_dir: &Path) -> RuntimeInfo {
    probe("Laravel", php, &["artisan", "--version"], Some(project_dir))
}

/// Check if Composer is available
pub fn check_composer(composer: &str) -> RuntimeInfo {
    probe("Composer", composer, &["--version"], None)
}

/// Check if npm is available
pub fn check_npm(npm: &str) -> RuntimeInfo {
    probe("npm", npm, &["--version"], None)
}
