//! Runtime detection and subprocess execution
//!
//! This module provides:
//! - PHP, Laravel, Composer and npm detection
//! - Minimum-version validation
//! - Command construction and execution for Composer, npm and Artisan

pub mod check;
pub mod process;
pub mod version;

pub use check::{check_composer, check_laravel, check_npm, check_php, RuntimeInfo};
pub use process::{CommandRunner, InstallCommand, RunStatus, SystemRunner, Toolchain};
pub use version::{check_minimum, validate, VersionCheck};
