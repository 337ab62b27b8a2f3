//! Installer Core - Shared library for package-suite installer CLIs
//!
//! This library provides the core functionality for picking packages from a
//! suite catalog and installing them into a Laravel project with Composer,
//! npm and Artisan. It is designed to be used by CLI binaries that share the
//! same workflow but ship different suite configurations.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure functions for catalog lookup, lock file
//!   discovery, selection, planning and summary rendering
//! - **Layer 2: Execution** - `SuiteConfig` trait, `CommandRunner` and the
//!   phase `Orchestrator`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts and the
//!   end-to-end workflow (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and workflow
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use installer_core::{catalog, selection, Catalog};
//!
//! let catalog = Catalog::artisanpack();
//! let installed = catalog::discover_installed("composer.lock".as_ref(), catalog.vendor_prefix)?;
//! let chosen = selection::select_server_packages(
//!     &catalog,
//!     &installed,
//!     &selection::ServerMode::All,
//!     &my_prompter,
//! )?;
//! ```

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod product;
pub mod runtime;
pub mod selection;
pub mod summary;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use catalog::{Catalog, InstalledSet, JsPackageSpec, PackageSpec};
pub use error::{InstallerError, Result};
pub use orchestrator::{InstallReport, Orchestrator, PhaseOutcome};
pub use plan::{InstallationPlan, Phase, PlannedCommand};
pub use product::SuiteConfig;
pub use selection::{NpmMode, Prompter, Selection, ServerMode};

#[cfg(feature = "tui")]
pub use tui::run;
