//! Suite configuration trait for installer binaries
//!
//! This trait defines the interface each package suite must implement to
//! configure the installer for its own catalog and host framework.

use crate::catalog::{Catalog, JsPackageSpec, PackageSpec};

/// Configuration trait for different package suites
///
/// Each suite implements this trait to define:
/// - Suite identity (name, display name, vendor prefix)
/// - The Composer and npm catalogs
/// - Minimum PHP and Laravel versions
/// - Artisan commands and next-step hints
pub trait SuiteConfig: Clone + Send + Sync + 'static {
    /// Internal suite name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Composer vendor prefix including the trailing slash
    fn vendor_prefix(&self) -> &'static str;

    /// Composer packages, in display order
    fn packages(&self) -> &'static [PackageSpec];

    /// npm packages, in display order
    fn npm_packages(&self) -> &'static [JsPackageSpec];

    /// Minimum PHP version
    fn min_runtime_version(&self) -> &'static str;

    /// Minimum Laravel version
    fn min_framework_version(&self) -> &'static str;

    /// Artisan command that scaffolds the suite's configuration
    fn scaffold_command(&self) -> &'static str;

    /// Packages that ship database migrations
    fn migration_packages(&self) -> &'static [&'static str];

    /// The UI component package whose theme must be imported and compiled
    fn ui_components_package(&self) -> Option<&'static str>;

    /// Published config file, relative to the project root
    fn config_file(&self) -> &'static str;

    /// Prefix for environment variables overriding tool binaries
    /// (`<PREFIX>_PHP`, `<PREFIX>_COMPOSER`, `<PREFIX>_NPM`)
    fn env_prefix(&self) -> &'static str;

    /// Lock file read to discover installed packages
    fn lock_file(&self) -> &'static str {
        "composer.lock"
    }

    fn catalog(&self) -> Catalog {
        Catalog::new(self.vendor_prefix(), self.packages(), self.npm_packages())
    }
}
