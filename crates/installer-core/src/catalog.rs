//! Package catalog and installed-package discovery
//!
//! The catalog is a closed, static table: insertion order is display order
//! and nothing is registered at runtime. Discovery reads `composer.lock` to
//! find which suite packages a project already has.

use crate::error::{InstallerError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Vendor prefix shared by every ArtisanPack UI Composer package
pub const VENDOR_PREFIX: &str = "artisanpack-ui/";

/// A Composer package that can be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSpec {
    /// Fully-qualified Composer name (e.g. `artisanpack-ui/hooks`)
    pub name: &'static str,
    pub description: &'static str,
    /// Installed with `composer require --dev`
    pub dev: bool,
    /// Artisan command to run once the package is newly installed
    pub post_install: Option<&'static str>,
}

impl PackageSpec {
    pub const fn runtime(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            dev: false,
            post_install: None,
        }
    }

    pub const fn dev(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            dev: true,
            post_install: None,
        }
    }

    pub const fn with_post_install(mut self, command: &'static str) -> Self {
        self.post_install = Some(command);
        self
    }
}

/// An npm package that can be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsPackageSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Composer packages offered by the installer
pub static ARTISANPACK_PACKAGES: &[PackageSpec] = &[
    PackageSpec::runtime(
        "artisanpack-ui/accessibility",
        "Color contrast and WCAG compliance utilities",
    ),
    PackageSpec::runtime(
        "artisanpack-ui/cms-framework",
        "CMS framework and content management",
    ),
    PackageSpec::dev("artisanpack-ui/code-style", "PHP_CodeSniffer standards"),
    PackageSpec::dev("artisanpack-ui/code-style-pint", "Laravel Pint configuration"),
    PackageSpec::runtime("artisanpack-ui/hooks", "WordPress-style actions and filters"),
    PackageSpec::runtime("artisanpack-ui/icons", "Extensible icon registration system"),
    PackageSpec::runtime(
        "artisanpack-ui/livewire-ui-components",
        "70+ pre-built UI components",
    )
    .with_post_install("artisanpack:generate-theme"),
    PackageSpec::runtime(
        "artisanpack-ui/media-library",
        "Media management with image processing",
    ),
    PackageSpec::runtime("artisanpack-ui/security", "Security utilities, sanitization, 2FA"),
];

/// npm packages offered by the installer
pub static ARTISANPACK_NPM_PACKAGES: &[JsPackageSpec] = &[JsPackageSpec {
    name: "@artisanpack-ui/livewire-drag-and-drop",
    description: "Drag and drop for Livewire",
}];

/// Names of packages already present in the project, restricted to the vendor prefix
pub type InstalledSet = BTreeSet<String>;

/// A view over a suite's static package tables
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub vendor_prefix: &'static str,
    pub packages: &'static [PackageSpec],
    pub npm_packages: &'static [JsPackageSpec],
}

impl Catalog {
    pub fn new(
        vendor_prefix: &'static str,
        packages: &'static [PackageSpec],
        npm_packages: &'static [JsPackageSpec],
    ) -> Self {
        Self {
            vendor_prefix,
            packages,
            npm_packages,
        }
    }

    /// The ArtisanPack UI catalog
    pub fn artisanpack() -> Self {
        Self::new(VENDOR_PREFIX, ARTISANPACK_PACKAGES, ARTISANPACK_NPM_PACKAGES)
    }

    /// Look up a Composer package by its fully-qualified name
    pub fn find(&self, name: &str) -> Option<&'static PackageSpec> {
        self.packages.iter().find(|spec| spec.name == name)
    }

    /// Look up an npm package by name
    pub fn find_npm(&self, name: &str) -> Option<&'static JsPackageSpec> {
        self.npm_packages.iter().find(|spec| spec.name == name)
    }

    /// Add the vendor prefix to a bare package name (`hooks` -> `artisanpack-ui/hooks`).
    /// Names that already contain a vendor are returned unchanged.
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('/') {
            name.to_string()
        } else {
            format!("{}{}", self.vendor_prefix, name)
        }
    }

    /// Strip the vendor prefix from a package name
    pub fn short_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.vendor_prefix).unwrap_or(name)
    }
}

#[derive(Debug, Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Option<Vec<LockedPackage>>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Option<Vec<LockedPackage>>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
}

/// Extract vendor-prefixed package names from the contents of a lock file
pub fn parse_lock(contents: &str, vendor_prefix: &str) -> serde_json::Result<InstalledSet> {
    let lock: LockFile = serde_json::from_str(contents)?;

    Ok(lock
        .packages
        .into_iter()
        .flatten()
        .chain(lock.packages_dev.into_iter().flatten())
        .map(|package| package.name)
        .filter(|name| name.starts_with(vendor_prefix))
        .collect())
}

/// Read the set of installed suite packages from a lock file.
///
/// A missing lock file means a fresh project and yields an empty set. A lock
/// file that exists but cannot be parsed is fatal.
#[tracing::instrument(skip(vendor_prefix))]
pub fn discover_installed(lock_path: &Path, vendor_prefix: &str) -> Result<InstalledSet> {
    if !lock_path.exists() {
        tracing::debug!("no lock file, treating project as fresh");
        return Ok(InstalledSet::new());
    }

    let contents =
        std::fs::read_to_string(lock_path).map_err(|source| InstallerError::LockFileRead {
            path: lock_path.to_path_buf(),
            source,
        })?;

    let installed =
        parse_lock(&contents, vendor_prefix).map_err(|source| InstallerError::MalformedLockFile {
            path: lock_path.to_path_buf(),
            source,
        })?;

    tracing::debug!(count = installed.len(), "discovered installed suite packages");
    Ok(installed)
}
