//! Package selection
//!
//! Turns flags or interactive choices into the set of packages to install.
//! Selection is additive only: a package already in the lock file is never
//! selected again. Results always come back in catalog order with no
//! duplicates, whatever order the user typed them in.

use crate::catalog::{Catalog, InstalledSet, JsPackageSpec, PackageSpec};
use crate::error::Result;
use std::collections::HashSet;

pub const SERVER_PROMPT: &str = "Which ArtisanPack UI packages would you like to install?";
pub const NPM_PROMPT: &str = "Which NPM packages would you like to install?";
pub const SELECT_HINT: &str = "Use space to select, enter to confirm";

/// How Composer packages are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMode {
    /// Every catalog package that is not installed yet
    All,
    /// A comma-separated list, with or without the vendor prefix
    Explicit(String),
    Interactive,
}

impl ServerMode {
    /// `--all` wins over `--packages`; a blank `--packages` counts as absent
    pub fn from_flags(all: bool, packages: Option<&str>) -> Self {
        if all {
            return ServerMode::All;
        }
        match packages {
            Some(list) if !list.trim().is_empty() => ServerMode::Explicit(list.to_string()),
            _ => ServerMode::Interactive,
        }
    }
}

/// How npm packages are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpmMode {
    Skip,
    Explicit(String),
    All,
    Interactive,
}

impl NpmMode {
    /// `--skip-npm` wins, then `--npm-packages`, then `--all`
    pub fn from_flags(skip: bool, all: bool, npm_packages: Option<&str>) -> Self {
        if skip {
            return NpmMode::Skip;
        }
        match npm_packages {
            Some(list) if !list.trim().is_empty() => NpmMode::Explicit(list.to_string()),
            _ if all => NpmMode::All,
            _ => NpmMode::Interactive,
        }
    }
}

/// One entry in a multi-select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value returned when the entry is picked
    pub value: String,
    pub label: String,
}

/// Interactive input used during selection and confirmation
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Let the user pick any number of options; returns the picked values
    fn multiselect(&self, label: &str, hint: &str, options: &[SelectOption]) -> Result<Vec<String>>;

    fn confirm(&self, label: &str, default: bool) -> Result<bool>;

    /// Show an informational, non-interactive message
    fn note(&self, message: &str) -> Result<()>;
}

/// Packages chosen for this run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub packages: Vec<&'static PackageSpec>,
    pub npm_packages: Vec<&'static JsPackageSpec>,
}

/// Split a comma-separated flag value into trimmed, non-empty names
pub fn parse_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Multi-select options for every Composer package that is not installed
pub fn server_options(catalog: &Catalog, installed: &InstalledSet) -> Vec<SelectOption> {
    catalog
        .packages
        .iter()
        .filter(|spec| !installed.contains(spec.name))
        .map(|spec| {
            let mut label = format!("{} - {}", spec.name, spec.description);
            if spec.dev {
                label.push_str(" (dev)");
            }
            SelectOption {
                value: spec.name.to_string(),
                label,
            }
        })
        .collect()
}

/// Multi-select options for every npm package
pub fn npm_options(catalog: &Catalog) -> Vec<SelectOption> {
    catalog
        .npm_packages
        .iter()
        .map(|spec| SelectOption {
            value: spec.name.to_string(),
            label: format!("{} - {}", spec.name, spec.description),
        })
        .collect()
}

/// Keep the catalog entries whose names were chosen, in catalog order
fn in_catalog_order(catalog: &Catalog, chosen: &HashSet<String>) -> Vec<&'static PackageSpec> {
    catalog
        .packages
        .iter()
        .filter(|spec| chosen.contains(spec.name))
        .collect()
}

/// Choose Composer packages to install
#[tracing::instrument(skip(catalog, installed, prompter))]
pub fn select_server_packages<P: Prompter + ?Sized>(
    catalog: &Catalog,
    installed: &InstalledSet,
    mode: &ServerMode,
    prompter: &P,
) -> Result<Vec<&'static PackageSpec>> {
    let chosen: HashSet<String> = match mode {
        ServerMode::All => catalog
            .packages
            .iter()
            .map(|spec| spec.name.to_string())
            .collect(),
        ServerMode::Explicit(raw) => parse_list(raw)
            .into_iter()
            .map(|name| catalog.qualify(name))
            .filter(|name| {
                let known = catalog.find(name).is_some();
                if !known {
                    tracing::debug!(package = %name, "ignoring package not in catalog");
                }
                known
            })
            .collect(),
        ServerMode::Interactive => {
            let options = server_options(catalog, installed);
            if options.is_empty() {
                prompter.note("All ArtisanPack UI Composer packages are already installed.")?;
                return Ok(Vec::new());
            }

            let names: Vec<&str> = installed
                .iter()
                .filter(|name| catalog.find(name).is_some())
                .map(|name| catalog.short_name(name))
                .collect();
            if !names.is_empty() {
                prompter.note(&format!("Already installed: {}", names.join(", ")))?;
            }

            prompter
                .multiselect(SERVER_PROMPT, SELECT_HINT, &options)?
                .into_iter()
                .collect()
        }
    };

    // Already-installed packages are dropped in every mode
    let chosen: HashSet<String> = chosen
        .into_iter()
        .filter(|name| !installed.contains(name))
        .collect();

    Ok(in_catalog_order(catalog, &chosen))
}

/// Choose npm packages to install
#[tracing::instrument(skip(catalog, prompter))]
pub fn select_npm_packages<P: Prompter + ?Sized>(
    catalog: &Catalog,
    mode: &NpmMode,
    prompter: &P,
) -> Result<Vec<&'static JsPackageSpec>> {
    if catalog.npm_packages.is_empty() {
        return Ok(Vec::new());
    }

    let chosen: HashSet<String> = match mode {
        NpmMode::Skip => return Ok(Vec::new()),
        NpmMode::All => catalog
            .npm_packages
            .iter()
            .map(|spec| spec.name.to_string())
            .collect(),
        NpmMode::Explicit(raw) => parse_list(raw)
            .into_iter()
            .filter(|name| catalog.find_npm(name).is_some())
            .map(str::to_string)
            .collect(),
        NpmMode::Interactive => prompter
            .multiselect(NPM_PROMPT, SELECT_HINT, &npm_options(catalog))?
            .into_iter()
            .collect(),
    };

    Ok(catalog
        .npm_packages
        .iter()
        .filter(|spec| chosen.contains(spec.name))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(names: &[&str]) -> InstalledSet {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn names(specs: &[&PackageSpec]) -> Vec<&'static str> {
        specs.iter().map(|spec| spec.name).collect()
    }

    /// A prompter that must not be touched
    fn silent_prompter() -> MockPrompter {
        let mut prompter = MockPrompter::new();
        prompter.expect_multiselect().never();
        prompter.expect_confirm().never();
        prompter
    }

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(ServerMode::from_flags(true, Some("hooks")), ServerMode::All);
        assert_eq!(
            ServerMode::from_flags(false, Some("hooks")),
            ServerMode::Explicit("hooks".to_string())
        );
        assert_eq!(ServerMode::from_flags(false, Some("  ")), ServerMode::Interactive);
        assert_eq!(ServerMode::from_flags(false, None), ServerMode::Interactive);

        assert_eq!(NpmMode::from_flags(true, true, Some("x")), NpmMode::Skip);
        assert_eq!(
            NpmMode::from_flags(false, true, Some("x")),
            NpmMode::Explicit("x".to_string())
        );
        assert_eq!(NpmMode::from_flags(false, true, None), NpmMode::All);
        assert_eq!(NpmMode::from_flags(false, false, Some("")), NpmMode::Interactive);
    }

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        assert_eq!(parse_list(" hooks, security ,,icons "), vec!["hooks", "security", "icons"]);
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_all_with_nothing_installed() {
        let catalog = Catalog::artisanpack();
        let selected =
            select_server_packages(&catalog, &installed(&[]), &ServerMode::All, &silent_prompter())
                .unwrap();
        assert_eq!(selected.len(), 9);
        assert_eq!(selected.iter().filter(|s| s.dev).count(), 2);
    }

    #[test]
    fn test_all_with_everything_installed() {
        let catalog = Catalog::artisanpack();
        let everything: Vec<&str> = catalog.packages.iter().map(|s| s.name).collect();
        let selected = select_server_packages(
            &catalog,
            &installed(&everything),
            &ServerMode::All,
            &silent_prompter(),
        )
        .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_explicit_list_keeps_only_new_catalog_packages() {
        let catalog = Catalog::artisanpack();
        let mode = ServerMode::Explicit("hooks,artisanpack-ui/security,unknown-thing".to_string());
        let selected = select_server_packages(
            &catalog,
            &installed(&["artisanpack-ui/security"]),
            &mode,
            &silent_prompter(),
        )
        .unwrap();
        assert_eq!(names(&selected), vec!["artisanpack-ui/hooks"]);
    }

    #[test]
    fn test_explicit_list_qualifies_bare_names() {
        let catalog = Catalog::artisanpack();
        let mode = ServerMode::Explicit("security, hooks, hooks".to_string());
        let selected =
            select_server_packages(&catalog, &installed(&[]), &mode, &silent_prompter()).unwrap();
        // Catalog order, deduplicated
        assert_eq!(
            names(&selected),
            vec!["artisanpack-ui/hooks", "artisanpack-ui/security"]
        );
    }

    #[test]
    fn test_explicit_list_rejects_other_vendors() {
        let catalog = Catalog::artisanpack();
        let mode = ServerMode::Explicit("laravel/framework,other/hooks".to_string());
        let selected =
            select_server_packages(&catalog, &installed(&[]), &mode, &silent_prompter()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_interactive_offers_only_uninstalled() {
        let catalog = Catalog::artisanpack();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_note()
            .withf(|message| message.contains("hooks"))
            .times(1)
            .returning(|_| Ok(()));
        prompter
            .expect_multiselect()
            .withf(|label, hint, options| {
                label == SERVER_PROMPT
                    && hint == SELECT_HINT
                    && options.len() == 8
                    && options.iter().all(|o| o.value != "artisanpack-ui/hooks")
                    && options
                        .iter()
                        .any(|o| o.label == "artisanpack-ui/code-style - PHP_CodeSniffer standards (dev)")
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    "artisanpack-ui/security".to_string(),
                    "artisanpack-ui/icons".to_string(),
                ])
            });

        let selected = select_server_packages(
            &catalog,
            &installed(&["artisanpack-ui/hooks"]),
            &ServerMode::Interactive,
            &prompter,
        )
        .unwrap();
        assert_eq!(
            names(&selected),
            vec!["artisanpack-ui/icons", "artisanpack-ui/security"]
        );
    }

    #[test]
    fn test_interactive_note_lists_only_catalog_packages() {
        let catalog = Catalog::artisanpack();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_note()
            .withf(|message| message == "Already installed: icons")
            .times(1)
            .returning(|_| Ok(()));
        prompter
            .expect_multiselect()
            .withf(|_, _, options| options.len() == 8)
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        select_server_packages(
            &catalog,
            &installed(&["artisanpack-ui/core", "artisanpack-ui/icons"]),
            &ServerMode::Interactive,
            &prompter,
        )
        .unwrap();
    }

    #[test]
    fn test_interactive_no_note_for_unknown_vendor_packages() {
        let catalog = Catalog::artisanpack();
        let mut prompter = MockPrompter::new();
        prompter.expect_note().never();
        prompter
            .expect_multiselect()
            .withf(|_, _, options| options.len() == 9)
            .times(1)
            .returning(|_, _, _| Ok(vec!["artisanpack-ui/hooks".to_string()]));

        let selected = select_server_packages(
            &catalog,
            &installed(&["artisanpack-ui/core"]),
            &ServerMode::Interactive,
            &prompter,
        )
        .unwrap();
        assert_eq!(names(&selected), vec!["artisanpack-ui/hooks"]);
    }

    #[test]
    fn test_interactive_skips_prompt_when_all_installed() {
        let catalog = Catalog::artisanpack();
        let everything: Vec<&str> = catalog.packages.iter().map(|s| s.name).collect();
        let mut prompter = silent_prompter();
        prompter
            .expect_note()
            .withf(|message| message.contains("already installed"))
            .times(1)
            .returning(|_| Ok(()));

        let selected = select_server_packages(
            &catalog,
            &installed(&everything),
            &ServerMode::Interactive,
            &prompter,
        )
        .unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_selection_is_idempotent() {
        let catalog = Catalog::artisanpack();
        let set = installed(&["artisanpack-ui/icons"]);
        let mode = ServerMode::Explicit("icons,hooks,code-style".to_string());
        let first = select_server_packages(&catalog, &set, &mode, &silent_prompter()).unwrap();
        let second = select_server_packages(&catalog, &set, &mode, &silent_prompter()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_npm_modes() {
        let catalog = Catalog::artisanpack();
        let prompter = silent_prompter();

        let all = select_npm_packages(&catalog, &NpmMode::All, &prompter).unwrap();
        assert_eq!(all.len(), 1);

        let skipped = select_npm_packages(&catalog, &NpmMode::Skip, &prompter).unwrap();
        assert!(skipped.is_empty());

        let explicit = select_npm_packages(
            &catalog,
            &NpmMode::Explicit("left-pad, @artisanpack-ui/livewire-drag-and-drop".to_string()),
            &prompter,
        )
        .unwrap();
        assert_eq!(explicit[0].name, "@artisanpack-ui/livewire-drag-and-drop");
        assert_eq!(explicit.len(), 1);
    }

    #[test]
    fn test_npm_interactive_prompt() {
        let catalog = Catalog::artisanpack();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_multiselect()
            .withf(|label, _, options| {
                label == NPM_PROMPT
                    && options[0].label
                        == "@artisanpack-ui/livewire-drag-and-drop - Drag and drop for Livewire"
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let selected = select_npm_packages(&catalog, &NpmMode::Interactive, &prompter).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_npm_empty_catalog_never_prompts() {
        let catalog = Catalog::new(
            crate::catalog::VENDOR_PREFIX,
            crate::catalog::ARTISANPACK_PACKAGES,
            &[],
        );
        let selected =
            select_npm_packages(&catalog, &NpmMode::Interactive, &silent_prompter()).unwrap();
        assert!(selected.is_empty());
    }
}
