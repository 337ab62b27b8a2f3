//! Version comparison for PHP and Laravel compatibility

use crate::error::{InstallerError, Result};
use semver::Version;

/// A passed minimum-version check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub component: &'static str,
    pub found: String,
    pub required: String,
}

impl VersionCheck {
    /// Confirmation line shown to the user
    pub fn confirmation(&self) -> String {
        format!(
            "✓ {} {} meets minimum requirement ({})",
            self.component, self.found, self.required
        )
    }
}

/// Parse a version string leniently.
///
/// Accepts a leading `v`, missing minor/patch components (`8.3` -> `8.3.0`)
/// and trailing build noise (`8.3.6-1ubuntu1`, `8.4.0RC1`), which is dropped.
pub fn parse_version(version_str: &str) -> Result<Version> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let numeric: String = cleaned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = numeric
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>());

    let major = match parts.next() {
        Some(Ok(major)) => major,
        _ => return Err(InstallerError::InvalidVersion(version_str.to_string())),
    };
    let minor = parts.next().and_then(|p| p.ok()).unwrap_or(0);
    let patch = parts.next().and_then(|p| p.ok()).unwrap_or(0);

    Ok(Version::new(major, minor, patch))
}

/// Check that `found` is not strictly older than `required`
pub fn check_minimum(component: &'static str, found: &str, required: &str) -> Result<VersionCheck> {
    let found_ver = parse_version(found)?;
    let required_ver = parse_version(required)?;

    if found_ver < required_ver {
        return Err(InstallerError::IncompatibleVersion {
            component,
            required: required.to_string(),
            found: found.to_string(),
        });
    }

    Ok(VersionCheck {
        component,
        found: found.to_string(),
        required: required.to_string(),
    })
}

/// Validate the runtime and framework versions against their minimums.
///
/// Fails fast: when the runtime is too old the framework version is never
/// asked for. `on_pass` is called once for every check that succeeds.
pub fn validate<V, F>(
    runtime_version: &str,
    framework_version: V,
    min_runtime_version: &str,
    min_framework_version: &str,
    mut on_pass: F,
) -> Result<()>
where
    V: FnOnce() -> Result<String>,
    F: FnMut(&VersionCheck) -> Result<()>,
{
    let runtime = check_minimum("PHP", runtime_version, min_runtime_version)?;
    on_pass(&runtime)?;

    let framework_version = framework_version()?;
    let framework = check_minimum("Laravel", &framework_version, min_framework_version)?;
    on_pass(&framework)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_formats() {
        assert_eq!(parse_version("8.3.6").unwrap(), Version::new(8, 3, 6));
        assert_eq!(parse_version("v11.9.2").unwrap(), Version::new(11, 9, 2));
        assert_eq!(parse_version("8.3").unwrap(), Version::new(8, 3, 0));
        assert_eq!(parse_version("8.4.0RC1").unwrap(), Version::new(8, 4, 0));
        assert_eq!(parse_version(" 8.2.12-1ubuntu1 ").unwrap(), Version::new(8, 2, 12));
    }

    #[test]
    fn test_parse_version_rejects_garbage() {
        assert!(parse_version("unknown").is_err());
        assert!(parse_version("").is_err());
    }

    #[test]
    fn test_runtime_older_than_minimum() {
        let err = check_minimum("PHP", "8.1.27", "8.2.0").unwrap_err();
        assert!(matches!(err, InstallerError::IncompatibleVersion { component: "PHP", .. }));
    }

    #[test]
    fn test_equal_version_passes() {
        let check = check_minimum("Laravel", "10.0.0", "10.0.0").unwrap();
        assert_eq!(
            check.confirmation(),
            "✓ Laravel 10.0.0 meets minimum requirement (10.0.0)"
        );
    }

    fn detected(version: &str) -> impl FnOnce() -> Result<String> + '_ {
        move || Ok(version.to_string())
    }

    #[test]
    fn test_validate_reports_each_pass() {
        let mut passed = Vec::new();
        validate("8.3.0", detected("11.0.0"), "8.2.0", "10.0.0", |c| {
            passed.push(c.component);
            Ok(())
        })
        .unwrap();
        assert_eq!(passed, vec!["PHP", "Laravel"]);
    }

    #[test]
    fn test_validate_stops_at_runtime_failure() {
        let mut passed = Vec::new();
        let mut framework_detected = false;
        let err = validate(
            "7.4.0",
            || {
                framework_detected = true;
                Ok("9.0.0".to_string())
            },
            "8.2.0",
            "10.0.0",
            |c| {
                passed.push(c.component);
                Ok(())
            },
        )
        .unwrap_err();
        assert!(passed.is_empty());
        assert!(!framework_detected);
        assert!(err.to_string().starts_with("PHP 8.2.0"));
    }

    #[test]
    fn test_validate_reports_framework_failure() {
        let mut passed = Vec::new();
        let err = validate("8.2.0", detected("9.52.16"), "8.2.0", "10.0.0", |c| {
            passed.push(c.component);
            Ok(())
        })
        .unwrap_err();
        assert_eq!(passed, vec!["PHP"]);
        assert_eq!(
            err.to_string(),
            "Laravel 10.0.0 or higher is required. You have 9.52.16"
        );
    }

    #[test]
    fn test_validate_propagates_framework_detection_error() {
        let err = validate(
            "8.3.0",
            || {
                Err(InstallerError::VersionDetection {
                    tool: "Laravel",
                    reason: "no artisan".to_string(),
                })
            },
            "8.2.0",
            "10.0.0",
            |_| Ok(()),
        )
        .unwrap_err();
        assert!(matches!(err, InstallerError::VersionDetection { tool: "Laravel", .. }));
    }
}
