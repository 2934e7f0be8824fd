use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One city page to scrape. `name` is what lands in the record's `location`
/// column, regardless of what the page itself claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTarget {
    pub name: String,
    pub url: String,
}

/// CSS selector lists used by the locator and the record builder.
///
/// Every list is tried in order. Entries that fail to parse are skipped by the
/// locator and surface as error records in the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    /// Listing container candidates, most specific last.
    pub containers: Vec<String>,
    pub names: Vec<String>,
    pub prices: Vec<String>,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            containers: owned(&[
                "article",
                r#"div[class*="card"]"#,
                r#"div[class*="item"]"#,
                r#"div[class*="listing"]"#,
                r#"div[class*="product"]"#,
                r#"a[class*="car"]"#,
                r#"div[class*="vehicle"]"#,
            ]),
            names: owned(&[
                "h1",
                "h2",
                "h3",
                "h4",
                r#"[class*="title"]"#,
                r#"[class*="name"]"#,
            ]),
            prices: owned(&[
                r#"[class*="price"]"#,
                r#"[class*="amount"]"#,
                r#"[class*="cost"]"#,
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetsFile {
    pub locations: Vec<LocationTarget>,
    #[serde(default)]
    pub selectors: SelectorProfile,
}

/// Load and validate the scrape targets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_targets(&content)
}

/// Parse and validate targets YAML that is already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_targets(content: &str) -> Result<TargetsFile, ConfigError> {
    let targets_file: TargetsFile =
        serde_yaml::from_str(content).map_err(ConfigError::TargetsFileParse)?;

    validate_targets(&targets_file)?;

    Ok(targets_file)
}

fn validate_targets(targets_file: &TargetsFile) -> Result<(), ConfigError> {
    if targets_file.locations.is_empty() {
        return Err(ConfigError::Validation(
            "at least one location is required".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for target in &targets_file.locations {
        if target.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "location name must be non-empty".to_string(),
            ));
        }

        if !(target.url.starts_with("http://") || target.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "location '{}' has invalid url '{}'; must start with http:// or https://",
                target.name, target.url
            )));
        }

        if !seen_names.insert(target.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate location name: '{}'",
                target.name
            )));
        }
    }

    let selectors = &targets_file.selectors;
    if selectors.containers.is_empty() {
        return Err(ConfigError::Validation(
            "selectors.containers must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "targets_test.rs"]
mod tests;
