//! User configuration.
//!
//! Settings live in `config.toml` under the vpip home (`$VPIP_HOME`, or
//! `~/.vpip`). Every key is optional:
//!
//! ```toml
//! index_url = "https://pypi.org/simple"
//!
//! [variants]
//! provider_priority = ["fictional_hw", "gcc"]
//!
//! [[providers]]
//! name = "fictional_hw"
//! values = [{ key = "architecture", value = "tars" }]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::Deserialize;
use thiserror::Error;
use vpip_schema::{ProviderConfig, ProviderProperty};

use crate::providers::{PrioritySource, ProviderSource, priority_from_names};

/// Index queried when neither the command line nor the config names one.
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/simple";

/// Returns the vpip home directory, or None if the user's home cannot be resolved.
pub fn try_vpip_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("VPIP_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".vpip"))
}

/// Config file path: ~/.vpip/config.toml
pub fn config_path() -> Option<PathBuf> {
    try_vpip_home().map(|home| home.join("config.toml"))
}

/// Failures while reading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid config TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One `{ key, value }` entry offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderValue {
    /// Property key, e.g. `architecture`.
    pub key: String,
    /// Property value, e.g. `tars`.
    pub value: String,
}

/// A `[[providers]]` table: a statically configured variant provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderEntry {
    /// Provider name used for priority and hashing.
    pub name: String,
    /// Supported values, most preferred first.
    #[serde(default)]
    pub values: Vec<ProviderValue>,
}

/// The `[variants]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariantSettings {
    /// Provider names, most preferred first.
    pub provider_priority: Vec<String>,
}

/// Parsed contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simple-index root URL.
    pub index_url: Option<String>,
    /// Variant selection preferences.
    pub variants: VariantSettings,
    /// Statically configured providers.
    pub providers: Vec<ProviderEntry>,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&content)
    }

    /// Read the user's config, falling back to defaults with a warning when
    /// it is unreadable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            tracing::debug!("No home directory; using default settings");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// The configured index, or [`DEFAULT_INDEX_URL`].
    pub fn index_url(&self) -> &str {
        self.index_url.as_deref().unwrap_or(DEFAULT_INDEX_URL)
    }
}

impl ProviderSource for Settings {
    fn provider_configs(&self) -> Vec<ProviderConfig> {
        self.providers
            .iter()
            .filter_map(|entry| {
                let values: Vec<ProviderProperty> = entry
                    .values
                    .iter()
                    .map(|v| ProviderProperty::new(&entry.name, &v.key, &v.value))
                    .filter(|property| {
                        let hashable = property.is_hashable();
                        if !hashable {
                            tracing::warn!(
                                "Ignoring provider value `{property}`: names and keys must not contain `::` or line breaks"
                            );
                        }
                        hashable
                    })
                    .collect();
                if values.is_empty() {
                    tracing::warn!("Provider `{}` has no usable values configured, ignoring", entry.name);
                    return None;
                }
                Some(ProviderConfig::new(&entry.name, values))
            })
            .collect()
    }
}

impl PrioritySource for Settings {
    fn provider_priority(&self) -> HashMap<String, usize> {
        priority_from_names(&self.variants.provider_priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
index_url = "http://localhost:8080/simple"

[variants]
provider_priority = ["fictional_hw", "gcc"]

[[providers]]
name = "gcc"
values = [{ key = "version", value = "1.2.3" }]

[[providers]]
name = "fictional_hw"
values = [
    { key = "architecture", value = "tars" },
    { key = "architecture", value = "HAL9000" },
]
"#;

    #[test]
    fn test_parse_full_config() {
        let settings = Settings::from_toml(SAMPLE).unwrap();
        assert_eq!(settings.index_url(), "http://localhost:8080/simple");
        assert_eq!(settings.variants.provider_priority, ["fictional_hw", "gcc"]);

        let configs = settings.provider_configs();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[1].provider_name, "fictional_hw");
        assert_eq!(
            configs[1].ordered_values,
            [
                ProviderProperty::new("fictional_hw", "architecture", "tars"),
                ProviderProperty::new("fictional_hw", "architecture", "HAL9000"),
            ]
        );

        let priority = settings.provider_priority();
        assert_eq!(priority["fictional_hw"], 0);
        assert_eq!(priority["gcc"], 1);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.index_url(), DEFAULT_INDEX_URL);
        assert!(settings.provider_configs().is_empty());
        assert!(settings.provider_priority().is_empty());
    }

    #[test]
    fn test_provider_without_values_is_ignored() {
        let settings = Settings::from_toml(
            "[[providers]]\nname = \"idle\"\n\n[[providers]]\nname = \"gcc\"\nvalues = [{ key = \"version\", value = \"1\" }]\n",
        )
        .unwrap();
        let configs = settings.provider_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].provider_name, "gcc");
    }

    #[test]
    fn test_ambiguous_provider_fields_are_ignored() {
        let settings = Settings::from_toml(
            r#"
[[providers]]
name = "a :: b"
values = [{ key = "c", value = "v" }]

[[providers]]
name = "a"
values = [
    { key = "b :: c", value = "v" },
    { key = "arch", value = "x\ny" },
    { key = "arch", value = "tars" },
]
"#,
        )
        .unwrap();
        let configs = settings.provider_configs();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].provider_name, "a");
        assert_eq!(configs[0].ordered_values, [ProviderProperty::new("a", "arch", "tars")]);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = Settings::from_toml("index_url = [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.providers.len(), 2);
    }

    #[test]
    fn test_load_from_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = Settings::load_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
