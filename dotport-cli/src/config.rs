//! CLI configuration: profiles and settings persisted as TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Data service URL used when neither a flag nor a profile provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// On-disk CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Profile used when `--profile` is not given
    #[serde(default)]
    pub default_profile: Option<String>,

    /// Named connection profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Settings shared by every profile
    #[serde(default)]
    pub settings: Settings,
}

impl CliConfig {
    /// Load from the standard config path; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "dotport", "dotport")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The named profile, or the default profile when `name` is `None`.
    pub fn get_profile(&self, name: Option<&str>) -> Option<&Profile> {
        let name = name.or(self.default_profile.as_deref())?;
        self.profiles.get(name)
    }

    pub fn get_or_create_profile(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_default()
    }

    pub fn set_default_profile(&mut self, name: &str) {
        self.default_profile = Some(name.to_string());
    }
}

/// One named connection: where to reach the data service and how to
/// authenticate against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Profile {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}

/// Settings shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retry attempts for transient request failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// How long cached dataset snapshots stay fresh, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Rows shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Output format used when `--output` is not given
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            cache_ttl_secs: default_cache_ttl(),
            page_size: default_page_size(),
            output_format: default_output_format(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_page_size() -> usize {
    dotport_core::DEFAULT_PAGE_SIZE
}

fn default_output_format() -> String {
    "table".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
        assert_eq!(config.settings.timeout_secs, 30);
        assert_eq!(config.settings.max_retries, 3);
        assert_eq!(config.settings.cache_ttl_secs, 300);
        assert_eq!(config.settings.page_size, 25);
        assert_eq!(config.settings.output_format, "table");
    }

    #[test]
    fn test_profile_api_url_fallback() {
        let profile = Profile::default();
        assert_eq!(profile.api_url(), DEFAULT_API_URL);

        let profile = Profile {
            api_url: Some("https://data.example.gov/api".to_string()),
            token: None,
        };
        assert_eq!(profile.api_url(), "https://data.example.gov/api");
    }

    #[test]
    fn test_get_profile_falls_back_to_default() {
        let mut config = CliConfig::default();
        config.get_or_create_profile("staging").api_url = Some("https://staging".to_string());
        config.set_default_profile("staging");

        assert!(config.get_profile(Some("staging")).is_some());
        assert!(config.get_profile(None).is_some());
        assert!(config.get_profile(Some("missing")).is_none());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CliConfig::default();
        config.set_default_profile("staging");
        let profile = config.get_or_create_profile("staging");
        profile.api_url = Some("https://staging.example.gov/api".to_string());
        profile.token = Some("secret-token".to_string());
        config.settings.page_size = 50;

        config.save_to(&path).unwrap();
        let loaded = CliConfig::load_from(&path).unwrap();

        assert_eq!(loaded.default_profile.as_deref(), Some("staging"));
        assert_eq!(
            loaded.get_profile(None).unwrap().api_url(),
            "https://staging.example.gov/api"
        );
        assert_eq!(
            loaded.get_profile(None).unwrap().token.as_deref(),
            Some("secret-token")
        );
        assert_eq!(loaded.settings.page_size, 50);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.profiles.is_empty());
        assert_eq!(loaded.settings.page_size, 25);
    }
}
