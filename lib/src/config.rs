
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

static SETTINGS_FILE_NAME: &str = "settings.json";

pub struct ProjectConfig {
    pub settings: Settings,
    pub project_dirs: ProjectDirs,
}

impl ProjectConfig {
    pub async fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "campus", "campus-sync")
            .ok_or_else(|| anyhow!("Failed to get project directories"))?;
        for x in [proj_dirs.config_dir(), proj_dirs.cache_dir(), proj_dirs.data_dir()] {
            if !x.exists() {
                fs::create_dir_all(x).context("Failed to create config directory")?;
            }
        }

        let settings = Settings::new(&proj_dirs.config_dir().join(SETTINGS_FILE_NAME)).await?;
        Ok(Self { settings, project_dirs: proj_dirs })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.project_dirs.config_dir().join(SETTINGS_FILE_NAME)
    }
}

/// How a conflict reported by the server is settled
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    LocalWins,
    #[default]
    ServerWins,
    Manual,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::LocalWins => "local_wins",
            ConflictPolicy::ServerWins => "server_wins",
            ConflictPolicy::Manual => "manual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "local_wins" => Some(ConflictPolicy::LocalWins),
            "server_wins" => Some(ConflictPolicy::ServerWins),
            "manual" => Some(ConflictPolicy::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub device: DeviceConfig,
    pub sync_config: SyncConfig,
    pub retry: RetryConfig,
    pub downloads: DownloadConfig,
    pub provisioning: ProvisioningConfig,
    pub connectivity: ConnectivityConfig,
    pub conflict_policy: ConflictPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub health_path: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            health_path: "/health".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Device description sent with every sync and provisioning request
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DeviceConfig {
    pub platform: String,
    pub os_version: String,
    pub model: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            platform: std::env::consts::OS.to_string(),
            os_version: "unknown".to_string(),
            model: std::env::consts::ARCH.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    pub sync_interval: Duration,
    /// Failed deliveries after which a sync item is frozen as `failed`
    pub max_retry_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(60),
            max_retry_attempts: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
    pub slow_network_threshold: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::from_secs(1),
            slow_network_threshold: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    /// Free space required before a download is admitted
    pub min_free_bytes: u64,
    /// Defaults to `<data_dir>/content`
    pub content_dir: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            min_free_bytes: 10 * 1024 * 1024,
            content_dir: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ProvisioningConfig {
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_polls: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub check_interval: Duration,
    pub probe_timeout: Duration,
    pub internet_endpoints: Vec<String>,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(15),
            probe_timeout: Duration::from_secs(5),
            internet_endpoints: vec![
                "https://www.google.com".to_string(),
                "https://www.cloudflare.com".to_string(),
            ],
        }
    }
}

impl Settings {
    pub async fn new(config_file_path: &Path) -> Result<Self> {
        match Self::load_settings_from_file(config_file_path) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Error loading settings from file - creating default config: {}", e);
                let default = Self::default();
                default.save_to_file(config_file_path)?;
                Ok(default)
            }
        }
    }

    pub fn load_settings_from_file(config_file_path: &Path) -> Result<Self> {
        if !config_file_path.exists() {
            return Err(anyhow!("Config file not found"));
        }
        let data = fs::read_to_string(config_file_path)?;
        let settings: Self = serde_json::from_str(&data)?;
        Ok(settings)
    }

    pub fn save_to_file(&self, config_file_path: &Path) -> Result<()> {
        if let Some(parent_path) = config_file_path.parent() {
            fs::create_dir_all(parent_path).context("Failed to create config directory")?;
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sync_config_default() {
        let config = SyncConfig::default();
        assert_eq!(config.sync_interval, Duration::from_secs(60));
        assert_eq!(config.max_retry_attempts, 5);
    }

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.conflict_policy, ConflictPolicy::ServerWins);
        assert_eq!(settings.downloads.min_free_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.provisioning.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.retry.max_retries, 3);
    }

    #[test]
    fn test_conflict_policy_round_trip_names() {
        for policy in [ConflictPolicy::LocalWins, ConflictPolicy::ServerWins, ConflictPolicy::Manual] {
            assert_eq!(ConflictPolicy::from_str(policy.as_str()), Some(policy));
        }
        assert_eq!(ConflictPolicy::from_str("newest"), None);

        let json = serde_json::to_string(&ConflictPolicy::LocalWins).unwrap();
        assert_eq!(json, "\"local_wins\"");
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.json");
        fs::write(
            &config_path,
            r#"{ "conflict_policy": "manual", "retry": { "max_retries": 7 } }"#,
        )
        .unwrap();

        let settings = Settings::load_settings_from_file(&config_path).unwrap();
        assert_eq!(settings.conflict_policy, ConflictPolicy::Manual);
        assert_eq!(settings.retry.max_retries, 7);
        assert_eq!(settings.retry.max_delay, Duration::from_secs(30));
        assert_eq!(settings.sync_config.sync_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_load_settings_from_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.json");

        let result = Settings::load_settings_from_file(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_settings_from_file_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid_settings.json");
        fs::write(&config_path, "{ invalid json }").unwrap();

        assert!(Settings::load_settings_from_file(&config_path).is_err());
    }

    #[test]
    fn test_save_to_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("deep").join("settings.json");

        let settings = Settings::default();
        settings.save_to_file(&config_path).unwrap();

        assert!(config_path.exists());
        let loaded = Settings::load_settings_from_file(&config_path).unwrap();
        assert_eq!(loaded.api.base_url, settings.api.base_url);
    }

    #[tokio::test]
    async fn test_settings_new_creates_default_when_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("new_settings.json");

        let settings = Settings::new(&config_path).await.unwrap();

        assert_eq!(settings.sync_config.sync_interval, Duration::from_secs(60));
        assert!(config_path.exists());
    }

    #[tokio::test]
    async fn test_settings_new_replaces_invalid_file_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.json");
        fs::write(&config_path, "not json").unwrap();

        let settings = Settings::new(&config_path).await.unwrap();
        assert_eq!(settings.conflict_policy, ConflictPolicy::ServerWins);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("server_wins"));
    }
}
