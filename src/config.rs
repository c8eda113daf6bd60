//! Application configuration.
//!
//! Loaded once by the composition root from an optional TOML file, with
//! environment variables taking precedence. Identity-provider coordinates
//! are mandatory; the email key is optional because code delivery has a
//! deliberate degraded mode.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_MIN_SPLASH_MS: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub identity: IdentityConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Identity provider coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the provider, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key sent with every request.
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Transactional email API key. Absent means degraded mode: codes are
    /// logged instead of mailed.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "EmailConfig::default_from_email")]
    pub from_email: String,

    #[serde(default = "EmailConfig::default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    fn default_from_email() -> String {
        "noreply@axys-banking.com".to_owned()
    }

    fn default_from_name() -> String {
        "Axys Banking".to_owned()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: Self::default_from_email(),
            from_name: Self::default_from_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// App data root; the vault and the OTP database live under it.
    /// Defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Minimum splash window in milliseconds.
    #[serde(default = "BootstrapConfig::default_min_splash_ms")]
    pub min_splash_ms: u64,
}

impl BootstrapConfig {
    fn default_min_splash_ms() -> u64 {
        DEFAULT_MIN_SPLASH_MS
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            min_splash_ms: DEFAULT_MIN_SPLASH_MS,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides (`AXYS_IDENTITY_URL`, `AXYS_IDENTITY_API_KEY`,
    /// `AXYS_EMAIL_API_KEY`, `AXYS_DATA_DIR`).
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        // Development convenience; a missing .env file is fine.
        dotenvy::dotenv().ok();

        let mut config = match config_path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            _ => Self {
                identity: IdentityConfig::default(),
                email: EmailConfig::default(),
                storage: StorageConfig::default(),
                bootstrap: BootstrapConfig::default(),
            },
        };

        if let Ok(url) = std::env::var("AXYS_IDENTITY_URL") {
            config.identity.url = url;
        }
        if let Ok(key) = std::env::var("AXYS_IDENTITY_API_KEY") {
            config.identity.api_key = key;
        }
        if let Ok(key) = std::env::var("AXYS_EMAIL_API_KEY") {
            config.email.api_key = Some(key);
        }
        if let Ok(dir) = std::env::var("AXYS_DATA_DIR") {
            config.storage.data_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.identity.url.is_empty() || self.identity.api_key.is_empty() {
            bail!(
                "identity provider is not configured: set [identity] url and api_key in the \
                 config file, or AXYS_IDENTITY_URL and AXYS_IDENTITY_API_KEY in the environment"
            );
        }
        Ok(())
    }

    /// Resolved app data root.
    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("axys"))
            .context("no platform data directory; set storage.data_dir or AXYS_DATA_DIR")
    }
}
