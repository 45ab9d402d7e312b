//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/aclboot/aclboot.toml`
//! 3. Environment variables: `ACLBOOT_*` prefix
//!
//! The `--address` flag overrides the loaded address for a single invocation.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::application::ApplicationError;

/// Default control-plane HTTP address.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Unified configuration for aclboot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Control-plane address (default: http://127.0.0.1:4646)
    pub address: String,
    /// Region forwarded with the bootstrap request
    pub region: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Accept invalid TLS certificates
    pub tls_skip_verify: bool,
    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.into(),
            region: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tls_skip_verify: false,
            log_level: "warn".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub address: Option<String>,
    pub region: Option<String>,
    pub timeout_secs: Option<u64>,
    pub tls_skip_verify: Option<bool>,
    pub log_level: Option<String>,
}

/// Get the XDG config directory for aclboot.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "aclboot").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("aclboot.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins if Some.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            address: overlay
                .address
                .clone()
                .unwrap_or_else(|| self.address.clone()),
            region: overlay.region.clone().or_else(|| self.region.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            tls_skip_verify: overlay.tls_skip_verify.unwrap_or(self.tls_skip_verify),
            log_level: overlay
                .log_level
                .clone()
                .unwrap_or_else(|| self.log_level.clone()),
        }
    }

    /// Load settings from the global config file and environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with an explicit config file.
    ///
    /// A missing file is skipped; an unreadable or malformed one is an error.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply ACLBOOT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ACLBOOT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("address") {
            settings.address = val;
        }
        if let Ok(val) = config.get_string("region") {
            settings.region = Some(val).filter(|r| !r.is_empty());
        }
        if let Ok(val) = config.get_string("timeout_secs") {
            settings.timeout_secs = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("ACLBOOT_TIMEOUT_SECS={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("tls_skip_verify") {
            settings.tls_skip_verify = parse_bool(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("ACLBOOT_TLS_SKIP_VERIFY={val}: expected true or false"),
            })?;
        }
        if let Ok(val) = config.get_string("log_level") {
            settings.log_level = val;
        }

        Ok(settings)
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
