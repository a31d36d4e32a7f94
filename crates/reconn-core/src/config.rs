use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::Backoff;

/// How the wait before each reconnect grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    #[default]
    Linear,
    Exponential,
}

/// Backoff parameters (optional `[reconnect.backoff]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub strategy: BackoffStrategy,
    /// Linear step, or exponential base, in milliseconds.
    pub unit_ms: u64,
    /// Exponential cap in milliseconds. Ignored by the linear strategy.
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            strategy: BackoffStrategy::Linear,
            unit_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl BackoffConfig {
    pub fn policy(&self) -> Backoff {
        let unit = Duration::from_millis(self.unit_ms);
        match self.strategy {
            BackoffStrategy::Linear => Backoff::Linear { unit },
            BackoffStrategy::Exponential => Backoff::Exponential {
                base: unit,
                max: Duration::from_millis(self.max_delay_ms.max(self.unit_ms)),
            },
        }
    }
}

/// Per-connection reconnect settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// A logical call makes at most `max_retries + 1` reconnects.
    pub max_retries: u32,
    /// Log every reconnect attempt at warn level.
    pub debug: bool,
    pub backoff: BackoffConfig,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 7,
            debug: false,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Transport dialing parameters (optional `[dial]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Only "tcp" is dialed directly.
    pub proto: String,
    /// Local address hint handed to custom dialers. The built-in TCP dialer ignores it.
    pub laddr: Option<String>,
    /// Connect timeout; 0 disables it.
    pub timeout_ms: u64,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            proto: "tcp".to_string(),
            laddr: None,
            timeout_ms: 10_000,
        }
    }
}

/// Global configuration loaded from `~/.config/reconn/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnConfig {
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Optional dial settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub dial: Option<DialConfig>,
}

impl ReconnConfig {
    pub fn dial_or_default(&self) -> DialConfig {
        self.dial.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reconn")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReconnConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<ReconnConfig> {
    if !path.exists() {
        let default_cfg = ReconnConfig::default();
        save_at(path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(path)
}

pub fn to_toml(cfg: &ReconnConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Write `cfg` to `path`, creating parent directories.
pub fn save_at(path: &Path, cfg: &ReconnConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_toml(cfg)?)?;
    Ok(())
}

pub fn load_from(path: &Path) -> Result<ReconnConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: ReconnConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_values() {
        let cfg = ReconnConfig::default();
        assert_eq!(cfg.reconnect.max_retries, 7);
        assert!(!cfg.reconnect.debug);
        assert_eq!(cfg.reconnect.backoff.strategy, BackoffStrategy::Linear);
        assert_eq!(
            cfg.reconnect.backoff.policy(),
            Backoff::Linear {
                unit: Duration::from_secs(1)
            }
        );
        assert!(cfg.dial.is_none());
        assert_eq!(cfg.dial_or_default().proto, "tcp");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = ReconnConfig::default();
        let toml = to_toml(&cfg).unwrap();
        let parsed: ReconnConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: ReconnConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, ReconnConfig::default());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            [reconnect]
            max_retries = 2
            debug = true

            [reconnect.backoff]
            strategy = "exponential"
            unit_ms = 200
            max_delay_ms = 5000

            [dial]
            timeout_ms = 1500
        "#;
        let cfg: ReconnConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.reconnect.max_retries, 2);
        assert!(cfg.reconnect.debug);
        assert_eq!(
            cfg.reconnect.backoff.policy(),
            Backoff::Exponential {
                base: Duration::from_millis(200),
                max: Duration::from_secs(5),
            }
        );
        let dial = cfg.dial.unwrap();
        assert_eq!(dial.timeout_ms, 1500);
        assert_eq!(dial.proto, "tcp");
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, ReconnConfig::default());

        fs::write(&path, "[reconnect]\nmax_retries = 1\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.reconnect.max_retries, 1);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[reconnect\nmax_retries = ").unwrap();
        assert!(load_from(&path).is_err());
    }
}
