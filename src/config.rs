//! Application configuration (TOML file with per-section defaults).
//!
//! Loaded from `$GATE_CONFIG` or `~/.config/gate-central/config.toml`;
//! every section and field is optional and falls back to its default, so a
//! partial file is fine.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub access: AccessConfig,
    pub mqtt: MqttSettings,
    pub admin: AdminConfig,
    pub rate_limit: RateLimitConfig,
    pub uploads: UploadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./gates.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 12,
        }
    }
}

/// Reference timezone for the time-window check.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub timezone: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

impl AccessConfig {
    /// Parse the configured timezone, falling back to the default zone on
    /// an unknown name.
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(
                    "Unknown timezone '{}', falling back to America/Sao_Paulo",
                    self.timezone
                );
                chrono_tz::America::Sao_Paulo
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttSettings {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    pub ca_cert_path: Option<String>,
    pub client_cert_path: Option<String>,
    pub client_key_path: Option<String>,
    /// e.g. "x-amzn-mqtt-ca" for AWS IoT on port 443.
    pub alpn: Option<String>,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "gate-central".to_string(),
            keep_alive_secs: 60,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
            alpn: None,
        }
    }
}

/// First-run bootstrap account, created only when the users table is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "adminpassword".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Token replenish interval for the login route, in seconds.
    pub login_replenish_secs: u64,
    /// Login burst size.
    pub login_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 5/minute, matching the original deployment
        Self {
            login_replenish_secs: 12,
            login_burst: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for profile images, also served statically.
    pub dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "./static/profile-images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Default config file location (`~/.config/gate-central/config.toml`).
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gate-central")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.access.timezone, "America/Sao_Paulo");
        assert_eq!(cfg.rate_limit.login_burst, 5);
        assert!(cfg.mqtt.ca_cert_path.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9999

            [mqtt]
            broker_host = "iot.example.com"
            broker_port = 443
            alpn = "x-amzn-mqtt-ca"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.mqtt.broker_host, "iot.example.com");
        assert_eq!(cfg.mqtt.alpn.as_deref(), Some("x-amzn-mqtt-ca"));
        assert_eq!(cfg.admin.username, "admin");
    }

    #[test]
    fn unknown_timezone_falls_back() {
        let access = AccessConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
        };
        assert_eq!(access.tz(), chrono_tz::America::Sao_Paulo);

        let access = AccessConfig {
            timezone: "UTC".to_string(),
        };
        assert_eq!(access.tz(), chrono_tz::UTC);
    }
}
