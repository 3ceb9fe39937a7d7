//! Configuration for the gateway.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// WhatsApp automation bridge configuration
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size, media uploads included
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Automation bridge base URL
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Poll interval for session events
    #[serde(default = "default_event_poll_interval", with = "humantime_serde")]
    pub event_poll_interval: Duration,

    /// Timeout for each bridge call
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Send requests per minute across all callers (0 disables limiting)
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl ServerConfig {
    /// Address to bind the HTTP server to.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen_addr))?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            event_poll_interval: default_event_poll_interval(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: default_per_minute(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    crate::api::DEFAULT_MAX_BODY_BYTES
}

fn default_bridge_url() -> String {
    "http://whatsapp-bridge:8080".into()
}

fn default_event_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_per_minute() -> u32 {
    0
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.listen_addr, "0.0.0.0");
        assert_eq!(config.server.max_body_bytes, 64 * 1024 * 1024);
        assert_eq!(config.whatsapp.event_poll_interval, Duration::from_secs(1));
        assert_eq!(config.rate_limit.per_minute, 0);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(
            server.socket_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );

        let server = ServerConfig {
            listen_addr: "localhost".into(),
            ..ServerConfig::default()
        };
        let err = server.socket_addr().unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }

    #[test]
    fn test_humantime_durations() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "whatsapp": {
                "bridge_url": "http://localhost:9000",
                "event_poll_interval": "250ms",
                "request_timeout": "2m"
            }
        }))
        .unwrap();

        assert_eq!(config.whatsapp.bridge_url, "http://localhost:9000");
        assert_eq!(
            config.whatsapp.event_poll_interval,
            Duration::from_millis(250)
        );
        assert_eq!(config.whatsapp.request_timeout, Duration::from_secs(120));
    }
}
