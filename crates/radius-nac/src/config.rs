use crate::exchange::{ClientConfig, DEFAULT_EXCHANGE_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Client and listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RADIUS/CoA servers as `host:port`, tried in order
    #[serde(default)]
    pub servers: Vec<String>,

    /// Shared secret
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Deadline for one exchange, in seconds (default: 5). Sends are also
    /// bounded by [`DEFAULT_EXCHANGE_TIMEOUT`], so values above it are rejected.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Resend interval within one exchange, in milliseconds (default: 0, no resend)
    #[serde(default)]
    pub retry_interval_ms: u64,

    /// Invalid replies tolerated before an exchange fails (default: 10, 0 = unlimited)
    #[serde(default = "default_max_packet_errors")]
    pub max_packet_errors: u32,

    /// Listener address
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Listener port
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error" (default: "info")
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_secret() -> String {
    "testing123".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_packet_errors() -> u32 {
    10
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    3799 // RFC 5176 dynamic authorization port
}

impl Default for Config {
    fn default() -> Self {
        Config {
            servers: vec![],
            secret: default_secret(),
            timeout_secs: default_timeout_secs(),
            retry_interval_ms: 0,
            max_packet_errors: default_max_packet_errors(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Exchange settings for [`crate::UdpExchanger`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.max_packet_errors,
            Duration::from_millis(self.retry_interval_ms),
        )
        .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Listener settings for [`crate::server::listen`]
    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings::new(
            self.listen_address.clone(),
            self.listen_port,
            self.secret.clone(),
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _: IpAddr = self.listen_address.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid listen address: {}", self.listen_address))
        })?;

        if self.secret.is_empty() {
            return Err(ConfigError::Invalid("Secret cannot be empty".to_string()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("Timeout cannot be 0".to_string()));
        }

        if self.timeout_secs > DEFAULT_EXCHANGE_TIMEOUT.as_secs() {
            return Err(ConfigError::Invalid(format!(
                "Timeout cannot exceed {} seconds",
                DEFAULT_EXCHANGE_TIMEOUT.as_secs()
            )));
        }

        for server in &self.servers {
            let valid = server
                .rsplit_once(':')
                .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
            if !valid {
                return Err(ConfigError::Invalid(format!(
                    "Server address must be host:port: {server}"
                )));
            }
        }

        Ok(())
    }

    /// Create an example configuration file
    pub fn example() -> Self {
        Config {
            servers: vec!["192.168.1.10:3799".to_string(), "192.168.1.11:3799".to_string()],
            secret: "testing123".to_string(),
            timeout_secs: 5,
            retry_interval_ms: 1000,
            max_packet_errors: 10,
            listen_address: "0.0.0.0".to_string(),
            listen_port: 3799,
            log_level: Some("info".to_string()),
        }
    }
}

/// Where a packet listener binds and which secret it uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub secret: String,
}

impl ServerSettings {
    pub fn new(host: impl Into<String>, port: u16, secret: impl Into<String>) -> Self {
        ServerSettings {
            host: host.into(),
            port,
            secret: secret.into(),
        }
    }

    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
