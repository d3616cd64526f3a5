//! Configuration management for the Progresando server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::engine::DEFAULT_WARNING_WINDOW_DAYS;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote Data Gateway (the inventory REST API)
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Bearer token sent with every gateway request
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Accepted bearer tokens; empty disables the check
    #[serde(default)]
    pub api_tokens: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaintenanceConfig {
    /// Days ahead of a due date that count as "due soon"
    pub warning_window_days: u32,
    pub alert_check_interval_secs: u64,
    pub alerts_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub smtp_from_name: Option<String>,
    pub smtp_use_tls: bool,
    /// Recipients of overdue maintenance alerts
    #[serde(default)]
    pub alert_recipients: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

impl AppConfig {
    /// `PROGRESANDO_` variables; `__` separates nested keys
    fn environment() -> Environment {
        Environment::with_prefix("PROGRESANDO")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("auth.api_tokens")
            .with_list_parse_key("email.alert_recipients")
            .try_parsing(true)
    }

    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. PROGRESANDO_GATEWAY__BASE_URL)
            .add_source(Self::environment())
            .set_override_option("gateway.base_url", env::var("GATEWAY_URL").ok())?
            .set_override_option("gateway.api_token", env::var("GATEWAY_TOKEN").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            api_token: None,
            timeout_secs: 15,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            warning_window_days: DEFAULT_WARNING_WINDOW_DAYS,
            alert_check_interval_secs: 3600,
            alerts_enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "noreply@ipsprogresando.com".to_string(),
            smtp_from_name: Some("IPS Progresando".to_string()),
            smtp_use_tls: true,
            alert_recipients: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            auth: AuthConfig::default(),
            maintenance: MaintenanceConfig::default(),
            logging: LoggingConfig::default(),
            email: EmailConfig::default(),
        }
    }
}
