pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_secret, validate_required_field, validate_socket_addr, validate_url,
    Validate,
};
use secrecy::{ExposeSecret, SecretString};
use std::net::SocketAddr;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.bdcourier.com";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const API_KEY_ENV: &str = "BDCOURIER_API_KEY";

/// Everything the upstream gateway needs. The key is read once here and
/// never again.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.map(SecretString::from),
        }
    }

    /// Reads `BDCOURIER_API_KEY` from the process environment against the
    /// default upstream address.
    pub fn from_env() -> Self {
        Self::new(DEFAULT_BASE_URL, std::env::var(API_KEY_ENV).ok())
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        let key = validate_required_field(API_KEY_ENV, &self.api_key)?;
        validate_non_empty_secret(API_KEY_ENV, key.expose_secret())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "courier-ratio")]
#[command(about = "Courier delivery-ratio proxy for Bangladeshi mobile numbers")]
pub struct ServerConfig {
    /// Optional TOML file; CLI flags and environment variables take precedence
    #[arg(short, long, env = "COURIER_RATIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Upstream base address
    #[arg(long, env = "BDCOURIER_BASE_URL")]
    pub base_url: Option<String>,

    /// Upstream bearer credential
    #[arg(long, env = "BDCOURIER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Emit JSON logs
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ServerConfig {
    /// Fills every unset value from the TOML file named by `--config`, if any.
    /// File entries already given by a flag or the environment are never
    /// looked at, so a stale `${VAR}` in the file cannot block startup.
    pub fn load_file(mut self) -> Result<Self> {
        if let Some(path) = &self.config {
            let mut file = TomlConfig::from_file(path)?;
            self.shadow(&mut file);
            file.validate()?;
            self.apply_file(&file);
        }
        Ok(self)
    }

    fn shadow(&self, file: &mut TomlConfig) {
        if let Some(server) = file.server.as_mut() {
            if self.bind_address.is_some() {
                server.bind_address = None;
            }
        }
        if let Some(upstream) = file.upstream.as_mut() {
            if self.base_url.is_some() {
                upstream.base_url = None;
            }
            if self.api_key.is_some() {
                upstream.api_key = None;
            }
        }
    }

    pub fn apply_file(&mut self, file: &TomlConfig) {
        if let Some(server) = &file.server {
            if self.bind_address.is_none() {
                self.bind_address = server.bind_address.clone();
            }
            self.json_logs = self.json_logs || server.json_logs.unwrap_or(false);
        }
        if let Some(upstream) = &file.upstream {
            if self.base_url.is_none() {
                self.base_url = upstream.base_url.clone();
            }
            if self.api_key.is_none() {
                self.api_key = upstream.api_key.clone();
            }
        }
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        validate_socket_addr(
            "bind_address",
            self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS),
        )
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.api_key.clone(),
        )
    }
}

#[cfg(feature = "cli")]
impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        self.bind_address()?;
        self.gateway_config().validate()
    }
}
