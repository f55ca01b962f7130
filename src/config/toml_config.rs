use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{validate_socket_addr, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder pattern"));

/// On-disk settings. Every section is optional so a file may carry only
/// the upstream block, for example.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub upstream: Option<UpstreamSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind_address: Option<String>,
    pub json_logs: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamSection {
    pub base_url: Option<String>,
    /// Usually written as `"${BDCOURIER_API_KEY}"` rather than inline.
    pub api_key: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(addr) = self.server.as_ref().and_then(|s| s.bind_address.as_deref()) {
            validate_socket_addr("server.bind_address", addr)?;
        }
        if let Some(url) = self.upstream.as_ref().and_then(|u| u.base_url.as_deref()) {
            validate_url("upstream.base_url", url)?;
        }
        if let Some(key) = self.upstream.as_ref().and_then(|u| u.api_key.as_deref()) {
            if ENV_PLACEHOLDER.is_match(key) {
                return Err(CheckError::ConfigError {
                    message: format!("upstream.api_key references an unset variable: {}", key),
                });
            }
        }
        Ok(())
    }
}
