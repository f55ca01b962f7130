use thiserror::Error;

pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API key";
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from courier service";

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Invalid phone number: {message}")]
    InvalidPhone { message: String },

    #[error("Upstream responded with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream reported lookup failure ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any network call.
    InvalidInput,
    UpstreamAuth,
    /// Upstream answered OK but flagged the lookup itself as failed.
    UpstreamLogical,
    UpstreamFault,
    Configuration,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::InvalidPhone { .. } => ErrorCategory::InvalidInput,
            CheckError::Upstream { status: 401, .. } => ErrorCategory::UpstreamAuth,
            CheckError::Rejected { .. } => ErrorCategory::UpstreamLogical,
            CheckError::Upstream { .. } | CheckError::Network(_) | CheckError::Decode(_) => {
                ErrorCategory::UpstreamFault
            }
            CheckError::IoError(_)
            | CheckError::TomlError(_)
            | CheckError::ConfigError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// HTTP status reported to callers. Never in the success range.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::InvalidPhone { .. } => 400,
            CheckError::Upstream { status, .. } | CheckError::Rejected { status, .. } => {
                escalate_status(*status)
            }
            CheckError::Network(_) | CheckError::Decode(_) => 502,
            _ => 500,
        }
    }

    /// Message safe to hand to the presentation layer. Transport and
    /// configuration details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            CheckError::InvalidPhone { message }
            | CheckError::Upstream { message, .. }
            | CheckError::Rejected { message, .. } => message.clone(),
            CheckError::Network(_) => UNAVAILABLE_MESSAGE.to_string(),
            CheckError::Decode(_) => INVALID_RESPONSE_MESSAGE.to_string(),
            _ => "Server misconfigured".to_string(),
        }
    }
}

/// Failure statuses below 400 are reported as 502.
pub fn escalate_status(status: u16) -> u16 {
    if status >= 400 {
        status
    } else {
        502
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
