pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::ServerConfig;

pub use crate::config::GatewayConfig;
pub use crate::core::{gateway::UpstreamGateway, report::CheckReport};
pub use crate::domain::phone::{normalize, preview, PhoneNumber};
pub use crate::domain::ports::CourierApi;
pub use crate::domain::risk::{classify, rank, RiskLevel};
pub use crate::utils::error::{CheckError, Result};
