use crate::domain::model::{ConnectionStatus, CourierCheckResponse, PlanResponse, Validated};
use crate::domain::phone::PhoneNumber;
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three upstream operations. Each call is a single attempt; every
/// failure arrives already mapped to a [`crate::utils::error::CheckError`].
#[async_trait]
pub trait CourierApi: Send + Sync {
    async fn check_connection(&self) -> Result<Validated<ConnectionStatus>>;
    async fn my_plan(&self) -> Result<Validated<PlanResponse>>;
    async fn courier_check(&self, phone: &PhoneNumber) -> Result<Validated<CourierCheckResponse>>;
}
