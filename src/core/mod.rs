pub mod gateway;
pub mod report;

pub use crate::domain::model::{CourierCheckResponse, PlanResponse};
pub use crate::domain::ports::CourierApi;
pub use crate::utils::error::Result;
