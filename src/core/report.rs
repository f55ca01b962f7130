use crate::domain::model::{CourierCheckResponse, SummaryStat};
use crate::domain::phone::PhoneNumber;
use crate::domain::risk::{rank, RankedCourier, RiskLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Aggregated view of one courier check: the overall tier plus every
/// courier ranked by volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub phone: PhoneNumber,
    pub summary: SummaryStat,
    pub risk: RiskLevel,
    pub couriers: Vec<RankedCourier>,
    pub reports_count: usize,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn build(phone: PhoneNumber, response: &CourierCheckResponse) -> Self {
        Self::build_at(phone, response, Utc::now())
    }

    pub fn build_at(
        phone: PhoneNumber,
        response: &CourierCheckResponse,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let summary = response.data.summary.clone();
        Self {
            phone,
            risk: RiskLevel::classify(&summary),
            couriers: rank(&response.data),
            summary,
            reports_count: response.reports.len(),
            checked_at,
        }
    }

    /// Couriers that actually handled parcels for this number.
    pub fn active_couriers(&self) -> impl Iterator<Item = &RankedCourier> {
        self.couriers.iter().filter(|c| c.stat.total_parcel > 0)
    }
}
