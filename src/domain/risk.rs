use crate::domain::model::{CourierCheckData, CourierKey, CourierStat, SummaryStat};
use serde::Serialize;

pub const LOW_RISK_RATIO: f64 = 80.0;
pub const MEDIUM_RISK_RATIO: f64 = 50.0;

/// Anything carrying parcel history that can be tiered.
pub trait DeliveryCounters {
    fn total_parcel(&self) -> u64;
    fn success_ratio(&self) -> f64;
}

impl DeliveryCounters for SummaryStat {
    fn total_parcel(&self) -> u64 {
        self.total_parcel
    }

    fn success_ratio(&self) -> f64 {
        self.success_ratio
    }
}

impl DeliveryCounters for CourierStat {
    fn total_parcel(&self) -> u64 {
        self.total_parcel
    }

    fn success_ratio(&self) -> f64 {
        self.success_ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// No history wins over every ratio band; bands are inclusive at
    /// their lower bound.
    pub fn classify<C: DeliveryCounters + ?Sized>(counters: &C) -> Self {
        if counters.total_parcel() == 0 {
            RiskLevel::Unknown
        } else if counters.success_ratio() >= LOW_RISK_RATIO {
            RiskLevel::Low
        } else if counters.success_ratio() >= MEDIUM_RISK_RATIO {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Unknown => "No History",
            RiskLevel::Low => "Trusted",
            RiskLevel::Medium => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            RiskLevel::Unknown => "❓",
            RiskLevel::Low => "✅",
            RiskLevel::Medium => "⚠️",
            RiskLevel::High => "🚫",
        }
    }
}

pub fn classify(summary: &SummaryStat) -> RiskLevel {
    RiskLevel::classify(summary)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCourier {
    pub key: CourierKey,
    pub risk: RiskLevel,
    #[serde(flatten)]
    pub stat: CourierStat,
}

/// Present couriers by parcel volume, busiest first. Ties keep the fixed
/// courier enumeration order.
pub fn rank(data: &CourierCheckData) -> Vec<RankedCourier> {
    let mut ranked: Vec<RankedCourier> = data
        .couriers()
        .map(|(key, stat)| RankedCourier {
            key,
            risk: RiskLevel::classify(stat),
            stat: stat.clone(),
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.stat.total_parcel.cmp(&a.stat.total_parcel));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: u64, ratio: f64) -> SummaryStat {
        SummaryStat {
            total_parcel: total,
            success_parcel: 0,
            cancelled_parcel: 0,
            success_ratio: ratio,
        }
    }

    fn stat(name: &str, total: u64) -> CourierStat {
        CourierStat {
            name: name.to_string(),
            logo: String::new(),
            total_parcel: total,
            success_parcel: total,
            cancelled_parcel: 0,
            success_ratio: if total == 0 { 0.0 } else { 100.0 },
        }
    }

    fn snapshot(totals: [u64; 6]) -> CourierCheckData {
        CourierCheckData {
            pathao: Some(stat("Pathao", totals[0])),
            steadfast: Some(stat("Steadfast", totals[1])),
            redx: Some(stat("RedX", totals[2])),
            parceldex: Some(stat("Parceldex", totals[3])),
            paperfly: Some(stat("Paperfly", totals[4])),
            carrybee: Some(stat("CarryBee", totals[5])),
            summary: summary(totals.iter().sum(), 100.0),
        }
    }

    #[test]
    fn test_no_history_beats_ratio() {
        assert_eq!(classify(&summary(0, 100.0)), RiskLevel::Unknown);
        assert_eq!(classify(&summary(0, 0.0)), RiskLevel::Unknown);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify(&summary(10, 80.0)), RiskLevel::Low);
        assert_eq!(classify(&summary(10, 100.0)), RiskLevel::Low);
        assert_eq!(classify(&summary(10, 79.9)), RiskLevel::Medium);
        assert_eq!(classify(&summary(10, 50.0)), RiskLevel::Medium);
        assert_eq!(classify(&summary(10, 49.9)), RiskLevel::High);
        assert_eq!(classify(&summary(10, 0.0)), RiskLevel::High);
    }

    #[test]
    fn test_ratio_is_not_recomputed() {
        // Counts say 10%, upstream says 90%: upstream wins.
        let s = SummaryStat {
            total_parcel: 10,
            success_parcel: 1,
            cancelled_parcel: 9,
            success_ratio: 90.0,
        };
        assert_eq!(classify(&s), RiskLevel::Low);
    }

    #[test]
    fn test_labels() {
        assert_eq!(RiskLevel::Unknown.label(), "No History");
        assert_eq!(RiskLevel::High.label(), "High Risk");
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"medium\"");
    }

    #[test]
    fn test_rank_orders_by_volume() {
        let ranked = rank(&snapshot([1, 9, 0, 4, 2, 7]));
        let keys: Vec<CourierKey> = ranked.iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                CourierKey::Steadfast,
                CourierKey::Carrybee,
                CourierKey::Parceldex,
                CourierKey::Paperfly,
                CourierKey::Pathao,
                CourierKey::Redx,
            ]
        );
        assert_eq!(ranked.last().map(|r| r.risk), Some(RiskLevel::Unknown));
    }

    #[test]
    fn test_rank_ties_keep_enumeration_order() {
        let data = snapshot([5, 5, 5, 5, 5, 5]);
        let keys: Vec<CourierKey> = rank(&data).iter().map(|r| r.key).collect();
        assert_eq!(keys, CourierKey::ALL.to_vec());
        assert_eq!(rank(&data), rank(&data));
    }

    #[test]
    fn test_rank_skips_absent_couriers() {
        let mut data = snapshot([3, 0, 3, 0, 0, 8]);
        data.steadfast = None;
        data.paperfly = None;
        let keys: Vec<CourierKey> = rank(&data).iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                CourierKey::Carrybee,
                CourierKey::Pathao,
                CourierKey::Redx,
                CourierKey::Parceldex,
            ]
        );
    }
}
