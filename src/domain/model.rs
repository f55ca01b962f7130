use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// The fixed set of couriers reported by the upstream, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourierKey {
    Pathao,
    Steadfast,
    Redx,
    Parceldex,
    Paperfly,
    Carrybee,
}

impl CourierKey {
    pub const ALL: [CourierKey; 6] = [
        CourierKey::Pathao,
        CourierKey::Steadfast,
        CourierKey::Redx,
        CourierKey::Parceldex,
        CourierKey::Paperfly,
        CourierKey::Carrybee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CourierKey::Pathao => "pathao",
            CourierKey::Steadfast => "steadfast",
            CourierKey::Redx => "redx",
            CourierKey::Parceldex => "parceldex",
            CourierKey::Paperfly => "paperfly",
            CourierKey::Carrybee => "carrybee",
        }
    }
}

impl fmt::Display for CourierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery counters for one courier.
///
/// `success_ratio` is the upstream's own figure (0-100) and is never
/// recomputed from the parcel counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierStat {
    pub name: String,
    /// Opaque image reference for the presentation layer.
    pub logo: String,
    pub total_parcel: u64,
    pub success_parcel: u64,
    pub cancelled_parcel: u64,
    pub success_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    pub total_parcel: u64,
    pub success_parcel: u64,
    pub cancelled_parcel: u64,
    pub success_ratio: f64,
}

/// Payload of a successful courier check. A courier missing from the
/// upstream body is simply absent, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierCheckData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathao: Option<CourierStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steadfast: Option<CourierStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redx: Option<CourierStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parceldex: Option<CourierStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paperfly: Option<CourierStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrybee: Option<CourierStat>,
    pub summary: SummaryStat,
}

impl CourierCheckData {
    pub fn get(&self, key: CourierKey) -> Option<&CourierStat> {
        match key {
            CourierKey::Pathao => self.pathao.as_ref(),
            CourierKey::Steadfast => self.steadfast.as_ref(),
            CourierKey::Redx => self.redx.as_ref(),
            CourierKey::Parceldex => self.parceldex.as_ref(),
            CourierKey::Paperfly => self.paperfly.as_ref(),
            CourierKey::Carrybee => self.carrybee.as_ref(),
        }
    }

    /// Present couriers in enumeration order.
    pub fn couriers(&self) -> impl Iterator<Item = (CourierKey, &CourierStat)> + '_ {
        CourierKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|stat| (key, stat)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierCheckResponse {
    pub status: String,
    pub data: CourierCheckData,
    #[serde(default)]
    pub reports: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remaining quota on the upstream account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_paid_calls: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_free_calls: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_subscription: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanStatus {
    pub fn remaining_calls(&self) -> u64 {
        self.remaining_paid_calls
            .unwrap_or(0)
            .saturating_add(self.remaining_free_calls.unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PlanStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanResponse {
    /// Quota is only meaningful when the upstream reported success.
    pub fn plan(&self) -> Option<&PlanStatus> {
        if self.status == "success" {
            self.data.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// A success body that decoded into `T`, kept next to the JSON it was
/// decoded from. Callers read the typed side; the proxy forwards `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    model: T,
    raw: Value,
}

impl<T> Validated<T> {
    pub fn new(model: T, raw: Value) -> Self {
        Self { model, raw }
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.model
    }
}
