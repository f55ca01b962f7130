use crate::core::gateway::Endpoint;
use crate::domain::phone::{PhoneNumber, INVALID_PHONE_MESSAGE};
use crate::domain::risk::RiskLevel;
use crate::server::envelope::ApiError;
use crate::server::AppState;
use crate::utils::error::CheckError;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

pub async fn check_connection(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let status = state
        .api
        .check_connection()
        .await
        .map_err(|e| ApiError::new(Endpoint::CheckConnection, e))?;
    tracing::debug!("Upstream connection status: {}", status.status);
    Ok(Json(status.into_raw()))
}

pub async fn my_plan(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let plan = state
        .api
        .my_plan()
        .await
        .map_err(|e| ApiError::new(Endpoint::MyPlan, e))?;
    if let Some(quota) = plan.plan() {
        tracing::debug!("Remaining upstream calls: {}", quota.remaining_calls());
    }
    Ok(Json(plan.into_raw()))
}

/// Validates the phone before anything leaves the process; an invalid
/// number never reaches the upstream. The success body goes back exactly
/// as the upstream sent it.
pub async fn courier_check(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let raw = phone_field(&body);
    let phone = PhoneNumber::normalize(&raw).ok_or_else(|| {
        ApiError::new(
            Endpoint::CourierCheck,
            CheckError::InvalidPhone {
                message: INVALID_PHONE_MESSAGE.to_string(),
            },
        )
    })?;

    let response = state
        .api
        .courier_check(&phone)
        .await
        .map_err(|e| ApiError::new(Endpoint::CourierCheck, e))?;

    let summary = &response.data.summary;
    let risk = RiskLevel::classify(summary);
    tracing::info!(
        phone = %phone,
        total_parcel = summary.total_parcel,
        success_ratio = summary.success_ratio,
        risk = risk.label(),
        "Courier check completed"
    );
    Ok(Json(response.into_raw()))
}

/// The `phone` string from a request body. Unparseable bodies and
/// non-string values count as empty input.
fn phone_field(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("phone").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default()
}
