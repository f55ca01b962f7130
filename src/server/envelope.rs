use crate::core::gateway::Endpoint;
use crate::utils::error::{CheckError, ErrorCategory};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

/// A failed call rendered as `{"status": "error", <field>: <message>}`,
/// where the field name follows the endpoint's convention.
#[derive(Debug)]
pub struct ApiError {
    endpoint: Endpoint,
    error: CheckError,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, error: CheckError) -> Self {
        Self { endpoint, error }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
    }

    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::from("error"));
        body.insert(
            self.endpoint.error_field().as_str().to_string(),
            Value::from(self.error.public_message()),
        );
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.error.category() {
            ErrorCategory::Configuration => {
                tracing::error!("❌ {} failed: {}", self.endpoint.path(), self.error)
            }
            ErrorCategory::UpstreamFault => {
                tracing::warn!("{} failed: {}", self.endpoint.path(), self.error)
            }
            _ => tracing::debug!("{} rejected: {}", self.endpoint.path(), self.error),
        }
        (status, Json(self.body())).into_response()
    }
}
