use crate::config::{GatewayConfig, API_KEY_ENV};
use crate::domain::model::{ConnectionStatus, CourierCheckResponse, PlanResponse, Validated};
use crate::domain::phone::PhoneNumber;
use crate::domain::ports::CourierApi;
use crate::utils::error::{CheckError, Result, INVALID_API_KEY_MESSAGE};
use crate::utils::validation::{validate_required_field, Validate};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// The upstream operations and their per-endpoint conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CheckConnection,
    MyPlan,
    CourierCheck,
}

/// Name of the JSON field carrying the message in an error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    Error,
    Message,
}

impl ErrorField {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorField::Error => "error",
            ErrorField::Message => "message",
        }
    }
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CheckConnection => "check-connection",
            Endpoint::MyPlan => "my-plan",
            Endpoint::CourierCheck => "courier-check",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::CourierCheck => Method::POST,
            Endpoint::CheckConnection | Endpoint::MyPlan => Method::GET,
        }
    }

    pub fn error_field(self) -> ErrorField {
        match self {
            Endpoint::CheckConnection => ErrorField::Message,
            Endpoint::MyPlan | Endpoint::CourierCheck => ErrorField::Error,
        }
    }

    /// Message used when a failed response carries no `error` text.
    pub fn fallback_message(self, status: StatusCode) -> &'static str {
        if status == StatusCode::UNAUTHORIZED {
            return INVALID_API_KEY_MESSAGE;
        }
        match self {
            Endpoint::CheckConnection => "Connection failed",
            Endpoint::MyPlan | Endpoint::CourierCheck => "Request failed",
        }
    }
}

#[derive(Debug, Serialize)]
struct CourierCheckRequest<'a> {
    phone: &'a str,
}

/// Authenticated client for the courier-history API.
///
/// The bearer key is injected once at construction; a gateway cannot be
/// built without one, so no request is ever sent unauthenticated.
#[derive(Debug, Clone)]
pub struct UpstreamGateway {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl UpstreamGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: GatewayConfig, client: Client) -> Result<Self> {
        config.validate()?;
        let api_key = validate_required_field(API_KEY_ENV, &config.api_key)?.clone();

        let mut base_url =
            Url::parse(&config.base_url).map_err(|e| CheckError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        tracing::debug!("Upstream gateway configured for {}", base_url);
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        self.base_url
            .join(endpoint.path())
            .map_err(|e| CheckError::ConfigError {
                message: format!("Cannot build URL for {}: {}", endpoint.path(), e),
            })
    }

    /// One round trip. Non-OK statuses come back as `CheckError::Upstream`
    /// with the body's `error` text or the endpoint fallback.
    async fn send<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<(StatusCode, Value)> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!("Making API request: {} {}", endpoint.method(), url);

        let mut request = self
            .client
            .request(endpoint.method(), url)
            .bearer_auth(self.api_key.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Upstream {} unreachable: {}", endpoint.path(), e);
            CheckError::Network(e)
        })?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!("Upstream {} body read failed: {}", endpoint.path(), e);
            CheckError::Network(e)
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .as_ref()
                .and_then(error_text)
                .unwrap_or_else(|| endpoint.fallback_message(status).to_string());
            tracing::warn!(
                "Upstream {} failed with status {}: {}",
                endpoint.path(),
                status,
                message
            );
            return Err(CheckError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!("Upstream {} returned non-JSON body: {}", endpoint.path(), e);
            CheckError::Decode(e)
        })?;
        Ok((status, value))
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Validated<T>> {
        let (_, value) = self.send::<()>(endpoint, None).await?;
        decode(endpoint, value)
    }
}

/// Non-empty string under `error`, if the body has one.
fn error_text(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Checks the body against `T` without consuming it; the JSON itself is
/// what gets forwarded.
fn decode<T: DeserializeOwned>(endpoint: Endpoint, value: Value) -> Result<Validated<T>> {
    match T::deserialize(&value) {
        Ok(model) => Ok(Validated::new(model, value)),
        Err(e) => {
            tracing::warn!("Upstream {} body does not match schema: {}", endpoint.path(), e);
            Err(CheckError::Decode(e))
        }
    }
}

/// An OK response whose body says `"status": "error"` is a failed lookup:
/// 404 when the subject was not found, 400 otherwise.
pub fn logical_failure(status: StatusCode, body: &Value) -> Option<CheckError> {
    if body.get("status").and_then(Value::as_str) != Some("error") {
        return None;
    }

    let message = error_text(body).unwrap_or_else(|| "Unknown error".to_string());
    let not_found =
        status == StatusCode::NOT_FOUND || message.to_lowercase().contains("not found");

    Some(CheckError::Rejected {
        status: if not_found { 404 } else { 400 },
        message,
    })
}

#[async_trait]
impl CourierApi for UpstreamGateway {
    async fn check_connection(&self) -> Result<Validated<ConnectionStatus>> {
        self.fetch(Endpoint::CheckConnection).await
    }

    async fn my_plan(&self) -> Result<Validated<PlanResponse>> {
        self.fetch(Endpoint::MyPlan).await
    }

    async fn courier_check(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Validated<CourierCheckResponse>> {
        let body = CourierCheckRequest {
            phone: phone.as_str(),
        };
        let (status, value) = self.send(Endpoint::CourierCheck, Some(&body)).await?;

        if let Some(err) = logical_failure(status, &value) {
            tracing::info!("Courier check for {} rejected: {}", phone, err);
            return Err(err);
        }

        decode(Endpoint::CourierCheck, value)
    }
}
