use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use courier_ratio::domain::model::{
    ConnectionStatus, CourierCheckResponse, PlanResponse, Validated,
};
use courier_ratio::server::{router, AppState};
use courier_ratio::{CheckError, CourierApi, GatewayConfig, PhoneNumber, UpstreamGateway};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Counts calls and always fails, so tests can prove no upstream call was made.
#[derive(Default)]
struct CountingApi {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CourierApi for CountingApi {
    async fn check_connection(&self) -> courier_ratio::Result<Validated<ConnectionStatus>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CheckError::ConfigError {
            message: "unexpected".to_string(),
        })
    }

    async fn my_plan(&self) -> courier_ratio::Result<Validated<PlanResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CheckError::ConfigError {
            message: "unexpected".to_string(),
        })
    }

    async fn courier_check(
        &self,
        _phone: &PhoneNumber,
    ) -> courier_ratio::Result<Validated<CourierCheckResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CheckError::ConfigError {
            message: "unexpected".to_string(),
        })
    }
}

fn app_for(base_url: String) -> Router {
    let gateway =
        UpstreamGateway::new(GatewayConfig::new(base_url, Some("test-key".to_string()))).unwrap();
    router(AppState::new(gateway))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_check(body: &str) -> Request<Body> {
    Request::post("/api/courier-check")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_invalid_phone_is_rejected_before_upstream() {
    let api = CountingApi::default();
    let calls = api.calls.clone();
    let app = router(AppState::new(api));

    let (status, body) = call(app, post_check(r#"{"phone":"abc"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "error": "Enter a valid BD number (11 digits, e.g. 01730285500 or +8801730285500)"
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_or_malformed_phone_is_invalid_input() {
    for body in [
        r#"{}"#,
        r#"{"phone": 1730285500}"#,
        "not json",
        r#"{"phone":"0123456789"}"#,
    ] {
        let api = CountingApi::default();
        let calls = api.calls.clone();
        let (status, _) = call(router(AppState::new(api)), post_check(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_courier_check_passthrough() {
    let server = MockServer::start_async().await;
    let upstream = json!({
        "status": "success",
        "data": {
            "pathao": {
                "name": "Pathao", "logo": "https://cdn.example/pathao.png",
                "total_parcel": 5, "success_parcel": 2,
                "cancelled_parcel": 3, "success_ratio": 40.0
            },
            "summary": {
                "total_parcel": 5, "success_parcel": 2,
                "cancelled_parcel": 3, "success_ratio": 40.0
            }
        },
        "reports": [{ "reason": "fake order" }]
    });
    let body = upstream.clone();
    let api_mock = server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/courier-check")
                .json_body(json!({ "phone": "01730285500" }));
            then.status(200).json_body(body);
        })
        .await;

    let (status, body) = call(
        app_for(server.base_url()),
        post_check(r#"{"phone":"+880 1730-285500"}"#),
    )
    .await;

    api_mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
}

#[tokio::test]
async fn test_courier_check_forwards_body_verbatim() {
    let server = MockServer::start_async().await;
    let upstream = json!({
        "status": "success",
        "data": {
            "pathao": {
                "name": "Pathao", "logo": "https://cdn.example/pathao.png",
                "total_parcel": 3, "success_parcel": 3,
                "cancelled_parcel": 0, "success_ratio": 100,
                "rating": "A"
            },
            "ecourier": {
                "name": "eCourier", "logo": "https://cdn.example/ecourier.png",
                "total_parcel": 1, "success_parcel": 0,
                "cancelled_parcel": 1, "success_ratio": 0
            },
            "summary": {
                "total_parcel": 4, "success_parcel": 3,
                "cancelled_parcel": 1, "success_ratio": 75
            }
        }
    });
    let body = upstream.clone();
    server
        .mock_async(move |when, then| {
            when.method(POST).path("/courier-check");
            then.status(200).json_body(body);
        })
        .await;

    let (status, body) = call(
        app_for(server.base_url()),
        post_check(r#"{"phone":"01730285500"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
    assert!(body.get("reports").is_none());
    assert!(body["data"]["summary"]["success_ratio"].is_u64());
}

#[tokio::test]
async fn test_upstream_unauthorized_maps_to_401() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/courier-check");
            then.status(401).json_body(json!({}));
        })
        .await;

    let (status, body) = call(
        app_for(server.base_url()),
        post_check(r#"{"phone":"01730285500"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "status": "error", "error": "Invalid API key" }));
}

#[tokio::test]
async fn test_upstream_not_found_maps_to_404() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/courier-check");
            then.status(200)
                .json_body(json!({ "status": "error", "error": "not found" }));
        })
        .await;

    let (status, body) = call(
        app_for(server.base_url()),
        post_check(r#"{"phone":"01730285500"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "error": "not found" }));
}

#[tokio::test]
async fn test_network_failure_maps_to_502() {
    let app = app_for("http://127.0.0.1:1".to_string());

    let (status, body) = call(app.clone(), post_check(r#"{"phone":"01730285500"}"#)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({ "status": "error", "error": "Service temporarily unavailable" })
    );

    let (status, body) = call(app, get("/api/check-connection")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Service temporarily unavailable" })
    );
}

#[tokio::test]
async fn test_check_connection_uses_message_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/check-connection");
            then.status(401).json_body(json!({ "status": "error" }));
        })
        .await;

    let (status, body) = call(app_for(server.base_url()), get("/api/check-connection")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "status": "error", "message": "Invalid API key" }));
}

#[tokio::test]
async fn test_my_plan_passthrough_and_errors() {
    let server = MockServer::start_async().await;
    let plan = json!({
        "status": "success",
        "data": {
            "remaining_paid_calls": 10,
            "remaining_free_calls": 0,
            "has_subscription": false
        }
    });
    let body = plan.clone();
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/my-plan");
            then.status(200).json_body(body);
        })
        .await;

    let (status, body) = call(app_for(server.base_url()), get("/api/my-plan")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, plan);

    let failing = MockServer::start_async().await;
    failing
        .mock_async(|when, then| {
            when.method(GET).path("/my-plan");
            then.status(500).json_body(json!({}));
        })
        .await;

    let (status, body) = call(app_for(failing.base_url()), get("/api/my-plan")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "status": "error", "error": "Request failed" }));
}
