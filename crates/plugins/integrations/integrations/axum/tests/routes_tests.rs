use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use imaginify_adapter_memory::MemoryAdapter;
use imaginify_axum::webhook_routes;
use imaginify_webhooks::{EventDispatcher, WebhookHandler, WebhookReceiver, WebhookSigner};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";

fn app(adapter: &MemoryAdapter, secret: Option<&str>) -> Router {
    let receiver = secret.map(|s| WebhookReceiver::new(s).unwrap());
    let dispatcher = EventDispatcher::new(Arc::new(adapter.clone()));
    webhook_routes(WebhookHandler::new(receiver, dispatcher))
}

fn signed(body: &Value) -> Request<Body> {
    let payload = serde_json::to_vec(body).unwrap();
    let ts = chrono::Utc::now().timestamp();
    let signature = WebhookSigner::new(SECRET).unwrap().sign("msg_1", ts, &payload);

    Request::builder()
        .method("POST")
        .uri("/api/webhooks/clerk")
        .header("content-type", "application/json")
        .header("svix-id", "msg_1")
        .header("svix-timestamp", ts.to_string())
        .header("svix-signature", signature)
        .body(Body::from(payload))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(&MemoryAdapter::new(), None)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_signed_create_round_trip() {
    let adapter = MemoryAdapter::new();
    let event = json!({
        "type": "user.created",
        "data": {
            "id": "user_9",
            "email_addresses": [{ "email_address": "grace@example.com" }],
            "username": "grace"
        }
    });

    let response = app(&adapter, Some(SECRET)).oneshot(signed(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["user"]["email"], "grace@example.com");
    assert_eq!(adapter.user_count().await, 1);
}

#[tokio::test]
async fn test_unsigned_request_rejected() {
    let adapter = MemoryAdapter::new();
    let request = Request::post("/api/webhooks/clerk")
        .body(Body::from(r#"{"type":"user.deleted","data":{"id":"user_9"}}"#))
        .unwrap();

    let response = app(&adapter, Some(SECRET)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "Missing required webhook headers", "code": 400 })
    );
}

#[tokio::test]
async fn test_unconfigured_secret() {
    let response = app(&MemoryAdapter::new(), None)
        .oneshot(signed(&json!({ "type": "user.deleted", "data": { "id": "user_9" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["error"], "Server configuration error");
}

#[tokio::test]
async fn test_wrong_method() {
    let response = app(&MemoryAdapter::new(), Some(SECRET))
        .oneshot(Request::get("/api/webhooks/clerk").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
