//! Route mounting for the webhook endpoint.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use imaginify_core::router::RequestHandler;
use imaginify_webhooks::WebhookHandler;
use serde_json::json;

use crate::{to_axum_response, to_webhook_request};

/// Path of the identity-provider webhook endpoint.
pub const CLERK_WEBHOOK_PATH: &str = "/api/webhooks/clerk";

/// Path of the liveness check.
pub const HEALTH_PATH: &str = "/health";

/// Creates an Axum router serving the webhook endpoint and the health check.
///
/// # Example
///
/// ```rust,ignore
/// let app = webhook_routes(handler).layer(TraceLayer::new_for_http());
/// ```
pub fn webhook_routes<S>(handler: WebhookHandler) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(CLERK_WEBHOOK_PATH, post(clerk_webhook_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(WebhookState {
            handler: Arc::new(handler),
        })
}

/// Shared state for webhook routes.
#[derive(Clone)]
struct WebhookState {
    handler: Arc<WebhookHandler>,
}

async fn clerk_webhook_handler(
    State(state): State<WebhookState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(request) = to_webhook_request(&method, &uri, &headers, body) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };
    to_axum_response(state.handler.handle(request).await)
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "ok" }))
}
