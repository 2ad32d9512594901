//! # Imaginify Axum Integration
//!
//! Mounts the webhook handler on an Axum router and converts between Axum's
//! request/response types and the framework-agnostic ones in
//! `imaginify_core::router`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imaginify_axum::webhook_routes;
//!
//! let app = webhook_routes(handler);
//! axum::serve(listener, app).await?;
//! ```

mod routes;

pub use routes::{CLERK_WEBHOOK_PATH, HEALTH_PATH, webhook_routes};

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use imaginify_core::router::{Method, Request, Response as SyncResponse};

/// Converts Axum request parts into a webhook request.
///
/// Header values that are not valid UTF-8 are dropped; the body is kept as the
/// exact bytes received. Returns `None` for methods with no [`Method`]
/// counterpart.
pub fn to_webhook_request(
    method: &axum::http::Method,
    uri: &axum::http::Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> Option<Request> {
    let method = match *method {
        axum::http::Method::GET => Method::GET,
        axum::http::Method::POST => Method::POST,
        axum::http::Method::PUT => Method::PUT,
        axum::http::Method::PATCH => Method::PATCH,
        axum::http::Method::DELETE => Method::DELETE,
        _ => return None,
    };

    let mut request = Request::new(method, uri.path()).with_body(body.to_vec());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    Some(request)
}

/// Converts a handler response to an Axum response.
pub fn to_axum_response(sync_response: SyncResponse) -> Response {
    let status =
        StatusCode::from_u16(sync_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = match sync_response.body {
        Some(body) => axum::Json(body).into_response(),
        None => status.into_response(),
    };

    *response.status_mut() = status;

    for (key, value) in sync_response.headers {
        if let (Ok(name), Ok(val)) = (
            axum::http::header::HeaderName::try_from(key),
            axum::http::header::HeaderValue::try_from(value),
        ) {
            response.headers_mut().insert(name, val);
        }
    }

    response
}
