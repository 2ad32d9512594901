//! Request boundary for inbound identity-provider webhooks.

use std::sync::Arc;

use async_trait::async_trait;
use imaginify_core::router::{Request, RequestHandler, Response};
use serde_json::json;

use crate::dispatcher::{DispatchOutcome, EventDispatcher};
use crate::error::{WebhookError, WebhookResult};
use crate::event::ClerkEvent;
use crate::receiver::{WebhookHeaders, WebhookReceiver};

/// Handler for `POST /api/webhooks/clerk`.
///
/// Runs header extraction, signature verification, decoding and dispatch in
/// order, and turns every outcome or error into a response. Nothing escapes.
#[derive(Clone)]
pub struct WebhookHandler {
    receiver: Option<Arc<WebhookReceiver>>,
    dispatcher: EventDispatcher,
}

impl WebhookHandler {
    /// Creates a handler. A `None` receiver means the secret is not
    /// configured and every request is answered with 500.
    pub fn new(receiver: Option<WebhookReceiver>, dispatcher: EventDispatcher) -> Self {
        Self {
            receiver: receiver.map(Arc::new),
            dispatcher,
        }
    }

    /// Returns true when a webhook secret is configured.
    pub fn is_configured(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Verifies, decodes and dispatches one request.
    pub async fn process(&self, req: &Request) -> WebhookResult<DispatchOutcome> {
        let receiver = self
            .receiver
            .as_ref()
            .ok_or_else(|| WebhookError::ConfigError("WEBHOOK_SECRET is not set".into()))?;

        let headers = WebhookHeaders::extract(|name| req.header(name).map(String::as_str))?;
        let envelope = receiver.verify(&headers, &req.body)?;
        tracing::debug!(msg_id = %headers.id, event_type = %envelope.event_type, "Verified webhook");

        let event = ClerkEvent::decode(envelope)?;
        self.dispatcher.dispatch(event).await
    }
}

#[async_trait]
impl RequestHandler for WebhookHandler {
    async fn handle(&self, req: Request) -> Response {
        match self.process(&req).await {
            Ok(outcome) => outcome_response(outcome),
            Err(e) => error_response(&e),
        }
    }
}

/// Builds the response for a dispatch outcome.
pub fn outcome_response(outcome: DispatchOutcome) -> Response {
    match outcome {
        DispatchOutcome::Created { user, metadata } => Response::ok().json(json!({
            "message": "User created successfully",
            "user": user,
            "metadata": metadata,
        })),
        DispatchOutcome::Updated { user } => Response::ok().json(json!({
            "message": "User updated successfully",
            "user": user,
        })),
        DispatchOutcome::Deleted { user } => Response::ok().json(json!({
            "message": "User deleted successfully",
            "user": user,
        })),
        DispatchOutcome::Unhandled { event_type } => {
            error_response(&WebhookError::UnhandledEventType(event_type))
        }
    }
}

/// Builds the response for an error, logging it at a level matching its status.
pub fn error_response(err: &WebhookError) -> Response {
    let status = err.status_code();
    match err {
        WebhookError::UnhandledEventType(_) => {}
        WebhookError::MissingHeader(_) | WebhookError::InvalidSignature | WebhookError::ExpiredSignature => {
            tracing::warn!(error = %err, "Rejected webhook");
        }
        _ if status >= 500 => tracing::error!(error = %err, "Error processing webhook"),
        _ => tracing::warn!(error = %err, "Invalid webhook payload"),
    }
    Response::error(status, err.public_message())
}
