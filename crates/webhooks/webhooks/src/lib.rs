//! # Imaginify Webhooks
//!
//! Inbound webhook handling for identity-provider user events:
//! - Svix-style HMAC signature verification
//! - Typed decoding of `user.created`, `user.updated` and `user.deleted`
//! - Dispatch to a [`UserRepository`](imaginify_core::UserRepository)
//! - Metadata write-back to the identity provider after create
//!
//! ## Example
//!
//! ```rust,ignore
//! use imaginify_webhooks::{EventDispatcher, WebhookHandler, WebhookReceiver};
//!
//! let receiver = WebhookReceiver::new(&secret)?;
//! let dispatcher = EventDispatcher::new(users).with_identity_provider(clerk);
//! let handler = WebhookHandler::new(Some(receiver), dispatcher);
//!
//! let response = handler.handle(request).await;
//! ```

mod dispatcher;
mod error;
mod event;
mod handler;
mod receiver;
mod signature;

pub use dispatcher::{DispatchOutcome, EventDispatcher, MetadataSync};
pub use error::{WebhookError, WebhookResult};
pub use event::{ClerkEvent, DeletedPayload, EmailAddress, UserPayload, WebhookEvent, event_types};
pub use handler::{WebhookHandler, error_response, outcome_response};
pub use receiver::{DEFAULT_TOLERANCE_SECS, WebhookHeaders, WebhookReceiver};
pub use signature::{SECRET_PREFIX, SignatureError, WebhookSigner};
