//! # Imaginify Core
//!
//! This crate provides the foundational types and traits for syncing identity
//! provider users into the Imaginify database. It defines the user record
//! (`UserRecord`) and its create/update shapes, the error type, the
//! repository and identity-provider traits that adapters implement, and the
//! shared connection manager.

pub mod connection;
pub mod error;
pub mod router;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use connection::ConnectionManager;
pub use error::{SyncError, SyncResult};
pub use traits::{Connector, IdentityProvider, UserRepository};
pub use types::{NewUser, UserRecord, UserUpdate};

// Re-export router types
pub use router::{Method, Request, RequestHandler, Response};
