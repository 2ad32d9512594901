//! # Imaginify MongoDB Adapter
//!
//! Document-database backend for user sync: a [`MongoConnector`] that opens the
//! database handle, and a [`MongoUserRepository`] that runs every operation
//! through a shared [`ConnectionManager`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use imaginify_adapter_mongodb::{MongoConnector, MongoUserRepository};
//!
//! let manager = Arc::new(ConnectionManager::new(MongoConnector::from_env()));
//! let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(manager));
//! ```

mod connector;
mod document;
mod repository;

pub use connector::{DEFAULT_DATABASE_NAME, MongoConnector};
pub use repository::{MongoUserRepository, USERS_COLLECTION};

/// The connection manager type used by this adapter.
pub type MongoConnectionManager = imaginify_core::ConnectionManager<MongoConnector>;
