//! # Imaginify Clerk Plugin
//!
//! Client for the Clerk Backend API. The webhook dispatcher uses it to write
//! the local user id into a Clerk user's public metadata after the user has
//! been created in the database.
//!
//! ## Example
//!
//! ```rust,ignore
//! use imaginify_plugin_clerk::{ClerkClient, ClerkConfig};
//!
//! let clerk = ClerkClient::new(ClerkConfig::new("sk_test_..."))?;
//! clerk.update_public_metadata("user_2abc", json!({ "userId": "6651f0c2" })).await?;
//! ```

mod client;
mod config;

pub use client::ClerkClient;
pub use config::{ClerkConfig, DEFAULT_API_URL};
