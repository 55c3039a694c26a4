//! Typed client for the MAIA memory API.
//!
//! Two facades share one validation, request-building and response
//! classification path:
//!
//! - [`Client`]: async, for use inside a tokio runtime.
//! - [`blocking::Client`]: blocks the calling thread (feature `blocking`, on by default).
//!
//! Every operation either returns a typed model or an [`Error`]:
//! [`Error::Validation`] when a required field is empty (nothing is sent),
//! [`Error::Network`] when no response arrived, and [`Error::Api`] when the
//! server answered with status >= 400.
//!
//! ```rust,no_run
//! use maia_client::{Client, ClientConfig, RecallOptions};
//! use std::time::Duration;
//!
//! # async fn example() -> maia_client::Result<()> {
//! let config = ClientConfig::new("http://localhost:8080")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_api_key("secret");
//! let client = Client::with_config(config)?;
//!
//! client.remember("default", "User prefers dark mode").await?;
//! let ctx = client
//!     .recall("What does the user prefer?", RecallOptions::new().token_budget(2000))
//!     .await?;
//! println!("{} ({} tokens)", ctx.content, ctx.token_count);
//!
//! match client.get_memory("missing").await {
//!     Err(e) if e.is_not_found() => println!("gone"),
//!     other => println!("{:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
mod client;
pub mod config;
pub mod error;
mod request;
mod response;
mod transport;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ApiError, Error, NetworkError, ResourceRef, Result, ValidationError};
pub use maia_types::*;
