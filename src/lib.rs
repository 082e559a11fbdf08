//! Mooring - memcached-backed server-side sessions for axum
//!
//! Mooring persists session data in a distributed cache keyed by an opaque
//! identifier carried in a browser cookie. The cache entry and the cookie
//! are kept in sync: a session that empties out has its entry deleted and
//! its cookie cleared in the same save, and a session that persists always
//! ships a cookie whose lifetime matches the cache TTL.
//!
//! # Features
//!
//! - **Change tracking**: sessions know when they were mutated, so cookies
//!   are only cleared when content actually changed
//! - **Pluggable backends**: memcached in production (`memcached` feature),
//!   moka in-memory for development and tests
//! - **axum integration**: a `tower::Layer` opens the session before your
//!   handlers run and saves it after they respond
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use mooring::{InMemoryCache, SessionConfig, SessionHandle, SessionLayer, SessionStore};
//! use std::sync::Arc;
//!
//! async fn visit(session: SessionHandle) -> String {
//!     let mut session = session.write().await;
//!     let count: u64 = session.get_as("visits").unwrap_or(0);
//!     let _ = session.insert("visits", count + 1);
//!     format!("visit #{}", count + 1)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     mooring::init_tracing();
//!
//!     let store = Arc::new(SessionStore::new(
//!         Arc::new(InMemoryCache::default()),
//!         SessionConfig::from_env(),
//!     ));
//!
//!     let app: Router = Router::new()
//!         .route("/", get(visit))
//!         .layer(SessionLayer::new(store));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

#![allow(async_fn_in_trait)] // async_trait macro handles Send/Sync bounds properly

pub mod cache;
mod error;
pub mod session;
pub mod traits;
mod utils;

// Re-exports for public API
#[cfg(feature = "memcached")]
pub use cache::MemcachedCache;
pub use cache::{CacheBackend, CacheConfig, InMemoryCache, NoOpCache};
pub use error::{MooringError, Result};
pub use session::{
    Session, SessionConfig, SessionHandle, SessionId, SessionLayer, SessionService, SessionStore,
};
pub use traits::cache::{Cache, CacheExt};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before building the session store.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "mooring=debug")
/// - `MOORING_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("MOORING_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
