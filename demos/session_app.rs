//! Example: a small axum app with cache-backed sessions
//!
//! Every visit increments a per-browser counter; /remember flips the
//! session to the permanent expiration policy; /forget empties it, which
//! deletes the cache entry and clears the cookie.
//!
//! Run with: cargo run --example session_app

use axum::{Json, Router, routing::get};
use mooring::{CacheConfig, SessionConfig, SessionHandle, SessionLayer, SessionStore};
use serde_json::{Value, json};
use std::sync::Arc;

async fn visit(session: SessionHandle) -> mooring::Result<Json<Value>> {
    let mut session = session.write().await;
    let count: u64 = session.get_as("visits").unwrap_or(0);
    session.insert("visits", count + 1)?;

    Ok(Json(json!({
        "session_id": session.id().to_string(),
        "visits": count + 1,
        "permanent": session.is_permanent(),
    })))
}

async fn remember(session: SessionHandle) -> Json<Value> {
    session.write().await.set_permanent(true);
    Json(json!({"permanent": true}))
}

async fn forget(session: SessionHandle) -> Json<Value> {
    session.write().await.clear();
    Json(json!({"forgotten": true}))
}

#[tokio::main]
async fn main() -> mooring::Result<()> {
    mooring::init_tracing();

    // In-memory by default; set MOORING_CACHE_BACKEND=memcached and
    // MOORING_CACHE_MEMCACHED_URL=memcache://127.0.0.1:11211 for the real thing
    // (requires the memcached feature)
    let cache = CacheConfig::from_env().build()?;
    let config = SessionConfig {
        cookie_secure: false, // local demo runs over plain HTTP
        ..SessionConfig::from_env()
    };
    let store = Arc::new(SessionStore::new(cache, config));

    let app: Router = Router::new()
        .route("/", get(visit))
        .route("/remember", get(remember))
        .route("/forget", get(forget))
        .layer(SessionLayer::new(store));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .map_err(|e| mooring::MooringError::internal(format!("Failed to bind: {}", e)))?;
    tracing::info!("Listening on http://127.0.0.1:3000");
    axum::serve(listener, app)
        .await
        .map_err(|e| mooring::MooringError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
