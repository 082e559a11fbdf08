//! Tower layer wiring sessions into the axum request lifecycle
//!
//! The service opens the session before the inner service runs, parks a
//! [`SessionHandle`] in the request extensions for handlers to extract,
//! and saves the session afterwards, appending the resulting `Set-Cookie`
//! header to the response.

use crate::error::MooringError;
use crate::session::{Session, SessionStore};
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{
        HeaderValue, Request,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower::{Layer, Service};

/// Shared handle to the request's session
///
/// Cloneable; handlers extract it and lock for access. The service keeps
/// its own clone to save the session once the inner service responds.
#[derive(Clone)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    /// Lock the session for reading
    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.0.read().await
    }

    /// Lock the session for writing
    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.0.write().await
    }
}

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = MooringError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let handle = parts.extensions.get::<SessionHandle>().cloned();
        async move {
            handle.ok_or_else(|| {
                MooringError::internal(
                    "SessionHandle not found in request extensions. Is SessionLayer installed?",
                )
            })
        }
    }
}

/// Layer that applies [`SessionService`] to the wrapped service
#[derive(Clone)]
pub struct SessionLayer {
    store: Arc<SessionStore>,
}

impl SessionLayer {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            store: self.store.clone(),
        }
    }
}

/// Middleware service produced by [`SessionLayer`]
#[derive(Clone)]
pub struct SessionService<S> {
    inner: S,
    store: Arc<SessionStore>,
}

impl<S> Service<Request<Body>> for SessionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), S::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let store = self.store.clone();
        // Take the service that was readied by poll_ready, leaving the clone
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let cookie_value = session_cookie_value(&req, &store.config().cookie_name);

            let session = match store.open(cookie_value.as_deref()).await {
                Ok(session) => session,
                Err(err) => return Ok(err.into_response()),
            };

            let handle = SessionHandle::new(session);
            req.extensions_mut().insert(handle.clone());

            let mut response = inner.call(req).await?;

            let session = handle.read().await.clone();
            match store.save(&session).await {
                Ok(Some(cookie)) => match HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        response.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to encode session cookie header");
                    }
                },
                Ok(None) => {}
                Err(err) => return Ok(err.into_response()),
            }

            Ok(response)
        })
    }
}

/// Find the configured session cookie among the request's Cookie headers
fn session_cookie_value(req: &Request<Body>, name: &str) -> Option<String> {
    req.headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| cookie::Cookie::split_parse(value.to_owned()))
        .filter_map(|parsed| parsed.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}
