use crate::error::{MooringError, Result};
use crate::session::{Session, SessionConfig, SessionId};
use crate::traits::cache::Cache;
use cookie::{Cookie, SameSite};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Cache-backed session store
///
/// Implements the per-request open/save cycle: `open` turns an incoming
/// cookie value into a [`Session`], `save` persists the session and yields
/// the cookie to set on the response, if any. The cache entry and the
/// cookie never diverge: an emptied session deletes its entry and clears
/// its cookie in the same save, and a stored session always refreshes its
/// cookie under the matching expiration policy.
pub struct SessionStore {
    cache: Arc<dyn Cache>,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session store over the given cache backend
    pub fn new(cache: Arc<dyn Cache>, config: SessionConfig) -> Self {
        Self { cache, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn cache_key(&self, id: &SessionId) -> String {
        format!("{}{}", self.config.key_prefix, id)
    }

    /// Open the session for a request
    ///
    /// `cookie` is the raw session cookie value, if the request carried
    /// one. No cookie means a fresh session under a generated id. A cookie
    /// whose id has no cache entry also yields a fresh session, but keeps
    /// the client's id instead of minting a new one.
    ///
    /// # Errors
    ///
    /// A stored payload that is not a valid JSON object is a fatal
    /// [`MooringError::Serialization`]; cache transport failures surface
    /// as [`MooringError::CacheUnavailable`].
    pub async fn open(&self, cookie: Option<&str>) -> Result<Session> {
        let Some(value) = cookie else {
            let session = Session::new(SessionId::generate());
            tracing::debug!(session_id = %session.id(), "No session cookie, created new session");
            return Ok(session);
        };

        let id = SessionId::from(value);
        match self.cache.get_bytes(&self.cache_key(&id)).await? {
            Some(bytes) => {
                let data: Map<String, Value> = serde_json::from_slice(&bytes).map_err(|e| {
                    MooringError::serialization(format!(
                        "Corrupt session payload for {}: {}",
                        id, e
                    ))
                })?;
                Ok(Session::from_parts(id, data))
            }
            None => {
                tracing::debug!(session_id = %id, "Session cookie had no cache entry, adopting id");
                Ok(Session::new(id))
            }
        }
    }

    /// Persist the session and compute the response cookie
    ///
    /// An empty session deletes its cache entry (a no-op when none exists)
    /// and, only when the emptiness resulted from a mutation, returns the
    /// removal cookie. A non-empty session is rewritten with a TTL matching
    /// its permanence policy and always returns a refreshed session cookie.
    pub async fn save(&self, session: &Session) -> Result<Option<Cookie<'static>>> {
        let key = self.cache_key(session.id());

        if session.is_empty() {
            self.cache.delete(&key).await?;
            if session.is_modified() {
                tracing::debug!(session_id = %session.id(), "Session emptied, clearing cookie");
                return Ok(Some(self.removal_cookie()));
            }
            return Ok(None);
        }

        let ttl = self.config.cache_ttl(session.is_permanent());
        let payload = serde_json::to_vec(session.data())?;
        self.cache.set_bytes(&key, payload, Some(ttl)).await?;
        tracing::debug!(
            session_id = %session.id(),
            ttl_seconds = ttl.as_secs(),
            permanent = session.is_permanent(),
            "Session saved"
        );

        Ok(Some(self.session_cookie(session)))
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.config.cookie_name.clone(), value))
            .path(self.config.cookie_path.clone())
            .http_only(self.config.cookie_http_only)
            .secure(self.config.cookie_secure)
            .same_site(SameSite::Lax);

        if let Some(ref domain) = self.config.cookie_domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }

    fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        let mut cookie = self.base_cookie(session.id().to_string());
        if let Some(expires) = self.config.cookie_expiration(session.is_permanent()) {
            cookie.set_expires(expires);
        }
        cookie
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}
