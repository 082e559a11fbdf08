use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for mooring operations
///
/// Absence cases (no cookie, no cache entry) are not errors; they resolve
/// to the new-session path inside [`crate::SessionStore::open`]. Everything
/// here is a genuine failure that aborts the request's session step.
#[derive(Debug, thiserror::Error)]
pub enum MooringError {
    /// A session payload could not be encoded, or a stored payload was
    /// not a valid JSON object
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The cache backend could not be reached or refused the operation
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Standard error response format for session failures
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    error_id: String,
}

impl MooringError {
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn cache_unavailable(msg: impl Into<String>) -> Self {
        Self::CacheUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Serialization(_) | Self::Internal(_) | Self::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::CacheUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns a safe error message suitable for client responses.
    ///
    /// Every variant is a server-side failure, so details stay out of the
    /// response to prevent information disclosure (CWE-209). The full error
    /// is logged server-side instead.
    fn safe_message(&self) -> String {
        match self {
            Self::CacheUnavailable(_) => "Service unavailable".to_string(),
            Self::Serialization(_) | Self::Internal(_) | Self::Anyhow(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for MooringError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        // Full error details go to the server logs, not to clients
        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Session request failed"
        );

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias for mooring operations
pub type Result<T> = std::result::Result<T, MooringError>;

impl From<serde_json::Error> for MooringError {
    fn from(err: serde_json::Error) -> Self {
        MooringError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error() {
        let err = MooringError::serialization("bad payload");
        assert!(matches!(err, MooringError::Serialization(_)));
        assert_eq!(err.to_string(), "Serialization error: bad payload");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_cache_unavailable_error() {
        let err = MooringError::cache_unavailable("connection refused");
        assert!(matches!(err, MooringError::CacheUnavailable(_)));
        assert_eq!(err.to_string(), "Cache unavailable: connection refused");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_error() {
        let err = MooringError::internal("layer missing");
        assert!(matches!(err, MooringError::Internal(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_error() {
        let anyhow_err = anyhow::anyhow!("something unexpected");
        let err: MooringError = anyhow_err.into();
        assert!(matches!(err, MooringError::Anyhow(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_serde_json_error() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ not json }");
        let err: MooringError = result.unwrap_err().into();
        assert!(matches!(err, MooringError::Serialization(_)));
    }

    #[test]
    fn test_safe_message_hides_details() {
        assert_eq!(
            MooringError::internal("db password is 'secret123'").safe_message(),
            "Internal server error"
        );
        assert_eq!(
            MooringError::cache_unavailable("memcached at cache.internal:11211 unreachable")
                .safe_message(),
            "Service unavailable"
        );
        assert_eq!(
            MooringError::serialization("corrupt payload for session abc").safe_message(),
            "Internal server error"
        );
    }

    #[tokio::test]
    async fn test_into_response_cache_unavailable() {
        let err = MooringError::cache_unavailable("down");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_into_response_body_is_sanitized() {
        let err = MooringError::internal("Sensitive: memcached key layout");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "Internal server error");
        assert!(!json["error"].as_str().unwrap().contains("memcached"));

        // Every error response carries a UUID error id for log correlation
        let error_id = json["error_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(error_id).is_ok());
    }
}
