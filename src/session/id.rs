use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes backing a generated session id
const ID_BYTES: usize = 8;

/// Opaque session identifier
///
/// Generated ids are 16 lowercase hex characters from 8 bytes of OS
/// randomness; collision probability across live sessions is negligible
/// and no uniqueness check is made against the cache. Ids arriving in
/// cookies are adopted verbatim, so the type also wraps arbitrary
/// client-supplied strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_16_lowercase_hex() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_generate_is_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_adopts_cookie_value_verbatim() {
        let id = SessionId::from("a1b2c3d4e5f60718");
        assert_eq!(id.as_str(), "a1b2c3d4e5f60718");
        assert_eq!(id.to_string(), "a1b2c3d4e5f60718");
    }
}
