use crate::error::Result;
use crate::session::SessionId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A single request's session
///
/// Behaves as a string-keyed mapping of JSON values with change tracking:
/// every mutating operation marks the session modified, so the store knows
/// at save time whether an emptied session must also clear its cookie.
/// Read-only accessors never touch the flag.
///
/// A session lives for exactly one request. Continuity across requests
/// comes from the cache entry keyed by [`SessionId`], never from this
/// object itself.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    data: Map<String, Value>,
    is_new: bool,
    modified: bool,
    permanent: bool,
}

impl Session {
    /// Create a fresh, empty session
    pub(crate) fn new(id: SessionId) -> Self {
        Self {
            id,
            data: Map::new(),
            is_new: true,
            modified: false,
            permanent: false,
        }
    }

    /// Rehydrate a session from a stored payload
    pub(crate) fn from_parts(id: SessionId, data: Map<String, Value>) -> Self {
        Self {
            id,
            data,
            is_new: false,
            modified: false,
            permanent: false,
        }
    }

    /// The session's identifier, fixed for its whole lifetime
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// True if no cache entry existed for this id at open time
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True if the data mapping was mutated after open
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// True if the session uses the long-lived expiration policy
    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    /// Select the long-lived (or default) expiration policy
    ///
    /// Permanence is a policy flag, not session content; flipping it does
    /// not mark the session modified.
    pub fn set_permanent(&mut self, permanent: bool) {
        self.permanent = permanent;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the raw JSON value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Deserialize the value stored under `key` into a concrete type
    ///
    /// Returns `None` if the key is absent or the value doesn't match `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Insert a value, marking the session modified
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.data.insert(key.into(), value);
        self.modified = true;
        Ok(())
    }

    /// Remove a key, marking the session modified if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.data.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    /// Remove every key, marking the session modified
    pub fn clear(&mut self) {
        self.data.clear();
        self.modified = true;
    }

    /// Iterate entries without affecting the modified flag
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// The underlying mapping, for serialization by the store
    pub(crate) fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fresh() -> Session {
        Session::new(SessionId::generate())
    }

    #[test]
    fn test_new_session_is_new_and_empty() {
        let session = fresh();
        assert!(session.is_new());
        assert!(session.is_empty());
        assert!(!session.is_modified());
        assert!(!session.is_permanent());
    }

    #[test]
    fn test_rehydrated_session_is_not_new() {
        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));
        let session = Session::from_parts(SessionId::from("a1b2c3d4e5f60718"), data);

        assert!(!session.is_new());
        assert!(!session.is_modified());
        assert_eq!(session.get("user"), Some(&json!("alice")));
    }

    #[test]
    fn test_insert_marks_modified() {
        let mut session = fresh();
        session.insert("user", "alice").unwrap();
        assert!(session.is_modified());
        assert_eq!(session.get_as::<String>("user").as_deref(), Some("alice"));
    }

    #[test]
    fn test_reads_do_not_mark_modified() {
        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));
        let session = Session::from_parts(SessionId::from("a1b2c3d4e5f60718"), data);

        assert_eq!(session.get_as::<String>("user").as_deref(), Some("alice"));
        assert!(session.contains_key("user"));
        assert_eq!(session.len(), 1);
        assert_eq!(session.iter().count(), 1);
        assert!(!session.is_modified());
    }

    #[test]
    fn test_remove_marks_modified_only_when_present() {
        let mut session = fresh();
        assert!(session.remove("missing").is_none());
        assert!(!session.is_modified());

        let mut data = Map::new();
        data.insert("user".to_string(), json!("alice"));
        let mut session = Session::from_parts(SessionId::from("a1b2c3d4e5f60718"), data);
        assert_eq!(session.remove("user"), Some(json!("alice")));
        assert!(session.is_modified());
        assert!(session.is_empty());
    }

    #[test]
    fn test_clear_marks_modified() {
        let mut session = fresh();
        session.insert("a", 1).unwrap();
        session.insert("b", 2).unwrap();
        session.clear();
        assert!(session.is_empty());
        assert!(session.is_modified());
    }

    #[test]
    fn test_set_permanent_does_not_mark_modified() {
        let mut session = fresh();
        session.set_permanent(true);
        assert!(session.is_permanent());
        assert!(!session.is_modified());
    }

    #[test]
    fn test_structured_values_roundtrip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Prefs {
            theme: String,
            columns: Vec<u32>,
        }

        let mut session = fresh();
        session
            .insert(
                "prefs",
                Prefs {
                    theme: "dark".to_string(),
                    columns: vec![1, 2, 3],
                },
            )
            .unwrap();

        let prefs: Prefs = session.get_as("prefs").unwrap();
        assert_eq!(prefs.theme, "dark");
        assert_eq!(prefs.columns, vec![1, 2, 3]);

        // Wrong target type is None, not a panic
        assert!(session.get_as::<u64>("prefs").is_none());
    }
}
