use dashmap::DashMap;

/// Key holding the serialized identity record (credential never included).
pub const IDENTITY_KEY: &str = "auth.identity";
/// Key holding the session expiry as an RFC 3339 timestamp.
pub const EXPIRES_AT_KEY: &str = "auth.expires_at";
/// Key holding the logged-in flag, `"true"` or `"false"`.
pub const LOGGED_IN_KEY: &str = "auth.logged_in";

/// Client-visible key-value store backing the session snapshot.
///
/// Models the browser-local storage the UI shell hands us. The three keys
/// above must move in lockstep; restore treats any missing or inconsistent
/// combination as "no session".
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory stand-in for client-side storage.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    entries: DashMap<String, String>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
