//! Server-side session registry.
//!
//! The platform the original handler ran on expired idle sessions itself;
//! this service owns that role, so the registry bounds its own growth. Stale
//! sessions are swept whenever a session is opened, and when the registry is
//! full the least-recently-touched session is evicted to make room.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashboard_core::SessionStore;

/// Idle time after which a session is dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on concurrently live sessions.
pub const MAX_SESSIONS: usize = 10_000;

struct SessionEntry {
    store: SessionStore,
    touched: Instant,
}

/// All live sessions, keyed by session id.
pub struct SessionRegistry {
    ttl: Duration,
    max_sessions: usize,
    entries: HashMap<String, SessionEntry>,
}

impl SessionRegistry {
    /// Create a registry with the given idle timeout and capacity.
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            ttl,
            max_sessions,
            entries: HashMap::new(),
        }
    }

    /// Create a registry with the default timeout and capacity.
    pub fn with_defaults() -> Self {
        Self::new(SESSION_TTL, MAX_SESSIONS)
    }

    /// Fetch the store for a session, creating it if needed.
    ///
    /// Opening a session refreshes its idle timer. Expired sessions are swept
    /// first, and when the registry is still full the least-recently-touched
    /// session is evicted, so cookie-less request floods cannot grow server
    /// memory without bound.
    pub fn session(&mut self, id: &str) -> &mut SessionStore {
        self.sweep();

        if !self.entries.contains_key(id) {
            while self.entries.len() >= self.max_sessions {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.touched)
                    .map(|(key, _)| key.clone());
                match oldest {
                    Some(key) => {
                        tracing::debug!("evicting session '{}' to make room", key);
                        self.entries.remove(&key);
                    }
                    None => break,
                }
            }
        }

        let entry = self
            .entries
            .entry(id.to_string())
            .or_insert_with(|| SessionEntry {
                store: SessionStore::new(),
                touched: Instant::now(),
            });
        entry.touched = Instant::now();
        &mut entry.store
    }

    /// Fetch an existing session's store without refreshing its idle timer.
    ///
    /// An expired session is treated as absent even if it has not been swept
    /// yet.
    pub fn get(&self, id: &str) -> Option<&SessionStore> {
        let entry = self.entries.get(id)?;
        if entry.touched.elapsed() >= self.ttl {
            return None;
        }
        Some(&entry.store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.touched.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_an_existing_session() {
        let mut registry = SessionRegistry::new(Duration::from_secs(3600), 1);
        registry
            .session("a")
            .insert("k".into(), serde_json::json!(1));

        assert_eq!(registry.session("a").get("k"), Some(&serde_json::json!(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn sweeps_idle_sessions_after_ttl() {
        let mut registry = SessionRegistry::new(Duration::from_millis(10), 10);
        registry.session("a");
        std::thread::sleep(Duration::from_millis(20));

        assert!(registry.get("a").is_none());

        registry.session("b");
        assert_eq!(registry.len(), 1);
        assert!(registry.get("b").is_some());
    }

    #[test]
    fn evicts_least_recently_touched_when_full() {
        let mut registry = SessionRegistry::new(Duration::from_secs(3600), 2);
        registry.session("a");
        std::thread::sleep(Duration::from_millis(5));
        registry.session("b");
        std::thread::sleep(Duration::from_millis(5));
        // Touch "a" again so "b" becomes the oldest.
        registry.session("a");
        std::thread::sleep(Duration::from_millis(5));
        registry.session("c");

        assert_eq!(registry.len(), 2);
        assert!(registry.get("b").is_none());
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_some());
    }

    #[test]
    fn session_count_never_exceeds_capacity() {
        let mut registry = SessionRegistry::new(Duration::from_secs(3600), 3);
        for id in 0..10 {
            registry.session(&format!("session-{id}"));
        }
        assert_eq!(registry.len(), 3);
    }
}
