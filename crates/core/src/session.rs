//! Per-session key-value storage for dashboard values.
//!
//! The dashboard mirrors everything it renders into the caller's session so
//! that later partial-page requests in the same session can fetch individual
//! sections without re-deriving them. Values are stored as JSON under keys
//! built from a constant prefix plus the patient id, so one session can hold
//! mirrors for several patients at once. Re-rendering the dashboard for a
//! patient overwrites that patient's keys.

use std::collections::HashMap;

/// Session key prefixes for the mirrored dashboard values.
///
/// A full key is `<prefix><patient_id>`, e.g. `dashboard.patient.42`.
pub mod keys {
    pub const PATIENT: &str = "dashboard.patient.";
    pub const PATIENT_VARIATION: &str = "dashboard.patientVariation.";
    pub const EMPTY_IDENTIFIER: &str = "dashboard.emptyIdentifier.";
    pub const EMPTY_NAME: &str = "dashboard.emptyName.";
    pub const EMPTY_ADDRESS: &str = "dashboard.emptyAddress.";
    pub const CAUSE_OF_DEATH: &str = "dashboard.causeOfDeath.";
    pub const ENCOUNTER_LINKS: &str = "dashboard.addEncounterToVisitLinks.";
}

/// Build the session key for a prefix and patient id.
pub fn key(prefix: &str, patient_id: i64) -> String {
    format!("{prefix}{patient_id}")
}

/// A session's key-value store.
///
/// One instance exists per session; the platform serialises requests within a
/// session, so no internal locking is needed here.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    values: HashMap<String, serde_json::Value>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous value under the same key.
    pub fn insert(&mut self, key: String, value: serde_json::Value) {
        self.values.insert(key, value);
    }

    /// Fetch a previously stored value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_patient_id() {
        assert_eq!(key(keys::PATIENT, 42), "dashboard.patient.42");
        assert_eq!(
            key(keys::ENCOUNTER_LINKS, 7),
            "dashboard.addEncounterToVisitLinks.7"
        );
    }

    #[test]
    fn insert_overwrites_existing_value() {
        let mut session = SessionStore::new();
        let k = key(keys::CAUSE_OF_DEATH, 1);
        session.insert(k.clone(), serde_json::json!("first"));
        session.insert(k.clone(), serde_json::json!("second"));
        assert_eq!(session.get(&k), Some(&serde_json::json!("second")));
        assert_eq!(session.len(), 1);
    }
}
