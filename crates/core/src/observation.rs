//! Clinical observations and the concepts they code against.

use chrono::{DateTime, Utc};
use dashboard_types::ConceptCode;
use serde::{Deserialize, Serialize};

/// A coded clinical term from the terminology dictionary.
///
/// Concepts are resolved by their string code; configuration names concepts
/// by code rather than by numeric id, so a lookup may miss when the
/// dictionary does not define the configured code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: i64,
    pub code: ConceptCode,
    pub name: String,
}

/// A recorded clinical fact linking a person, a concept, and a value.
///
/// An observation may carry a free-text value, a coded value (another
/// concept's id), a datetime, or any combination of the three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: i64,
    pub person_id: i64,
    pub concept_id: i64,
    #[serde(default)]
    pub value_text: Option<String>,
    #[serde(default)]
    pub value_coded: Option<i64>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// True when this observation records a completed exit from care:
    /// both the coded reason and the exit date must be present.
    pub fn is_exit_event(&self) -> bool {
        self.value_coded.is_some() && self.observed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation() -> Observation {
        Observation {
            id: 1,
            person_id: 7,
            concept_id: 3,
            value_text: None,
            value_coded: None,
            observed_at: None,
        }
    }

    #[test]
    fn exit_event_needs_both_reason_and_date() {
        let mut obs = observation();
        assert!(!obs.is_exit_event());

        obs.value_coded = Some(42);
        assert!(!obs.is_exit_event());

        obs.observed_at = Some(Utc::now());
        assert!(obs.is_exit_event());

        obs.value_coded = None;
        assert!(!obs.is_exit_event());
    }
}
