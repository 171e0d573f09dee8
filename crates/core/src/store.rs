//! In-memory clinical data store.
//!
//! This stands in for the persistence-backed patient, concept and observation
//! services of the full system. The store is populated once at startup —
//! either programmatically or from a JSON seed file — and is read-only during
//! request handling, so it can be shared across handlers without locking.

use std::collections::HashMap;
use std::path::Path;

use dashboard_types::ConceptCode;
use serde::Deserialize;

use crate::error::{DashboardError, DashboardResult};
use crate::links::{ExtensionRegistry, Link};
use crate::observation::{Concept, Observation};
use crate::patient::Patient;

/// Patients, concepts and observations, queryable by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ClinicalStore {
    patients: HashMap<i64, Patient>,
    concepts: HashMap<ConceptCode, Concept>,
    observations: Vec<Observation>,
}

/// On-disk seed format: the clinical data plus the extension link set.
#[derive(Debug, Deserialize)]
struct Seed {
    #[serde(default)]
    patients: Vec<Patient>,
    #[serde(default)]
    concepts: Vec<Concept>,
    #[serde(default)]
    observations: Vec<Observation>,
    #[serde(default)]
    add_encounter_to_visit_links: Vec<Link>,
}

impl ClinicalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.insert(patient.id, patient);
    }

    pub fn add_concept(&mut self, concept: Concept) {
        self.concepts.insert(concept.code.clone(), concept);
    }

    pub fn add_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Look up a patient by id.
    pub fn patient(&self, id: i64) -> Option<&Patient> {
        self.patients.get(&id)
    }

    /// Resolve a concept by its configured code.
    pub fn concept(&self, code: &ConceptCode) -> Option<&Concept> {
        self.concepts.get(code)
    }

    /// All observations recorded for a person against a concept.
    pub fn observations_for(&self, person_id: i64, concept_id: i64) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|obs| obs.person_id == person_id && obs.concept_id == concept_id)
            .collect()
    }

    /// Load a store and extension registry from a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::SeedRead` if the file cannot be read, or
    /// `DashboardError::SeedParse` if it is not valid seed JSON.
    pub fn from_seed_file(path: &Path) -> DashboardResult<(Self, ExtensionRegistry)> {
        let contents = std::fs::read_to_string(path).map_err(DashboardError::SeedRead)?;
        Self::from_seed_str(&contents)
    }

    /// Load a store and extension registry from seed JSON.
    pub fn from_seed_str(contents: &str) -> DashboardResult<(Self, ExtensionRegistry)> {
        let seed: Seed = serde_json::from_str(contents).map_err(DashboardError::SeedParse)?;

        let mut store = Self::new();
        for patient in seed.patients {
            store.add_patient(patient);
        }
        for concept in seed.concepts {
            store.add_concept(concept);
        }
        for observation in seed.observations {
            store.add_observation(observation);
        }

        tracing::info!(
            "seeded clinical store: {} patients, {} concepts, {} observations, {} links",
            store.patients.len(),
            store.concepts.len(),
            store.observations.len(),
            seed.add_encounter_to_visit_links.len()
        );

        let registry = ExtensionRegistry::new(seed.add_encounter_to_visit_links);
        Ok((store, registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED: &str = r#"{
        "patients": [
            { "id": 1, "dead": true, "names": [{ "givenName": "Ada", "familyName": "Lovelace" }] }
        ],
        "concepts": [
            { "id": 10, "code": "concept.causeOfDeath", "name": "Cause of death" }
        ],
        "observations": [
            { "id": 100, "personId": 1, "conceptId": 10, "valueText": "Heart failure" }
        ],
        "add_encounter_to_visit_links": [
            { "label": "Add encounter", "url": "/encounters/new" }
        ]
    }"#;

    #[test]
    fn seeds_store_and_registry_from_json() {
        let (store, registry) = ClinicalStore::from_seed_str(SEED).unwrap();

        let patient = store.patient(1).expect("patient 1");
        assert!(patient.dead);

        let code = ConceptCode::new("concept.causeOfDeath").unwrap();
        let concept = store.concept(&code).expect("concept");
        assert_eq!(concept.id, 10);

        let obs = store.observations_for(1, 10);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].value_text.as_deref(), Some("Heart failure"));

        assert_eq!(registry.all_add_encounter_to_visit_links().len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let (store, registry) = ClinicalStore::from_seed_str("{}").unwrap();
        assert!(store.patient(1).is_none());
        assert!(registry.all_add_encounter_to_visit_links().is_empty());
    }

    #[test]
    fn invalid_seed_json_is_a_parse_error() {
        let err = ClinicalStore::from_seed_str("{ not json").unwrap_err();
        assert!(matches!(err, DashboardError::SeedParse(_)));
    }

    #[test]
    fn reads_seed_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let (store, _) = ClinicalStore::from_seed_file(file.path()).unwrap();
        assert!(store.patient(1).is_some());
    }

    #[test]
    fn missing_seed_file_is_a_read_error() {
        let err = ClinicalStore::from_seed_file(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, DashboardError::SeedRead(_)));
    }
}
