//! Dashboard assembly.
//!
//! This module builds the view model for the patient dashboard page: resolve
//! the patient, derive the cause-of-death display text and the patient status
//! variation from observations, attach the blank-template placeholders and
//! extension links, and mirror everything into the caller's session for later
//! partial-page requests.
//!
//! **No API concerns**: HTTP routing, session cookies and status-code mapping
//! belong in `api-rest`.

use std::sync::Arc;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::links::{ExtensionRegistry, Link};
use crate::patient::{Patient, PatientIdentifier, PersonAddress, PersonName};
use crate::session::{self, SessionStore};
use crate::store::ClinicalStore;

/// The logical view name the rendering layer resolves to the dashboard page.
pub const DASHBOARD_VIEW: &str = "patientDashboardForm";

/// The identity of the caller rendering the dashboard.
///
/// Passed explicitly rather than read from ambient context; only an
/// authenticated caller gets the cause-of-death derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Authenticated,
    Anonymous,
}

impl Caller {
    pub fn is_authenticated(self) -> bool {
        matches!(self, Caller::Authenticated)
    }
}

/// The patient status variation shown in the dashboard banner.
///
/// Serialises to the strings the view layer matches on: `""`, `"Dead"`,
/// `"Exited"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PatientVariation {
    #[default]
    #[serde(rename = "")]
    None,
    Dead,
    Exited,
}

impl PatientVariation {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientVariation::None => "",
            PatientVariation::Dead => "Dead",
            PatientVariation::Exited => "Exited",
        }
    }
}

/// The view model handed to the rendering layer for one dashboard request.
///
/// Field names serialise to the keys the dashboard template binds to. The
/// `ajax*` flags are fixed defaults enabling every AJAX partial section.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    pub patient: Patient,
    pub patient_variation: PatientVariation,
    pub empty_identifier: PatientIdentifier,
    pub empty_name: PersonName,
    pub empty_address: PersonAddress,
    pub cause_of_death_other: String,
    pub all_add_encounter_to_visit_links: Vec<Link>,
    pub ajax_enabled: bool,
    pub ajax_overview_disabled: bool,
    pub ajax_regimens_disabled: bool,
    pub ajax_visits_encounters_disabled: bool,
    pub ajax_demographics_disabled: bool,
    pub ajax_graphs_disabled: bool,
    pub ajax_form_entry_disabled: bool,
}

/// A rendered dashboard: the logical view name plus the populated model.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub view: &'static str,
    pub model: DashboardModel,
}

/// Assembles dashboard view models from clinical data.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<ClinicalStore>,
    registry: Arc<ExtensionRegistry>,
    config: DashboardConfig,
}

impl DashboardService {
    /// Creates a new `DashboardService` over the given store, extension
    /// registry and configuration.
    pub fn new(
        store: Arc<ClinicalStore>,
        registry: Arc<ExtensionRegistry>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Render the dashboard for a patient and mirror the result into the
    /// caller's session.
    ///
    /// Either the patient is found and the model is fully populated with all
    /// seven session keys written, or nothing is written at all. Every lookup
    /// past the patient itself degrades to a default value rather than
    /// failing the request.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::PatientNotFound` if no patient has the given
    /// id, or `DashboardError::SessionSerialization` if a mirrored value
    /// cannot be serialised (the session is left untouched in that case).
    pub fn render(
        &self,
        caller: Caller,
        patient_id: i64,
        session: &mut SessionStore,
    ) -> DashboardResult<Dashboard> {
        let Some(patient) = self.store.patient(patient_id) else {
            tracing::warn!("there is no patient with id: '{}'", patient_id);
            return Err(DashboardError::PatientNotFound(patient_id));
        };
        tracing::debug!("patient: '{}'", patient.id);

        let cause_of_death_other = if caller.is_authenticated() {
            self.cause_of_death_text(patient_id)
        } else {
            String::new()
        };

        let patient_variation = self.patient_variation(patient);

        let model = DashboardModel {
            patient: patient.clone(),
            patient_variation,
            empty_identifier: PatientIdentifier::default(),
            empty_name: PersonName::default(),
            empty_address: PersonAddress::default(),
            cause_of_death_other,
            all_add_encounter_to_visit_links: self
                .registry
                .all_add_encounter_to_visit_links()
                .to_vec(),
            ajax_enabled: true,
            ajax_overview_disabled: false,
            ajax_regimens_disabled: false,
            ajax_visits_encounters_disabled: false,
            ajax_demographics_disabled: false,
            ajax_graphs_disabled: false,
            ajax_form_entry_disabled: false,
        };

        mirror_into_session(session, patient_id, &model)?;

        Ok(Dashboard {
            view: DASHBOARD_VIEW,
            model,
        })
    }

    /// Derive the free-text cause of death for a patient.
    ///
    /// Populated only when the configured concept resolves and exactly one
    /// observation matches; every other outcome is an empty string.
    fn cause_of_death_text(&self, patient_id: i64) -> String {
        let Some(code) = self.config.cause_of_death() else {
            tracing::debug!("cause of death concept is not configured");
            return String::new();
        };
        let Some(concept) = self.store.concept(code) else {
            tracing::debug!("no cause of death concept found for code '{}'", code);
            return String::new();
        };

        let observations = self.store.observations_for(patient_id, concept.id);
        if observations.len() != 1 {
            tracing::debug!(
                "cause of death observations are wrong size: {}",
                observations.len()
            );
            return String::new();
        }

        match &observations[0].value_text {
            Some(text) => {
                tracing::debug!("cause of death is valid: {}", text);
                text.clone()
            }
            None => {
                tracing::debug!("cause of death text is null, using empty string");
                String::new()
            }
        }
    }

    /// Derive the status variation for a patient.
    ///
    /// `Dead` when the deceased flag is set; a single exit-from-care
    /// observation carrying both a coded reason and a date overrides this to
    /// `Exited` (the override applies to deceased patients too; behaviour
    /// preserved from the existing system).
    fn patient_variation(&self, patient: &Patient) -> PatientVariation {
        let mut variation = if patient.dead {
            PatientVariation::Dead
        } else {
            PatientVariation::None
        };

        let Some(code) = self.config.reason_exited_care() else {
            return variation;
        };
        let Some(concept) = self.store.concept(code) else {
            return variation;
        };

        let exit_observations = self.store.observations_for(patient.id, concept.id);
        tracing::debug!("exit observations are size {}", exit_observations.len());

        if exit_observations.len() == 1 {
            if exit_observations[0].is_exit_event() {
                variation = PatientVariation::Exited;
            }
        } else if exit_observations.len() > 1 {
            tracing::error!("too many reasons for exit - not putting data into model");
        }

        variation
    }
}

/// Mirror the model into the session under the patient's keys.
///
/// All seven values are serialised before any key is written, so a
/// serialisation failure leaves the session untouched.
fn mirror_into_session(
    session: &mut SessionStore,
    patient_id: i64,
    model: &DashboardModel,
) -> DashboardResult<()> {
    fn json<T: Serialize>(value: &T) -> DashboardResult<serde_json::Value> {
        serde_json::to_value(value).map_err(DashboardError::SessionSerialization)
    }

    let entries = [
        (session::keys::PATIENT, json(&model.patient)?),
        (
            session::keys::PATIENT_VARIATION,
            json(&model.patient_variation)?,
        ),
        (
            session::keys::EMPTY_IDENTIFIER,
            json(&model.empty_identifier)?,
        ),
        (session::keys::EMPTY_NAME, json(&model.empty_name)?),
        (session::keys::EMPTY_ADDRESS, json(&model.empty_address)?),
        (
            session::keys::CAUSE_OF_DEATH,
            json(&model.cause_of_death_other)?,
        ),
        (
            session::keys::ENCOUNTER_LINKS,
            json(&model.all_add_encounter_to_visit_links)?,
        ),
    ];

    for (prefix, value) in entries {
        session.insert(session::key(prefix, patient_id), value);
    }

    Ok(())
}
