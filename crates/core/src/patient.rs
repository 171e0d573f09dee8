//! Patient demographics types.
//!
//! A patient carries an integer id, a deceased flag, and zero-or-more
//! identifiers, names and addresses. The `Default` implementations of the
//! component types matter: the dashboard hands blank instances to the view
//! layer so its "add new" forms have an empty structure to bind to.

use serde::{Deserialize, Serialize};

/// A patient known to the clinical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    /// True when the patient has died.
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub identifiers: Vec<PatientIdentifier>,
    #[serde(default)]
    pub names: Vec<PersonName>,
    #[serde(default)]
    pub addresses: Vec<PersonAddress>,
}

/// A medical record number or other identifier assigned to a patient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIdentifier {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub identifier_type: String,
    #[serde(default)]
    pub preferred: bool,
}

/// A name recorded for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// A postal address recorded for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAddress {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city_village: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}
