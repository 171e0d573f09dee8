//! # Dashboard Core
//!
//! Core business logic for the patient dashboard service.
//!
//! This crate contains the domain types and the dashboard assembly:
//! - Patient, concept and observation types with an in-memory clinical store
//! - Per-session storage for mirrored dashboard values
//! - The dashboard service deriving cause-of-death text and patient variation
//!
//! **No API concerns**: HTTP routing, session cookies, or OpenAPI surfaces
//! belong in `api-rest`.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod links;
pub mod observation;
pub mod patient;
pub mod session;
pub mod store;

pub use config::DashboardConfig;
pub use dashboard::{
    Caller, Dashboard, DashboardModel, DashboardService, PatientVariation, DASHBOARD_VIEW,
};
pub use error::{DashboardError, DashboardResult};
pub use links::{ExtensionRegistry, Link};
pub use observation::{Concept, Observation};
pub use patient::{Patient, PatientIdentifier, PersonAddress, PersonName};
pub use session::SessionStore;
pub use store::ClinicalStore;
