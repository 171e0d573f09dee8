//! Dashboard runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! dashboard service. The intent is to avoid ambient global-property lookups
//! during request handling, which can lead to inconsistent behaviour in
//! multi-threaded runtimes and test harnesses.

use dashboard_types::ConceptCode;

/// The configured concept codes the dashboard derivations depend on.
///
/// Either code may be absent, in which case the dependent derivation is
/// treated as "feature not configured" and skipped.
#[derive(Clone, Debug, Default)]
pub struct DashboardConfig {
    cause_of_death: Option<ConceptCode>,
    reason_exited_care: Option<ConceptCode>,
}

impl DashboardConfig {
    /// Create a new `DashboardConfig`.
    pub fn new(
        cause_of_death: Option<ConceptCode>,
        reason_exited_care: Option<ConceptCode>,
    ) -> Self {
        Self {
            cause_of_death,
            reason_exited_care,
        }
    }

    /// The concept code naming the cause-of-death concept, if configured.
    pub fn cause_of_death(&self) -> Option<&ConceptCode> {
        self.cause_of_death.as_ref()
    }

    /// The concept code naming the reason-exited-care concept, if configured.
    pub fn reason_exited_care(&self) -> Option<&ConceptCode> {
        self.reason_exited_care.as_ref()
    }

    /// Build a config from raw environment values.
    ///
    /// `None`, empty, or whitespace-only values leave the corresponding
    /// feature unconfigured.
    pub fn from_env_values(
        cause_of_death: Option<String>,
        reason_exited_care: Option<String>,
    ) -> Self {
        Self {
            cause_of_death: cause_of_death.and_then(|v| ConceptCode::new(v).ok()),
            reason_exited_care: reason_exited_care.and_then(|v| ConceptCode::new(v).ok()),
        }
    }
}
