//! Links contributed by extension modules.

use serde::{Deserialize, Serialize};

/// A labelled URL contributed by an extension module for display on the
/// dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Registry of extension-contributed links.
///
/// The real system discovers these from installed modules at runtime; here
/// the set is fixed at startup (typically from the seed file).
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    add_encounter_to_visit_links: Vec<Link>,
}

impl ExtensionRegistry {
    /// Create a registry holding the given "add encounter to visit" links.
    pub fn new(add_encounter_to_visit_links: Vec<Link>) -> Self {
        Self {
            add_encounter_to_visit_links,
        }
    }

    /// All links for adding an encounter to a visit, across every extension.
    pub fn all_add_encounter_to_visit_links(&self) -> &[Link] {
        &self.add_encounter_to_visit_links
    }
}
