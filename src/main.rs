//! Patient dashboard service entry point.
//!
//! Resolves configuration from the environment once at startup, seeds the
//! in-memory clinical store, and serves the REST API.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use dashboard_core::{ClinicalStore, DashboardConfig, DashboardService, ExtensionRegistry};

/// Main entry point for the patient dashboard service
///
/// # Environment Variables
/// - `DASHBOARD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DASHBOARD_SEED_FILE`: JSON seed file for the clinical store (optional;
///   the store starts empty when unset)
/// - `CONCEPT_CAUSE_OF_DEATH`: concept code for the cause-of-death derivation
/// - `CONCEPT_REASON_EXITED_CARE`: concept code for the exited-care derivation
/// - `DASHBOARD_API_KEY`: API key callers authenticate with (optional)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or the running server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dashboard_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("DASHBOARD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let (store, registry) = match std::env::var("DASHBOARD_SEED_FILE") {
        Ok(path) => ClinicalStore::from_seed_file(&PathBuf::from(path))?,
        Err(_) => (ClinicalStore::new(), ExtensionRegistry::default()),
    };

    let config = DashboardConfig::from_env_values(
        std::env::var("CONCEPT_CAUSE_OF_DEATH").ok(),
        std::env::var("CONCEPT_REASON_EXITED_CARE").ok(),
    );
    let api_key = std::env::var("DASHBOARD_API_KEY").ok();

    tracing::info!("++ Starting patient dashboard REST on {}", addr);

    let dashboard = DashboardService::new(Arc::new(store), Arc::new(registry), config);
    api_rest::serve(&addr, AppState::new(dashboard, api_key)).await
}
