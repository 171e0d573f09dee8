//! # API REST
//!
//! REST API for the patient dashboard service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Session-cookie plumbing for the dashboard's per-session mirror
//! - Mapping core errors to HTTP statuses
//!
//! Uses `dashboard-core` for the dashboard assembly itself.

#![warn(rust_2018_idioms)]

pub mod sessions;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use dashboard_core::{session, Caller, DashboardError, DashboardService};

use crate::sessions::SessionRegistry;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "dashboard_session";

/// Application state shared across REST API handlers.
///
/// Holds the dashboard service, the session registry, and the optional API
/// key callers authenticate with.
#[derive(Clone)]
pub struct AppState {
    dashboard: DashboardService,
    sessions: Arc<RwLock<SessionRegistry>>,
    api_key: Option<String>,
}

impl AppState {
    /// Creates the shared state for the REST API.
    ///
    /// When `api_key` is `None` no caller can authenticate and the
    /// cause-of-death derivation is skipped for everyone.
    pub fn new(dashboard: DashboardService, api_key: Option<String>) -> Self {
        Self {
            dashboard,
            sessions: Arc::new(RwLock::new(SessionRegistry::with_defaults())),
            api_key,
        }
    }

    /// Resolve the caller identity from the `X-Api-Key` header.
    fn caller(&self, headers: &HeaderMap) -> Caller {
        let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        match (&self.api_key, provided) {
            (Some(expected), Some(provided)) if provided == expected => Caller::Authenticated,
            _ => Caller::Anonymous,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A rendered dashboard: the logical view name plus the view model.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardRes {
    /// Logical view name for the rendering layer.
    pub view: String,
    /// The view model, keyed as the dashboard template expects.
    #[schema(value_type = Object)]
    pub model: serde_json::Value,
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// The id of the patient to render the dashboard for.
    #[serde(rename = "patientId")]
    pub patient_id: i64,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, patient_dashboard, dashboard_section),
    components(schemas(HealthRes, DashboardRes))
)]
struct ApiDoc;

/// Build the REST API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patientDashboard.form", get(patient_dashboard))
        .route("/dashboard/:patient_id/section/:section", get(dashboard_section))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the REST API until the process exits.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while
/// running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "patient dashboard is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/patientDashboard.form",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Rendered dashboard view model", body = DashboardRes),
        (status = 404, description = "No patient with the given id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Render the patient dashboard
///
/// Resolves the patient, derives the display fields, and mirrors the result
/// into this session's store for later partial-page requests. The session is
/// established (or reused) via the `dashboard_session` cookie.
///
/// Callers presenting a valid `X-Api-Key` header are treated as
/// authenticated; anonymous callers still get a dashboard, but without the
/// cause-of-death derivation.
///
/// # Errors
/// Returns `404 Not Found` when no patient has the given id, and
/// `500 Internal Server Error` if a session value cannot be serialised.
#[axum::debug_handler]
async fn patient_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Result<
    (
        AppendHeaders<[(header::HeaderName, String); 1]>,
        Json<DashboardRes>,
    ),
    (StatusCode, String),
> {
    let caller = state.caller(&headers);
    let session_id =
        session_id_from_headers(&headers).unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let mut sessions = state.sessions.write().await;
    let session = sessions.session(&session_id);

    let dashboard = state
        .dashboard
        .render(caller, query.patient_id, session)
        .map_err(|e| match e {
            DashboardError::PatientNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("there is no patient with id: '{id}'"),
            ),
            other => {
                tracing::error!("dashboard render error: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
        })?;

    let model = serde_json::to_value(&dashboard.model).map_err(|e| {
        tracing::error!("dashboard model serialization error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
    })?;

    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(DashboardRes {
            view: dashboard.view.to_string(),
            model,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/dashboard/{patient_id}/section/{section}",
    params(
        ("patient_id" = i64, Path, description = "Patient id the dashboard was rendered for"),
        ("section" = String, Path, description = "Dashboard section name, e.g. patientVariation")
    ),
    responses(
        (status = 200, description = "Mirrored session value for the section"),
        (status = 404, description = "Unknown section, or dashboard not rendered in this session")
    )
)]
/// Fetch one mirrored dashboard section from the session
///
/// Serves the AJAX partial-page refreshes: values are read back from the
/// session store populated by a previous dashboard render in the same
/// session, not re-derived.
///
/// # Errors
/// Returns `404 Not Found` for an unknown section name or when the session
/// holds no value for the given patient.
#[axum::debug_handler]
async fn dashboard_section(
    State(state): State<AppState>,
    Path((patient_id, section)): Path<(i64, String)>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, &'static str)> {
    let Some(prefix) = section_prefix(&section) else {
        return Err((StatusCode::NOT_FOUND, "unknown dashboard section"));
    };
    let Some(session_id) = session_id_from_headers(&headers) else {
        return Err((StatusCode::NOT_FOUND, "dashboard not rendered in this session"));
    };

    let sessions = state.sessions.read().await;
    let value = sessions
        .get(&session_id)
        .and_then(|store| store.get(&session::key(prefix, patient_id)))
        .cloned();

    match value {
        Some(value) => Ok(Json(value)),
        None => Err((StatusCode::NOT_FOUND, "dashboard not rendered in this session")),
    }
}

/// Map a public section name to its session key prefix.
fn section_prefix(section: &str) -> Option<&'static str> {
    match section {
        "patient" => Some(session::keys::PATIENT),
        "patientVariation" => Some(session::keys::PATIENT_VARIATION),
        "emptyIdentifier" => Some(session::keys::EMPTY_IDENTIFIER),
        "emptyName" => Some(session::keys::EMPTY_NAME),
        "emptyAddress" => Some(session::keys::EMPTY_ADDRESS),
        "causeOfDeathOther" => Some(session::keys::CAUSE_OF_DEATH),
        "allAddEncounterToVisitLinks" => Some(session::keys::ENCOUNTER_LINKS),
        _ => None,
    }
}

/// Extract the session id from the `Cookie` header, if present.
fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(|id| id.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn section_names_cover_the_seven_mirrored_values() {
        for section in [
            "patient",
            "patientVariation",
            "emptyIdentifier",
            "emptyName",
            "emptyAddress",
            "causeOfDeathOther",
            "allAddEncounterToVisitLinks",
        ] {
            assert!(section_prefix(section).is_some(), "no prefix for {section}");
        }
        assert!(section_prefix("regimens").is_none());
    }

    #[test]
    fn session_id_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; dashboard_session=abc123; lang=en"),
        );
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_session_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }
}
