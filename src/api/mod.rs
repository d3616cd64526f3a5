//! API handlers for the Progresando REST endpoints

pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    engine::dates::{parse_calendar_date, today_utc},
    error::{AppError, AppResult},
    AppState,
};

/// Extractor for a caller holding one of the configured API tokens.
///
/// With no tokens configured every caller is accepted.
pub struct AuthenticatedClient;

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedClient {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let accepted = &state.config.auth.api_tokens;
        if accepted.is_empty() {
            return Ok(AuthenticatedClient);
        }

        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        if !accepted.iter().any(|t| t == token) {
            return Err(AppError::Authentication("Invalid API token".to_string()));
        }

        Ok(AuthenticatedClient)
    }
}

/// `today` query parameter, or the current UTC date when absent
pub(crate) fn resolve_today(today: Option<&str>) -> AppResult<NaiveDate> {
    match today {
        Some(s) => Ok(parse_calendar_date("today", s)?),
        None => Ok(today_utc()),
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Equipment
        .route("/equipment", get(equipment::list_equipment))
        .route("/equipment/:id", get(equipment::get_equipment))
        .route("/equipment/:id/maintenance", get(equipment::get_equipment_maintenance))
        .route("/equipment/:id/schedules", get(equipment::list_schedules))
        .route("/equipment/:id/schedules", post(equipment::create_schedule))
        .route("/equipment/:id/events", get(equipment::list_events))
        .route("/equipment/:id/events", post(equipment::record_event))
        // Schedules
        .route("/schedules/:id", put(maintenance::update_schedule))
        .route("/schedules/:id", delete(maintenance::delete_schedule))
        // Maintenance status
        .route("/maintenance/status", get(maintenance::fleet_status))
        .route("/maintenance/alerts", get(maintenance::alerts))
        .route("/maintenance/next-due", post(maintenance::next_due))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
