//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, maintenance};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "IPS Progresando Maintenance API",
        version = "0.1.0",
        description = "Equipment maintenance scheduling, status and alerts"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::get_equipment_maintenance,
        equipment::list_schedules,
        equipment::create_schedule,
        equipment::list_events,
        equipment::record_event,
        // Maintenance
        maintenance::fleet_status,
        maintenance::alerts,
        maintenance::next_due,
        maintenance::update_schedule,
        maintenance::delete_schedule,
    ),
    components(
        schemas(
            // Equipment
            crate::models::equipment::Equipment,
            // Maintenance
            crate::models::maintenance::ScheduleRecord,
            crate::models::maintenance::EventRecord,
            crate::models::maintenance::CreateSchedule,
            crate::models::maintenance::UpdateSchedule,
            crate::models::maintenance::CreateEvent,
            crate::models::maintenance::DueStatus,
            crate::models::maintenance::NextDueSource,
            crate::models::maintenance::ScheduleStatus,
            crate::models::maintenance::EquipmentStatus,
            crate::models::maintenance::FleetSummary,
            crate::models::maintenance::FleetReport,
            crate::models::maintenance::AlertSummary,
            crate::models::maintenance::NextDueRequest,
            crate::models::maintenance::NextDueResponse,
            crate::models::maintenance::StatusQuery,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Equipment, schedules and maintenance history"),
        (name = "maintenance", description = "Due dates, fleet status and alerts")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
