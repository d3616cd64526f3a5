//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        maintenance::{CreateEvent, CreateSchedule, StatusQuery},
        Equipment, EquipmentId, EquipmentStatus, EventRecord, ScheduleRecord,
    },
};

use super::{resolve_today, AuthenticatedClient};

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(equipment))
}

/// Maintenance status of one equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID"), StatusQuery),
    responses(
        (status = 200, description = "Worst-case status and per-schedule detail", body = EquipmentStatus)
    )
)]
pub async fn get_equipment_maintenance(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<EquipmentStatus>> {
    let today = resolve_today(query.today.as_deref())?;
    let status = state
        .services
        .maintenance
        .equipment_status(id, today, query.warning_window_days)
        .await?;
    Ok(Json(status))
}

/// List maintenance schedules of an equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/schedules",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Schedules", body = Vec<ScheduleRecord>)
    )
)]
pub async fn list_schedules(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
) -> AppResult<Json<Vec<ScheduleRecord>>> {
    let schedules = state.services.maintenance.list_schedules(id).await?;
    Ok(Json(schedules))
}

/// Configure a maintenance schedule
#[utoipa::path(
    post,
    path = "/equipment/{id}/schedules",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = CreateSchedule,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleRecord),
        (status = 422, description = "Invalid interval or date", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_schedule(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
    Json(data): Json<CreateSchedule>,
) -> AppResult<(StatusCode, Json<ScheduleRecord>)> {
    data.validate()?;
    let schedule = state.services.maintenance.create_schedule(id, &data).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

/// Maintenance history of an equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/events",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Performed maintenances", body = Vec<EventRecord>)
    )
)]
pub async fn list_events(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
) -> AppResult<Json<Vec<EventRecord>>> {
    let events = state.services.maintenance.list_events(id).await?;
    Ok(Json(events))
}

/// Record a performed maintenance
#[utoipa::path(
    post,
    path = "/equipment/{id}/events",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Maintenance recorded", body = EventRecord)
    )
)]
pub async fn record_event(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<EquipmentId>,
    Json(data): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<EventRecord>)> {
    data.validate()?;
    let today = resolve_today(None)?;
    let event = state.services.maintenance.record_event(id, &data, today).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
