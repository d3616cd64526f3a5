//! Fleet maintenance status, alerts and schedule endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    engine::dates::today_utc,
    error::AppResult,
    models::{
        maintenance::{
            AlertSummary, NextDueRequest, NextDueResponse, StatusQuery, UpdateSchedule,
        },
        FleetReport, ScheduleId, ScheduleRecord,
    },
};

use super::{resolve_today, AuthenticatedClient};

/// Worst-case maintenance status for every active equipment
#[utoipa::path(
    get,
    path = "/maintenance/status",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(StatusQuery),
    responses(
        (status = 200, description = "Fleet status", body = FleetReport)
    )
)]
pub async fn fleet_status(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<FleetReport>> {
    let today = resolve_today(query.today.as_deref())?;
    let report = state
        .services
        .maintenance
        .fleet_status(today, query.warning_window_days)
        .await?;
    Ok(Json(report))
}

/// Alert list, badge count and whether the front end should keep polling
#[utoipa::path(
    get,
    path = "/maintenance/alerts",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(StatusQuery),
    responses(
        (status = 200, description = "Active alerts", body = AlertSummary)
    )
)]
pub async fn alerts(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<AlertSummary>> {
    let today = resolve_today(query.today.as_deref())?;
    let report = state
        .services
        .maintenance
        .fleet_status(today, query.warning_window_days)
        .await?;
    Ok(Json(AlertSummary::from(&report)))
}

/// Compute the next due date of a posted schedule
#[utoipa::path(
    post,
    path = "/maintenance/next-due",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = NextDueRequest,
    responses(
        (status = 200, description = "Next due date and status", body = NextDueResponse),
        (status = 422, description = "Invalid schedule or date", body = crate::error::ErrorResponse)
    )
)]
pub async fn next_due(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Json(request): Json<NextDueRequest>,
) -> AppResult<Json<NextDueResponse>> {
    let response = state.services.maintenance.next_due(&request, today_utc())?;
    Ok(Json(response))
}

/// Update a maintenance schedule
#[utoipa::path(
    put,
    path = "/schedules/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = UpdateSchedule,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleRecord),
        (status = 422, description = "Invalid interval or date", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_schedule(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<ScheduleId>,
    Json(data): Json<UpdateSchedule>,
) -> AppResult<Json<ScheduleRecord>> {
    data.validate()?;
    let schedule = state.services.maintenance.update_schedule(id, &data).await?;
    Ok(Json(schedule))
}

/// Remove a maintenance schedule
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Schedule deleted")
    )
)]
pub async fn delete_schedule(
    State(state): State<crate::AppState>,
    _client: AuthenticatedClient,
    Path(id): Path<ScheduleId>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete_schedule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
