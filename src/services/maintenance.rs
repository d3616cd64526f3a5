//! Maintenance service: loads schedules and events from the gateway and runs
//! the date engine over them

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    config::MaintenanceConfig,
    engine::{self, dates::parse_calendar_date},
    error::{AppError, AppResult},
    gateway::MaintenanceGateway,
    models::{
        maintenance::{
            CreateEvent, CreateSchedule, EquipmentMaintenance, EquipmentStatus, FleetReport,
            MaintenanceEvent, MaintenanceSchedule, NextDueRequest, NextDueResponse,
            UpdateSchedule,
        },
        Equipment, EquipmentId, EventRecord, ScheduleId, ScheduleRecord,
    },
};

#[derive(Clone)]
pub struct MaintenanceService {
    gateway: Arc<dyn MaintenanceGateway>,
    warning_window_days: u32,
}

impl MaintenanceService {
    pub fn new(gateway: Arc<dyn MaintenanceGateway>, config: &MaintenanceConfig) -> Self {
        Self {
            gateway,
            warning_window_days: config.warning_window_days,
        }
    }

    pub fn warning_window_days(&self) -> u32 {
        self.warning_window_days
    }

    fn window(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.warning_window_days)
    }

    /// Fetch schedules and events of one equipment concurrently
    async fn load(
        gateway: &dyn MaintenanceGateway,
        equipment_id: EquipmentId,
        name: Option<String>,
    ) -> AppResult<EquipmentMaintenance> {
        let (schedules, events) = tokio::try_join!(
            gateway.list_schedules(equipment_id),
            gateway.list_events(equipment_id),
        )?;
        Ok(EquipmentMaintenance {
            equipment_id,
            name,
            schedules,
            events,
        })
    }

    /// Status of a single equipment
    pub async fn equipment_status(
        &self,
        equipment_id: EquipmentId,
        today: NaiveDate,
        warning_window_days: Option<u32>,
    ) -> AppResult<EquipmentStatus> {
        let equipment = self.gateway.get_equipment(equipment_id).await?;
        let loaded = Self::load(self.gateway.as_ref(), equipment_id, Some(equipment.name)).await?;
        let status = engine::evaluate_equipment(&loaded, today, self.window(warning_window_days));
        log_unknown(&status);
        Ok(status)
    }

    /// Status of every active equipment.
    ///
    /// Each equipment is loaded in its own task; one that fails to load is
    /// reported as `unknown` without holding up the others.
    pub async fn fleet_status(
        &self,
        today: NaiveDate,
        warning_window_days: Option<u32>,
    ) -> AppResult<FleetReport> {
        let equipment: Vec<Equipment> = self
            .gateway
            .list_equipment()
            .await?
            .into_iter()
            .filter(Equipment::is_active)
            .collect();

        tracing::debug!("Loading maintenance data for {} equipment", equipment.len());

        let handles: Vec<_> = equipment
            .into_iter()
            .map(|e| {
                let gateway = Arc::clone(&self.gateway);
                let (id, name) = (e.id, e.name.clone());
                let handle = tokio::spawn(async move { Self::load(gateway.as_ref(), e.id, Some(e.name)).await });
                (id, name, handle)
            })
            .collect();

        // One slot per equipment, in listing order; `None` means loaded
        let mut loaded = Vec::with_capacity(handles.len());
        let mut slots: Vec<(EquipmentId, Option<EquipmentStatus>)> = Vec::with_capacity(handles.len());
        for (id, name, handle) in handles {
            match handle.await {
                Ok(Ok(data)) => {
                    loaded.push(data);
                    slots.push((id, None));
                }
                Ok(Err(e)) => {
                    tracing::warn!("Maintenance data for equipment {} unavailable: {}", id, e);
                    slots.push((id, Some(EquipmentStatus::unavailable(id, Some(name), e.to_string()))));
                }
                Err(e) => {
                    tracing::error!("Loading task for equipment {} failed: {}", id, e);
                    slots.push((id, Some(EquipmentStatus::unavailable(id, Some(name), "loading task failed"))));
                }
            }
        }

        let window = self.window(warning_window_days);
        let mut evaluated = engine::aggregate_fleet_status(&loaded, today, window);
        let mut report = FleetReport::empty(today, window);
        for (id, unavailable) in slots {
            if let Some(status) = unavailable.or_else(|| evaluated.equipment.shift_remove(&id)) {
                report.insert(status);
            }
        }
        for status in report.equipment.values() {
            log_unknown(status);
        }

        tracing::info!(
            "Fleet status for {}: {} overdue, {} due soon, {} unknown, {} ok",
            today,
            report.summary.overdue,
            report.summary.due_soon,
            report.summary.unknown,
            report.summary.ok
        );

        Ok(report)
    }

    /// Evaluate a schedule posted by the caller, without touching the gateway.
    ///
    /// Unlike fleet evaluation, invalid input is an error here.
    pub fn next_due(&self, request: &NextDueRequest, default_today: NaiveDate) -> AppResult<NextDueResponse> {
        let schedule = MaintenanceSchedule::from_record(&request.schedule)?;
        let events = request
            .events
            .iter()
            .filter(|e| e.schedule_id.map_or(true, |id| id == request.schedule.id))
            .map(MaintenanceEvent::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let today = match &request.today {
            Some(s) => parse_calendar_date("today", s)?,
            None => default_today,
        };

        let resolved = engine::resolve_next_due_date(&schedule, &events)?;
        Ok(NextDueResponse {
            next_due_date: resolved.date,
            source: resolved.source,
            status: engine::classify_status(resolved.date, today, self.window(request.warning_window_days)),
            days_until_due: engine::dates::days_between(today, resolved.date),
        })
    }

    // ---- Schedules ----

    pub async fn list_schedules(&self, equipment_id: EquipmentId) -> AppResult<Vec<ScheduleRecord>> {
        self.gateway.list_schedules(equipment_id).await
    }

    pub async fn create_schedule(
        &self,
        equipment_id: EquipmentId,
        data: &CreateSchedule,
    ) -> AppResult<ScheduleRecord> {
        check_interval(data.interval_days)?;
        parse_calendar_date("start_date", &data.start_date)?;
        let created = self.gateway.create_schedule(equipment_id, data).await?;
        tracing::info!(
            "Created maintenance schedule {} for equipment {} (every {} days)",
            created.id,
            equipment_id,
            data.interval_days
        );
        Ok(created)
    }

    pub async fn update_schedule(&self, id: ScheduleId, data: &UpdateSchedule) -> AppResult<ScheduleRecord> {
        if let Some(interval_days) = data.interval_days {
            check_interval(interval_days)?;
        }
        if let Some(ref start_date) = data.start_date {
            parse_calendar_date("start_date", start_date)?;
        }
        self.gateway.update_schedule(id, data).await
    }

    pub async fn delete_schedule(&self, id: ScheduleId) -> AppResult<()> {
        self.gateway.delete_schedule(id).await?;
        tracing::info!("Deleted maintenance schedule {}", id);
        Ok(())
    }

    // ---- Events ----

    pub async fn list_events(&self, equipment_id: EquipmentId) -> AppResult<Vec<EventRecord>> {
        self.gateway.list_events(equipment_id).await
    }

    /// Record that a maintenance was performed
    pub async fn record_event(
        &self,
        equipment_id: EquipmentId,
        data: &CreateEvent,
        today: NaiveDate,
    ) -> AppResult<EventRecord> {
        let performed = parse_calendar_date("performed_date", &data.performed_date)?;
        if performed > today {
            return Err(AppError::Validation(format!(
                "performed_date {} is in the future",
                performed
            )));
        }
        let event = self.gateway.create_event(equipment_id, data).await?;
        tracing::info!(
            "Recorded maintenance for equipment {} on {} by {}",
            equipment_id,
            performed,
            data.performed_by
        );
        Ok(event)
    }
}

fn check_interval(interval_days: i64) -> AppResult<()> {
    if interval_days < 1 {
        return Err(engine::EngineError::InvalidSchedule {
            schedule_id: None,
            reason: format!("interval_days must be at least 1, got {}", interval_days),
        }
        .into());
    }
    Ok(())
}

fn log_unknown(status: &EquipmentStatus) {
    for schedule in status.schedules.iter().filter(|s| s.error.is_some()) {
        tracing::warn!(
            "Schedule {} of equipment {} has unknown status: {}",
            schedule.schedule_id,
            status.equipment_id,
            schedule.error.as_deref().unwrap_or_default()
        );
    }
}
