//! Per-schedule evaluation and fleet-wide aggregation

use chrono::NaiveDate;

use super::{dates, due, EngineError};
use crate::models::maintenance::{
    DueStatus, EquipmentMaintenance, EquipmentStatus, EventRecord, FleetReport,
    MaintenanceEvent, MaintenanceSchedule, ScheduleRecord, ScheduleStatus,
};

/// Evaluate one schedule record against its equipment's event history.
///
/// Only events linked to this schedule move its due date. Malformed data
/// yields an `unknown` status carrying the error message instead of failing.
pub fn evaluate_schedule(
    record: &ScheduleRecord,
    events: &[EventRecord],
    today: NaiveDate,
    warning_window_days: u32,
) -> ScheduleStatus {
    match try_evaluate(record, events) {
        Ok(resolved) => {
            let status = due::classify_status(resolved.date, today, warning_window_days);
            let days_until_due = dates::days_between(today, resolved.date);
            ScheduleStatus {
                schedule_id: record.id,
                maintenance_type_id: record.maintenance_type_id,
                label: record.custom_label.clone(),
                status,
                next_due_date: Some(resolved.date),
                next_due_source: Some(resolved.source),
                days_until_due: Some(days_until_due),
                days_overdue: (-days_until_due).max(0),
                error: None,
            }
        }
        Err(e) => ScheduleStatus {
            schedule_id: record.id,
            maintenance_type_id: record.maintenance_type_id,
            label: record.custom_label.clone(),
            status: DueStatus::Unknown,
            next_due_date: None,
            next_due_source: None,
            days_until_due: None,
            days_overdue: 0,
            error: Some(e.to_string()),
        },
    }
}

fn try_evaluate(record: &ScheduleRecord, events: &[EventRecord]) -> Result<due::ResolvedDueDate, EngineError> {
    let schedule = MaintenanceSchedule::from_record(record)?;
    let events = events
        .iter()
        .filter(|e| e.schedule_id == Some(record.id))
        .map(MaintenanceEvent::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    due::resolve_next_due_date(&schedule, &events)
}

/// Reduce all schedules of one equipment to its most urgent status
pub fn evaluate_equipment(
    equipment: &EquipmentMaintenance,
    today: NaiveDate,
    warning_window_days: u32,
) -> EquipmentStatus {
    let schedules: Vec<ScheduleStatus> = equipment
        .schedules
        .iter()
        .map(|s| evaluate_schedule(s, &equipment.events, today, warning_window_days))
        .collect();

    let status = schedules
        .iter()
        .map(|s| s.status)
        .max()
        .unwrap_or(DueStatus::Ok);

    let causes = if status == DueStatus::Ok {
        Vec::new()
    } else {
        schedules.iter().filter(|s| s.status == status).cloned().collect()
    };

    EquipmentStatus {
        equipment_id: equipment.equipment_id,
        name: equipment.name.clone(),
        status,
        causes,
        schedules,
        error: None,
    }
}

/// Worst-case status for every equipment of the fleet.
///
/// An empty fleet yields an empty report. One equipment's bad data never
/// hides the status of the others.
pub fn aggregate_fleet_status(
    fleet: &[EquipmentMaintenance],
    today: NaiveDate,
    warning_window_days: u32,
) -> FleetReport {
    let mut report = FleetReport::empty(today, warning_window_days);
    for equipment in fleet {
        report.insert(evaluate_equipment(equipment, today, warning_window_days));
    }
    report
}
