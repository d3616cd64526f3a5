//! Next-due computation and urgency classification

use chrono::{Days, NaiveDate};

use super::{dates, EngineError};
use crate::models::maintenance::{
    DueStatus, MaintenanceEvent, MaintenanceSchedule, NextDueSource,
};

/// Default number of days ahead of a due date that counts as "due soon"
pub const DEFAULT_WARNING_WINDOW_DAYS: u32 = 7;

/// Next due date together with where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDueDate {
    pub date: NaiveDate,
    pub source: NextDueSource,
}

/// Most recent performed date known for a schedule.
///
/// Considers the events passed in and the schedule's own
/// `last_performed_date`.
pub fn last_performed(schedule: &MaintenanceSchedule, events: &[MaintenanceEvent]) -> Option<NaiveDate> {
    events
        .iter()
        .map(|e| e.performed_date)
        .chain(schedule.last_performed_date)
        .max()
}

/// Next due date derived from the interval.
///
/// `events` are all events of this schedule, in any order. The base date is
/// the latest performed date, or `start_date` when the maintenance has never
/// been performed.
pub fn compute_next_due_date(
    schedule: &MaintenanceSchedule,
    events: &[MaintenanceEvent],
) -> Result<NaiveDate, EngineError> {
    let base = last_performed(schedule, events).unwrap_or(schedule.start_date);
    dates::add_days(base, schedule.interval_days())
}

/// Merge the server-confirmed next date with the locally derived one.
///
/// The server value wins unless a maintenance was performed on or after it,
/// in which case it is stale and the derived date is used.
pub fn resolve_next_due_date(
    schedule: &MaintenanceSchedule,
    events: &[MaintenanceEvent],
) -> Result<ResolvedDueDate, EngineError> {
    let derived = compute_next_due_date(schedule, events)?;

    match schedule.confirmed_next_due_date {
        Some(confirmed)
            if last_performed(schedule, events).map_or(true, |last| last < confirmed) =>
        {
            Ok(ResolvedDueDate {
                date: confirmed,
                source: NextDueSource::Server,
            })
        }
        _ => Ok(ResolvedDueDate {
            date: derived,
            source: NextDueSource::Derived,
        }),
    }
}

/// Classify a due date relative to `today`.
///
/// `overdue` strictly before today, `due_soon` from today up to and
/// including `today + warning_window_days`, `ok` after that.
pub fn classify_status(next_due_date: NaiveDate, today: NaiveDate, warning_window_days: u32) -> DueStatus {
    if next_due_date < today {
        return DueStatus::Overdue;
    }
    match today.checked_add_days(Days::new(u64::from(warning_window_days))) {
        Some(horizon) if next_due_date > horizon => DueStatus::Ok,
        _ => DueStatus::DueSoon,
    }
}
