//! Maintenance models (schedules, events, derived due status)
//!
//! Records arrive from the remote API loosely typed (`*Record`) and are
//! validated into `MaintenanceSchedule` / `MaintenanceEvent` before any date
//! arithmetic happens.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{EquipmentId, ScheduleId};
use crate::engine::{dates::parse_calendar_date, EngineError};

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// Maintenance schedule as stored by the remote API.
///
/// Only `id` is strictly typed. Every other field is read leniently so one
/// sloppy value fails that schedule's evaluation, not the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    #[serde(default, alias = "equipmentId", alias = "equipo_id", deserialize_with = "lenient::int")]
    pub equipment_id: EquipmentId,
    #[serde(
        default,
        alias = "maintenanceTypeId",
        alias = "tipo_mantenimiento_id",
        deserialize_with = "lenient::int"
    )]
    pub maintenance_type_id: i64,
    #[serde(default, alias = "customLabel", deserialize_with = "lenient::opt_text")]
    pub custom_label: Option<String>,
    /// Days between two maintenances
    #[serde(default, alias = "intervalDays", alias = "intervalo_dias", deserialize_with = "lenient::opt_int")]
    pub interval_days: Option<i64>,
    /// First due base date (YYYY-MM-DD)
    #[serde(default, alias = "startDate", alias = "fecha_inicio", deserialize_with = "lenient::text")]
    pub start_date: String,
    /// Last time the maintenance was performed (YYYY-MM-DD)
    #[serde(default, alias = "lastPerformedDate", alias = "ultima_fecha", deserialize_with = "lenient::opt_text")]
    pub last_performed_date: Option<String>,
    /// Next due date confirmed by the remote API (YYYY-MM-DD)
    #[serde(default, alias = "nextDueDate", alias = "proxima_fecha", deserialize_with = "lenient::opt_text")]
    pub next_due_date: Option<String>,
}

/// Maintenance event as stored by the remote API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i64>,
    #[serde(default, alias = "equipmentId", alias = "equipo_id", deserialize_with = "lenient::int")]
    pub equipment_id: EquipmentId,
    #[serde(default, alias = "scheduleId", alias = "mantenimiento_id", deserialize_with = "lenient::opt_int")]
    pub schedule_id: Option<ScheduleId>,
    /// Date the maintenance was performed (YYYY-MM-DD)
    #[serde(default, alias = "performedDate", alias = "fecha_realizado", deserialize_with = "lenient::text")]
    pub performed_date: String,
    #[serde(default, alias = "performedBy", alias = "realizado_por", deserialize_with = "lenient::text")]
    pub performed_by: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
}

/// Field readers that never reject a value, leaving validation to
/// `MaintenanceSchedule::from_record` / `MaintenanceEvent::from_record`
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text_of(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Any value as text; null becomes an empty string
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(text_of(Value::deserialize(deserializer)?))
    }

    /// Integer or integer-looking string, `None` for anything else
    pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(opt_int(deserializer)?.unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Validated records
// ---------------------------------------------------------------------------

/// A configured recurring maintenance for one piece of equipment.
///
/// `interval_days` is at least 1; construction through [`MaintenanceSchedule::new`]
/// or [`MaintenanceSchedule::from_record`] is the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceSchedule {
    pub id: Option<ScheduleId>,
    pub equipment_id: EquipmentId,
    pub maintenance_type_id: i64,
    pub custom_label: Option<String>,
    interval_days: u32,
    pub start_date: NaiveDate,
    pub last_performed_date: Option<NaiveDate>,
    pub confirmed_next_due_date: Option<NaiveDate>,
}

impl MaintenanceSchedule {
    pub fn new(
        equipment_id: EquipmentId,
        maintenance_type_id: i64,
        interval_days: i64,
        start_date: NaiveDate,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            id: None,
            equipment_id,
            maintenance_type_id,
            custom_label: None,
            interval_days: check_interval(None, interval_days)?,
            start_date,
            last_performed_date: None,
            confirmed_next_due_date: None,
        })
    }

    pub fn from_record(record: &ScheduleRecord) -> Result<Self, EngineError> {
        let interval_days = match record.interval_days {
            Some(days) => check_interval(Some(record.id), days)?,
            None => {
                return Err(EngineError::InvalidSchedule {
                    schedule_id: Some(record.id),
                    reason: "interval_days is missing or not a whole number".to_string(),
                })
            }
        };
        let start_date = parse_calendar_date("start_date", &record.start_date)?;
        let last_performed_date = record
            .last_performed_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_calendar_date("last_performed_date", s))
            .transpose()?;
        let confirmed_next_due_date = record
            .next_due_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_calendar_date("next_due_date", s))
            .transpose()?;

        Ok(Self {
            id: Some(record.id),
            equipment_id: record.equipment_id,
            maintenance_type_id: record.maintenance_type_id,
            custom_label: record.custom_label.clone(),
            interval_days,
            start_date,
            last_performed_date,
            confirmed_next_due_date,
        })
    }

    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    pub fn with_last_performed(mut self, date: NaiveDate) -> Self {
        self.last_performed_date = Some(date);
        self
    }

    pub fn with_confirmed_next_due(mut self, date: NaiveDate) -> Self {
        self.confirmed_next_due_date = Some(date);
        self
    }
}

fn check_interval(schedule_id: Option<ScheduleId>, interval_days: i64) -> Result<u32, EngineError> {
    if interval_days < 1 {
        return Err(EngineError::InvalidSchedule {
            schedule_id,
            reason: format!("interval_days must be at least 1, got {}", interval_days),
        });
    }
    u32::try_from(interval_days).map_err(|_| EngineError::InvalidSchedule {
        schedule_id,
        reason: format!("interval_days out of range: {}", interval_days),
    })
}

/// A maintenance that actually happened. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceEvent {
    pub equipment_id: EquipmentId,
    pub schedule_id: Option<ScheduleId>,
    pub performed_date: NaiveDate,
    pub performed_by: String,
}

impl MaintenanceEvent {
    pub fn from_record(record: &EventRecord) -> Result<Self, EngineError> {
        Ok(Self {
            equipment_id: record.equipment_id,
            schedule_id: record.schedule_id,
            performed_date: parse_calendar_date("performed_date", &record.performed_date)?,
            performed_by: record.performed_by.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Derived status
// ---------------------------------------------------------------------------

/// Urgency of a schedule or an equipment at a given date.
///
/// Variants are declared in increasing urgency so `Ord` picks the worst case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Ok,
    /// The schedule data could not be evaluated
    Unknown,
    DueSoon,
    Overdue,
}

impl DueStatus {
    pub fn is_alert(self) -> bool {
        matches!(self, DueStatus::DueSoon | DueStatus::Overdue)
    }
}

/// Where a next due date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextDueSource {
    /// Confirmed by the remote API
    Server,
    /// Computed from the interval and the last performed date
    Derived,
}

/// Status of a single schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleStatus {
    pub schedule_id: ScheduleId,
    pub maintenance_type_id: i64,
    pub label: Option<String>,
    pub status: DueStatus,
    pub next_due_date: Option<NaiveDate>,
    pub next_due_source: Option<NextDueSource>,
    /// Negative when overdue
    pub days_until_due: Option<i64>,
    pub days_overdue: i64,
    /// Set when status is `unknown`
    pub error: Option<String>,
}

/// Worst-case status of one equipment plus the schedules causing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EquipmentStatus {
    pub equipment_id: EquipmentId,
    pub name: Option<String>,
    pub status: DueStatus,
    /// Schedules whose status equals `status` (empty when `ok`)
    pub causes: Vec<ScheduleStatus>,
    pub schedules: Vec<ScheduleStatus>,
    /// Set when the equipment data could not be loaded at all
    pub error: Option<String>,
}

impl EquipmentStatus {
    /// Status for an equipment whose schedules or events could not be fetched
    pub fn unavailable(
        equipment_id: EquipmentId,
        name: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            equipment_id,
            name,
            status: DueStatus::Unknown,
            causes: Vec::new(),
            schedules: Vec::new(),
            error: Some(reason.into()),
        }
    }
}

/// Input of the fleet aggregation: one equipment with its raw records
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EquipmentMaintenance {
    pub equipment_id: EquipmentId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schedules: Vec<ScheduleRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// Per-status equipment counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FleetSummary {
    pub ok: usize,
    pub due_soon: usize,
    pub overdue: usize,
    pub unknown: usize,
}

impl FleetSummary {
    pub fn record(&mut self, status: DueStatus) {
        match status {
            DueStatus::Ok => self.ok += 1,
            DueStatus::DueSoon => self.due_soon += 1,
            DueStatus::Overdue => self.overdue += 1,
            DueStatus::Unknown => self.unknown += 1,
        }
    }
}

/// Fleet-wide maintenance status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FleetReport {
    /// Date the statuses were computed for
    pub today: NaiveDate,
    pub warning_window_days: u32,
    /// Equipment statuses keyed by equipment ID, in input order
    #[schema(value_type = Object)]
    pub equipment: IndexMap<EquipmentId, EquipmentStatus>,
    pub summary: FleetSummary,
}

impl FleetReport {
    pub fn empty(today: NaiveDate, warning_window_days: u32) -> Self {
        Self {
            today,
            warning_window_days,
            equipment: IndexMap::new(),
            summary: FleetSummary::default(),
        }
    }

    pub fn insert(&mut self, status: EquipmentStatus) {
        // Re-inserting an ID replaces its previous contribution to the summary
        if let Some(previous) = self.equipment.shift_remove(&status.equipment_id) {
            match previous.status {
                DueStatus::Ok => self.summary.ok -= 1,
                DueStatus::DueSoon => self.summary.due_soon -= 1,
                DueStatus::Overdue => self.summary.overdue -= 1,
                DueStatus::Unknown => self.summary.unknown -= 1,
            }
        }
        self.summary.record(status.status);
        self.equipment.insert(status.equipment_id, status);
    }

    /// Equipment in `overdue` or `due_soon`, most urgent first
    pub fn alerts(&self) -> Vec<&EquipmentStatus> {
        let mut alerts: Vec<&EquipmentStatus> = self
            .equipment
            .values()
            .filter(|e| e.status.is_alert())
            .collect();
        // Stable sort keeps input order within a status
        alerts.sort_by(|a, b| b.status.cmp(&a.status));
        alerts
    }

    pub fn badge_count(&self) -> usize {
        self.summary.overdue + self.summary.due_soon
    }

    /// Whether a recurring alert check still has something to report
    pub fn needs_attention(&self) -> bool {
        self.badge_count() > 0 || self.summary.unknown > 0
    }

    pub fn overdue_ids(&self) -> impl Iterator<Item = EquipmentId> + '_ {
        self.equipment
            .values()
            .filter(|e| e.status == DueStatus::Overdue)
            .map(|e| e.equipment_id)
    }
}

/// Alert list for the front end badge and notification poller
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertSummary {
    pub today: NaiveDate,
    /// Equipment in `overdue` or `due_soon`, most urgent first
    pub alerts: Vec<EquipmentStatus>,
    pub badge_count: usize,
    /// Whether the recurring alert check should keep firing
    pub keep_polling: bool,
}

impl From<&FleetReport> for AlertSummary {
    fn from(report: &FleetReport) -> Self {
        Self {
            today: report.today,
            alerts: report.alerts().into_iter().cloned().collect(),
            badge_count: report.badge_count(),
            keep_polling: report.needs_attention(),
        }
    }
}

/// Result of a stateless next-due evaluation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextDueResponse {
    pub next_due_date: NaiveDate,
    pub source: NextDueSource,
    pub status: DueStatus,
    pub days_until_due: i64,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Create schedule request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSchedule {
    pub maintenance_type_id: i64,
    #[validate(length(max = 120, message = "Label must be at most 120 characters"))]
    pub custom_label: Option<String>,
    /// Days between two maintenances, at least 1
    pub interval_days: i64,
    /// Start date (YYYY-MM-DD)
    pub start_date: String,
}

/// Update schedule request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSchedule {
    pub maintenance_type_id: Option<i64>,
    #[validate(length(max = 120, message = "Label must be at most 120 characters"))]
    pub custom_label: Option<String>,
    /// Days between two maintenances, at least 1
    pub interval_days: Option<i64>,
    /// Start date (YYYY-MM-DD)
    pub start_date: Option<String>,
}

/// Record a performed maintenance
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    pub schedule_id: Option<ScheduleId>,
    /// Date performed (YYYY-MM-DD)
    pub performed_date: String,
    #[validate(length(min = 1, message = "performed_by is required"))]
    pub performed_by: String,
    pub notes: Option<String>,
}

/// Stateless next-due evaluation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NextDueRequest {
    pub schedule: ScheduleRecord,
    #[serde(default)]
    pub events: Vec<EventRecord>,
    /// Evaluation date (YYYY-MM-DD), defaults to the current UTC date
    pub today: Option<String>,
    pub warning_window_days: Option<u32>,
}

/// Query parameters for status endpoints
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct StatusQuery {
    /// Evaluation date (YYYY-MM-DD), defaults to the current UTC date
    pub today: Option<String>,
    /// Override of the configured warning window
    pub warning_window_days: Option<u32>,
}
