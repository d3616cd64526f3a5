//! Maintenance Date Engine
//!
//! Pure, synchronous computation of next-due maintenance dates and urgency
//! classification. Nothing here performs I/O, reads the clock (callers pass
//! `today`) or mutates its inputs.

pub mod dates;
pub mod due;
pub mod fleet;

use thiserror::Error;

use crate::models::ScheduleId;

pub use due::{
    classify_status, compute_next_due_date, resolve_next_due_date, ResolvedDueDate,
    DEFAULT_WARNING_WINDOW_DAYS,
};
pub use fleet::{aggregate_fleet_status, evaluate_equipment, evaluate_schedule};

/// Errors raised while validating or evaluating maintenance data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        schedule_id: Option<ScheduleId>,
        reason: String,
    },

    #[error("Invalid date in {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },
}
