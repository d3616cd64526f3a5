//! Data models for Progresando

pub mod equipment;
pub mod maintenance;

/// Opaque equipment key as issued by the remote API
pub type EquipmentId = i64;

/// Maintenance schedule key as issued by the remote API
pub type ScheduleId = i64;

// Re-export commonly used types
pub use equipment::Equipment;
pub use maintenance::{
    DueStatus, EquipmentMaintenance, EquipmentStatus, EventRecord, FleetReport,
    MaintenanceEvent, MaintenanceSchedule, ScheduleRecord, ScheduleStatus,
};
