//! Remote Data Gateway: the inventory REST API that owns every record.
//!
//! Services depend on the [`MaintenanceGateway`] trait; [`HttpGateway`] is the
//! reqwest implementation used in production.

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        maintenance::{CreateEvent, CreateSchedule, UpdateSchedule},
        Equipment, EquipmentId, EventRecord, ScheduleId, ScheduleRecord,
    },
};

pub use http::HttpGateway;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceGateway: Send + Sync {
    /// Readiness probe
    async fn ping(&self) -> AppResult<()>;

    async fn list_equipment(&self) -> AppResult<Vec<Equipment>>;

    async fn get_equipment(&self, id: EquipmentId) -> AppResult<Equipment>;

    async fn list_schedules(&self, equipment_id: EquipmentId) -> AppResult<Vec<ScheduleRecord>>;

    async fn create_schedule(
        &self,
        equipment_id: EquipmentId,
        data: &CreateSchedule,
    ) -> AppResult<ScheduleRecord>;

    async fn update_schedule(&self, id: ScheduleId, data: &UpdateSchedule) -> AppResult<ScheduleRecord>;

    async fn delete_schedule(&self, id: ScheduleId) -> AppResult<()>;

    async fn list_events(&self, equipment_id: EquipmentId) -> AppResult<Vec<EventRecord>>;

    async fn create_event(&self, equipment_id: EquipmentId, data: &CreateEvent) -> AppResult<EventRecord>;
}
