//! Equipment service

use std::sync::Arc;

use crate::{
    error::AppResult,
    gateway::MaintenanceGateway,
    models::{Equipment, EquipmentId},
};

#[derive(Clone)]
pub struct EquipmentService {
    gateway: Arc<dyn MaintenanceGateway>,
}

impl EquipmentService {
    pub fn new(gateway: Arc<dyn MaintenanceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.gateway.list_equipment().await
    }

    pub async fn get_by_id(&self, id: EquipmentId) -> AppResult<Equipment> {
        self.gateway.get_equipment(id).await
    }

    /// Whether the remote API answers
    pub async fn gateway_ready(&self) -> bool {
        match self.gateway.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Gateway not ready: {}", e);
                false
            }
        }
    }
}
