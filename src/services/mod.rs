//! Business logic services

pub mod alerts;
pub mod email;
pub mod equipment;
pub mod maintenance;

use std::sync::Arc;

use crate::{
    config::{EmailConfig, MaintenanceConfig},
    gateway::MaintenanceGateway,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services on top of the given gateway
    pub fn new(
        gateway: Arc<dyn MaintenanceGateway>,
        maintenance_config: &MaintenanceConfig,
        email_config: EmailConfig,
    ) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(gateway.clone()),
            maintenance: maintenance::MaintenanceService::new(gateway, maintenance_config),
            email: email::EmailService::new(email_config),
        }
    }
}
