//! Equipment model (owned by the remote API, referenced here)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EquipmentId;

/// Equipment record as returned by the remote API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: EquipmentId,
    /// Equipment name / description
    #[serde(alias = "nombre")]
    pub name: String,
    /// Serial number or inventory code
    #[serde(default, alias = "codigo")]
    pub serial: Option<String>,
    /// Site (sede)
    #[serde(default, alias = "sede")]
    pub site: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    /// Workstation (puesto)
    #[serde(default, alias = "puesto")]
    pub workstation: Option<String>,
    /// Inactive equipment is skipped by fleet alerts
    #[serde(default, alias = "activo")]
    pub active: Option<bool>,
}

impl Equipment {
    /// Equipment without an explicit flag is considered active
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}
