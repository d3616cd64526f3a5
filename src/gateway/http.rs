//! reqwest client for the remote inventory API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::MaintenanceGateway;
use crate::{
    config::GatewayConfig,
    error::{AppError, AppResult},
    models::{
        maintenance::{CreateEvent, CreateSchedule, UpdateSchedule},
        Equipment, EquipmentId, EventRecord, ScheduleId, ScheduleRecord,
    },
};

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("progresando-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Gateway {} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> AppResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::parse(response, what).await
    }

    /// Fetch a list and decode each element on its own. Elements without a
    /// usable identity are logged and left out instead of failing the list.
    async fn get_records<T: DeserializeOwned>(&self, path: &str, what: &str) -> AppResult<Vec<T>> {
        let values: Vec<serde_json::Value> = self.get_json(path, what).await?;
        let total = values.len();
        let records: Vec<T> = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping record {} of {}: {}", index, what, e);
                    None
                }
            })
            .collect();
        if records.len() < total {
            tracing::warn!("{} of {} records of {} were unreadable", total - records.len(), total, what);
        }
        Ok(records)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        what: &str,
    ) -> AppResult<T> {
        let response = self.request(method, path).json(body).send().await?;
        Self::parse(response, what).await
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
        let response = Self::check_status(response, what).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Gateway(format!("Invalid {} payload: {}", what, e)))
    }

    async fn check_status(response: Response, what: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Gateway returned {} for {}: {}", status, what, body);
        Err(match status {
            StatusCode::NOT_FOUND => AppError::NotFound(format!("{} not found", what)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::Gateway(format!("Gateway rejected credentials ({})", status))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::BadRequest(format!("Gateway rejected {}: {}", what, body))
            }
            StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => {
                AppError::GatewayTimeout(format!("{} ({})", what, status))
            }
            _ => AppError::Gateway(format!("Unexpected status {} for {}", status, what)),
        })
    }
}

#[async_trait]
impl MaintenanceGateway for HttpGateway {
    async fn ping(&self) -> AppResult<()> {
        let response = self.request(Method::GET, "/health").send().await?;
        Self::check_status(response, "health").await?;
        Ok(())
    }

    async fn list_equipment(&self) -> AppResult<Vec<Equipment>> {
        self.get_json("/equipos", "equipment list").await
    }

    async fn get_equipment(&self, id: EquipmentId) -> AppResult<Equipment> {
        self.get_json(&format!("/equipos/{}", id), &format!("Equipment {}", id))
            .await
    }

    async fn list_schedules(&self, equipment_id: EquipmentId) -> AppResult<Vec<ScheduleRecord>> {
        let mut schedules: Vec<ScheduleRecord> = self
            .get_records(
                &format!("/equipos/{}/mantenimientos", equipment_id),
                &format!("Schedules of equipment {}", equipment_id),
            )
            .await?;
        for schedule in &mut schedules {
            schedule.equipment_id = equipment_id;
        }
        Ok(schedules)
    }

    async fn create_schedule(
        &self,
        equipment_id: EquipmentId,
        data: &CreateSchedule,
    ) -> AppResult<ScheduleRecord> {
        self.send_json(
            Method::POST,
            &format!("/equipos/{}/mantenimientos", equipment_id),
            data,
            &format!("Equipment {}", equipment_id),
        )
        .await
    }

    async fn update_schedule(&self, id: ScheduleId, data: &UpdateSchedule) -> AppResult<ScheduleRecord> {
        self.send_json(
            Method::PUT,
            &format!("/mantenimientos/{}", id),
            data,
            &format!("Schedule {}", id),
        )
        .await
    }

    async fn delete_schedule(&self, id: ScheduleId) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/mantenimientos/{}", id))
            .send()
            .await?;
        Self::check_status(response, &format!("Schedule {}", id)).await?;
        Ok(())
    }

    async fn list_events(&self, equipment_id: EquipmentId) -> AppResult<Vec<EventRecord>> {
        let mut events: Vec<EventRecord> = self
            .get_records(
                &format!("/equipos/{}/eventos-mantenimiento", equipment_id),
                &format!("Events of equipment {}", equipment_id),
            )
            .await?;
        for event in &mut events {
            event.equipment_id = equipment_id;
        }
        Ok(events)
    }

    async fn create_event(&self, equipment_id: EquipmentId, data: &CreateEvent) -> AppResult<EventRecord> {
        self.send_json(
            Method::POST,
            &format!("/equipos/{}/eventos-mantenimiento", equipment_id),
            data,
            &format!("Equipment {}", equipment_id),
        )
        .await
    }
}
