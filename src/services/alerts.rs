//! Recurring overdue-maintenance check with one-shot notifications

use std::{collections::HashSet, time::Duration};

use chrono::NaiveDate;
use tokio::{sync::Mutex, task::JoinHandle};

use super::{email::EmailService, maintenance::MaintenanceService};
use crate::{
    engine::dates::today_utc,
    error::AppResult,
    models::{DueStatus, EquipmentId, EquipmentStatus, FleetReport},
};

/// Remembers which equipment was already notified as overdue.
///
/// An equipment is notified once when it enters `overdue` and forgotten
/// only once it is known to be `ok` or `due_soon`, so a relapse notifies
/// again. An `unknown` status or a missing entry keeps it remembered.
#[derive(Debug, Default)]
pub struct AlertTracker {
    notified: HashSet<EquipmentId>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equipment overdue in `report` that has not been notified yet
    pub fn newly_overdue(&mut self, report: &FleetReport) -> Vec<EquipmentId> {
        self.notified.retain(|id| {
            !matches!(
                report.equipment.get(id).map(|e| e.status),
                Some(DueStatus::Ok | DueStatus::DueSoon)
            )
        });

        report
            .overdue_ids()
            .filter(|id| self.notified.insert(*id))
            .collect()
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }
}

pub struct AlertMonitor {
    maintenance: MaintenanceService,
    email: EmailService,
    interval: Duration,
    tracker: Mutex<AlertTracker>,
}

impl AlertMonitor {
    pub fn new(maintenance: MaintenanceService, email: EmailService, interval: Duration) -> Self {
        Self {
            maintenance,
            email,
            interval,
            tracker: Mutex::new(AlertTracker::new()),
        }
    }

    /// Run one check for `today` and notify newly overdue equipment.
    /// Returns the notified equipment.
    pub async fn check_once(&self, today: NaiveDate) -> AppResult<Vec<EquipmentStatus>> {
        let report = self.maintenance.fleet_status(today, None).await?;

        let fresh = self.tracker.lock().await.newly_overdue(&report);
        if fresh.is_empty() {
            tracing::debug!("No newly overdue equipment");
            return Ok(Vec::new());
        }

        let statuses: Vec<EquipmentStatus> = fresh
            .iter()
            .filter_map(|id| report.equipment.get(id).cloned())
            .collect();
        tracing::info!("{} equipment newly overdue: {:?}", statuses.len(), fresh);

        if let Err(e) = self.email.send_overdue_alert(&statuses).await {
            // Allow a retry on the next tick
            tracing::error!("Failed to send overdue notification: {}", e);
            let mut tracker = self.tracker.lock().await;
            for id in &fresh {
                tracker.notified.remove(id);
            }
            return Err(e);
        }

        Ok(statuses)
    }

    /// Start the recurring check in the background
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Alert monitor started, checking every {:?}", self.interval);
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.check_once(today_utc()).await {
                    tracing::warn!("Alert check failed: {}", e);
                }
            }
        })
    }
}
