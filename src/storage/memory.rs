//! # In-Memory Storage
//!
//! In-memory implementations of the storage traits. These exist to show
//! that the domain layer is storage-agnostic and to back the test suite
//! and demo deployments; production wires the traits to the hosted record
//! store instead.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::models::blood::BloodGroup;
use crate::domain::models::donor::Donor;
use crate::domain::models::notification::NotificationLog;
use crate::domain::models::request::{BloodRequestRecord, RequestStatus};
use crate::storage::traits::{BloodRequestStore, DonorStore, NotificationLogStore};

/// Donor collection held in memory.
#[derive(Default)]
pub struct InMemoryDonorStore {
    donors: Mutex<Vec<Donor>>,
}

impl InMemoryDonorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_donor(&self, donor: Donor) {
        self.donors.lock().unwrap().push(donor);
    }
}

#[async_trait]
impl DonorStore for InMemoryDonorStore {
    async fn find_available_donors(
        &self,
        groups: &[BloodGroup],
        country: &str,
        city_contains: Option<&str>,
    ) -> Result<Vec<Donor>> {
        let city_needle = city_contains.map(|c| c.to_lowercase());
        let donors = self.donors.lock().unwrap();
        Ok(donors
            .iter()
            .filter(|d| d.is_available)
            .filter(|d| groups.contains(&d.blood_group))
            .filter(|d| d.country == country)
            .filter(|d| match &city_needle {
                Some(needle) => d.city.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn list_available_donors(&self) -> Result<Vec<Donor>> {
        let donors = self.donors.lock().unwrap();
        Ok(donors.iter().filter(|d| d.is_available).cloned().collect())
    }
}

/// Blood request collection held in memory.
#[derive(Default)]
pub struct InMemoryRequestStore {
    requests: Mutex<Vec<BloodRequestRecord>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&self, record: BloodRequestRecord) {
        self.requests.lock().unwrap().push(record);
    }
}

#[async_trait]
impl BloodRequestStore for InMemoryRequestStore {
    async fn find_pending_requests(
        &self,
        country: &str,
        blood_group: BloodGroup,
    ) -> Result<Vec<BloodRequestRecord>> {
        let requests = self.requests.lock().unwrap();
        let mut matching: Vec<BloodRequestRecord> = requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .filter(|r| r.request.country == country)
            .filter(|r| r.request.blood_group == blood_group)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}

/// Default bound on the in-memory notification log, matching the reference
/// deployment's "keep the last 100 entries" behavior.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Bounded, append-only notification log held in memory.
pub struct InMemoryNotificationLog {
    capacity: usize,
    logs: Mutex<Vec<NotificationLog>>,
}

impl InMemoryNotificationLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            logs: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationLogStore for InMemoryNotificationLog {
    async fn append(&self, log: NotificationLog) -> Result<()> {
        let mut logs = self.logs.lock().unwrap();
        logs.push(log);
        // Drop the oldest entries once over capacity.
        if logs.len() > self.capacity {
            let excess = logs.len() - self.capacity;
            logs.drain(..excess);
        }
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<NotificationLog>> {
        let logs = self.logs.lock().unwrap();
        Ok(logs.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::notification::{
        DeliveryStatus, NotificationPayload, NotificationType,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn dummy_log() -> NotificationLog {
        NotificationLog {
            id: Uuid::new_v4(),
            notification_type: NotificationType::DonationReminder,
            recipient_email: None,
            recipient_phone: Some("+33100000000".to_string()),
            channels_used: vec!["sms".to_string()],
            status: DeliveryStatus::Sent,
            sent_at: Some(Utc::now()),
            error_message: None,
            payload: NotificationPayload::default(),
        }
    }

    #[tokio::test]
    async fn log_store_returns_newest_first() {
        let store = InMemoryNotificationLog::new();
        let first = dummy_log();
        let second = dummy_log();
        store.append(first.clone()).await.unwrap();
        store.append(second.clone()).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second.id);
        assert_eq!(recent[1].id, first.id);
    }

    #[tokio::test]
    async fn log_store_is_bounded() {
        let store = InMemoryNotificationLog::with_capacity(3);
        let mut ids = Vec::new();
        for _ in 0..5 {
            let log = dummy_log();
            ids.push(log.id);
            store.append(log).await.unwrap();
        }

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 3);
        // Oldest two entries were evicted.
        assert_eq!(recent[0].id, ids[4]);
        assert_eq!(recent[2].id, ids[2]);
    }
}
