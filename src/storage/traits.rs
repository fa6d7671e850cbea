//! # Storage Traits
//!
//! This module defines the persistence seams the domain layer depends on.
//! The surrounding application backs them with the hosted record store; the
//! bundled in-memory implementations back them for tests and demos. The
//! domain layer works against these traits only and never against a
//! concrete storage technology.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::blood::BloodGroup;
use crate::domain::models::donor::Donor;
use crate::domain::models::notification::NotificationLog;
use crate::domain::models::request::BloodRequestRecord;

/// Read access to the `donors` collection.
#[async_trait]
pub trait DonorStore: Send + Sync {
    /// Find available donors whose blood group is in `groups` and whose
    /// country matches exactly.
    ///
    /// When `city_contains` is given, the donor's city must contain it
    /// case-insensitively (substring, not exact — the city tier of the
    /// matcher deliberately tolerates "Paris" vs "Paris 11e").
    /// Unavailable donors are never returned.
    async fn find_available_donors(
        &self,
        groups: &[BloodGroup],
        country: &str,
        city_contains: Option<&str>,
    ) -> Result<Vec<Donor>>;

    /// All available donors, for the eligibility-reminder sweep.
    async fn list_available_donors(&self) -> Result<Vec<Donor>>;
}

/// Read access to the `blood_requests` collection.
#[async_trait]
pub trait BloodRequestStore: Send + Sync {
    /// Pending requests in a country for an exact blood group, most recent
    /// first. Used for the reverse-direction match when a donor registers.
    async fn find_pending_requests(
        &self,
        country: &str,
        blood_group: BloodGroup,
    ) -> Result<Vec<BloodRequestRecord>>;
}

/// Append-only store for notification delivery logs.
///
/// The contract is append plus bounded recent-read; implementations may
/// back it with a database table, a file, or an in-memory ring buffer.
#[async_trait]
pub trait NotificationLogStore: Send + Sync {
    /// Append one log entry. Entries are never updated after creation.
    async fn append(&self, log: NotificationLog) -> Result<()>;

    /// The most recent `limit` entries, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<NotificationLog>>;
}
