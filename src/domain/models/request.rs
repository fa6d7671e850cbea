//! Blood request value objects.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::blood::{BloodGroup, UrgencyLevel};

/// A request for blood, as submitted by a patient or hospital contact.
///
/// Constructed by the request-submission flow and passed by value into the
/// matcher; never mutated by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub patient_name: String,
    pub blood_group: BloodGroup,
    pub country: String,
    pub city: String,
    pub urgency_level: UrgencyLevel,
    pub hospital_name: String,
    pub contact_number: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
}

/// Lifecycle state of a persisted blood request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

/// A blood request as stored by the persistence service.
///
/// The core only ever reads these (the pending-request re-check when a new
/// donor registers); inserts happen in the submission flow outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequestRecord {
    pub id: String,
    #[serde(flatten)]
    pub request: BloodRequest,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}
