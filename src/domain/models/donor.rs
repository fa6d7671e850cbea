//! Donor records and the scored form produced by a match run.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::blood::BloodGroup;

/// A registered donor, as read from the persistence service.
///
/// Donors are created by the registration flow outside this core and are
/// read-only here; eligibility is derived per match run, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: String,
    pub full_name: String,
    pub phone_number: String,
    pub country: String,
    pub city: String,
    pub blood_group: BloodGroup,
    pub last_donation_date: Option<NaiveDate>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

/// A donor scored against a specific blood request.
///
/// Derived fresh on every match run and never persisted. Only donors whose
/// `days_since_last_donation` is `None` or at least 90 survive the matcher's
/// eligibility filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingDonor {
    pub id: String,
    pub full_name: String,
    pub phone_number: String,
    pub blood_group: BloodGroup,
    pub country: String,
    pub city: String,
    pub last_donation_date: Option<NaiveDate>,
    /// `None` means the donor has never donated.
    pub days_since_last_donation: Option<i64>,
    pub compatibility_score: i32,
    pub urgency_priority: i32,
}

/// Whether a donor may donate right now, with a displayable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationEligibility {
    pub eligible: bool,
    pub message: String,
}
