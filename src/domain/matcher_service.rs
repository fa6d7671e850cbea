//! Donor matching service for the BloodLink core.
//!
//! Runs the two-tier geographic search (same city, then same country)
//! against the donor store, scores every candidate against the request,
//! filters out donors inside the 90-day donation interval, and returns a
//! ranked, capped list.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::models::blood::compatible_donor_groups_for;
use crate::domain::models::donor::{DonationEligibility, Donor, MatchingDonor};
use crate::domain::models::request::BloodRequest;
use crate::storage::traits::DonorStore;

/// Minimum days a donor must wait between donations.
pub const MIN_DONATION_INTERVAL_DAYS: i64 = 90;

/// Days stood in for "never donated" when ranking by rest time. A donor who
/// has never donated is treated as the most rested candidate.
const NEVER_DONATED_RANK_DAYS: i64 = 365;

/// Result-list caps per geographic tier. These track what the surrounding
/// UI displays, so they are configuration rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    pub city_tier_cap: usize,
    pub country_tier_cap: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            city_tier_cap: 5,
            country_tier_cap: 10,
        }
    }
}

/// Score a single donor against a request, as of a given date.
///
/// Pure: no side effects, always returns a value for well-formed inputs.
/// Base compatibility is 3 for an exact group match, 2 for the universal
/// donor, 1 otherwise; same country adds 1 and same city (case-insensitive)
/// adds another 2. Urgency priority comes from the request, not the donor.
pub fn score_donor(donor: &Donor, request: &BloodRequest, as_of: NaiveDate) -> MatchingDonor {
    let days_since_last_donation = donor
        .last_donation_date
        .map(|last| as_of.signed_duration_since(last).num_days());

    let mut compatibility_score = if donor.blood_group == request.blood_group {
        3
    } else if donor.blood_group.is_universal_donor() {
        2
    } else {
        1
    };

    if donor.country == request.country {
        compatibility_score += 1;
    }
    if donor.city.to_lowercase() == request.city.to_lowercase() {
        compatibility_score += 2;
    }

    MatchingDonor {
        id: donor.id.clone(),
        full_name: donor.full_name.clone(),
        phone_number: donor.phone_number.clone(),
        blood_group: donor.blood_group,
        country: donor.country.clone(),
        city: donor.city.clone(),
        last_donation_date: donor.last_donation_date,
        days_since_last_donation,
        compatibility_score,
        urgency_priority: request.urgency_level.priority(),
    }
}

/// Donation eligibility under the 90-day interval rule, with a displayable
/// explanation. First-time donors are always eligible.
pub fn donation_eligibility(days_since_last_donation: Option<i64>) -> DonationEligibility {
    match days_since_last_donation {
        None => DonationEligibility {
            eligible: true,
            message: "First-time donor - eligible".to_string(),
        },
        Some(days) if days >= MIN_DONATION_INTERVAL_DAYS => DonationEligibility {
            eligible: true,
            message: format!("Eligible ({days} days since last donation)"),
        },
        Some(days) => DonationEligibility {
            eligible: false,
            message: format!(
                "Not eligible (needs {} more days)",
                MIN_DONATION_INTERVAL_DAYS - days
            ),
        },
    }
}

/// One-line donor summary for display and operator logs.
pub fn format_donor_info(donor: &MatchingDonor) -> String {
    let donation_status = match donor.days_since_last_donation {
        Some(days) => format!("Last donated {days} days ago"),
        None => "First-time donor".to_string(),
    };
    format!(
        "{} ({}) - {}, {} - {} - {}",
        donor.full_name, donor.blood_group, donor.city, donor.country, donor.phone_number,
        donation_status
    )
}

/// Service running the tiered donor search against the persistence seam.
#[derive(Clone)]
pub struct DonorMatcherService {
    donor_store: Arc<dyn DonorStore>,
    config: MatcherConfig,
}

impl DonorMatcherService {
    pub fn new(donor_store: Arc<dyn DonorStore>) -> Self {
        Self::with_config(donor_store, MatcherConfig::default())
    }

    pub fn with_config(donor_store: Arc<dyn DonorStore>, config: MatcherConfig) -> Self {
        Self {
            donor_store,
            config,
        }
    }

    /// Find and rank donors for a blood request.
    ///
    /// Tier 1 searches the request's city (substring, case-insensitive)
    /// within the country; if that yields nothing, Tier 2 widens to the
    /// whole country. An empty result is a valid outcome, not an error;
    /// store failures propagate to the caller.
    pub async fn find_matching_donors(&self, request: &BloodRequest) -> Result<Vec<MatchingDonor>> {
        info!(
            "🔍 Searching donors for {} in {}, {} (urgency: {})",
            request.blood_group, request.city, request.country, request.urgency_level
        );

        let compatible_groups = compatible_donor_groups_for(request.blood_group);
        debug!("🩸 Compatible donor groups: {:?}", compatible_groups);

        let city_donors = self
            .donor_store
            .find_available_donors(&compatible_groups, &request.country, Some(&request.city))
            .await
            .context("Failed to query city-tier donors")?;

        let (candidates, cap) = if city_donors.is_empty() {
            debug!(
                "No donors in {}, widening search to country {}",
                request.city, request.country
            );
            let country_donors = self
                .donor_store
                .find_available_donors(&compatible_groups, &request.country, None)
                .await
                .context("Failed to query country-tier donors")?;

            if country_donors.is_empty() {
                info!("⚠️ No matching donors found in {}", request.country);
                return Ok(Vec::new());
            }
            (country_donors, self.config.country_tier_cap)
        } else {
            (city_donors, self.config.city_tier_cap)
        };

        let ranked = rank_candidates(candidates, request, cap, Utc::now().date_naive());
        info!("🎯 {} donors ranked for {}", ranked.len(), request.patient_name);
        Ok(ranked)
    }
}

/// Score, filter by the donation interval, sort, and truncate.
fn rank_candidates(
    candidates: Vec<Donor>,
    request: &BloodRequest,
    cap: usize,
    as_of: NaiveDate,
) -> Vec<MatchingDonor> {
    let mut scored: Vec<MatchingDonor> = candidates
        .iter()
        .map(|donor| score_donor(donor, request, as_of))
        .filter(|scored| match scored.days_since_last_donation {
            Some(days) => days >= MIN_DONATION_INTERVAL_DAYS,
            None => true,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.urgency_priority
            .cmp(&a.urgency_priority)
            .then_with(|| b.compatibility_score.cmp(&a.compatibility_score))
            .then_with(|| {
                // Prefer the most rested donor; never-donated ranks as 365.
                let a_days = a.days_since_last_donation.unwrap_or(NEVER_DONATED_RANK_DAYS);
                let b_days = b.days_since_last_donation.unwrap_or(NEVER_DONATED_RANK_DAYS);
                b_days.cmp(&a_days)
            })
    });

    scored.truncate(cap);
    scored
}
