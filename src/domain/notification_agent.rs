//! Notification trigger agent.
//!
//! Reacts to domain events by driving the matcher and the dispatcher in the
//! right order: confirmation first, then matching, then donor fan-out. Each
//! trigger is handled in isolation; a failure inside one handler is logged
//! and never poisons unrelated triggers.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::domain::content::render_donor_alert;
use crate::domain::matcher_service::{DonorMatcherService, MIN_DONATION_INTERVAL_DAYS};
use crate::domain::models::blood::UrgencyLevel;
use crate::domain::models::donor::Donor;
use crate::domain::models::notification::{
    Appointment, NotificationChannels, NotificationEvent, NotificationPayload, NotificationType,
    PartnershipInquiry, Recipient, Volunteer,
};
use crate::domain::models::request::BloodRequest;
use crate::domain::notification_service::{
    AppointmentReminderData, BloodRequestConfirmationData, DonationReminderData, DonorMatchData,
    NotificationService,
};
use crate::storage::traits::{BloodRequestStore, DonorStore};

/// At most this many matched donors are alerted per submitted request.
const MAX_DONOR_ALERTS: usize = 5;

/// At most this many recent pending requests are surfaced to a new donor.
const MAX_PENDING_REQUEST_ALERTS: usize = 3;

/// Registration age, in days, at which a never-donated donor gets their
/// first donation nudge.
const FIRST_REMINDER_AFTER_DAYS: i64 = 30;

/// A domain event the agent reacts to.
#[derive(Debug, Clone)]
pub enum NotificationTrigger {
    BloodRequestSubmitted(BloodRequest),
    DonorRegistered(Donor),
    DonationDue {
        donor: Donor,
        days_since_last_donation: Option<i64>,
    },
    AppointmentScheduled(Appointment),
    VolunteerRegistered(Volunteer),
    PartnershipInquiry(PartnershipInquiry),
}

impl NotificationTrigger {
    fn kind(&self) -> &'static str {
        match self {
            NotificationTrigger::BloodRequestSubmitted(_) => "blood_request_submitted",
            NotificationTrigger::DonorRegistered(_) => "donor_registered",
            NotificationTrigger::DonationDue { .. } => "donation_due",
            NotificationTrigger::AppointmentScheduled(_) => "appointment_scheduled",
            NotificationTrigger::VolunteerRegistered(_) => "volunteer_registered",
            NotificationTrigger::PartnershipInquiry(_) => "partnership_inquiry",
        }
    }
}

/// Orchestrates matcher and dispatcher calls per trigger.
#[derive(Clone)]
pub struct NotificationAgent {
    matcher: DonorMatcherService,
    notifier: NotificationService,
    donor_store: Arc<dyn DonorStore>,
    request_store: Arc<dyn BloodRequestStore>,
}

impl NotificationAgent {
    pub fn new(
        matcher: DonorMatcherService,
        notifier: NotificationService,
        donor_store: Arc<dyn DonorStore>,
        request_store: Arc<dyn BloodRequestStore>,
    ) -> Self {
        Self {
            matcher,
            notifier,
            donor_store,
            request_store,
        }
    }

    /// Process one trigger. Handler failures are logged at the trigger
    /// boundary and not returned, so independent triggers stay isolated.
    pub async fn process_trigger(&self, trigger: NotificationTrigger) -> Result<()> {
        let kind = trigger.kind();
        info!("🔔 Processing notification trigger: {kind}");

        let outcome = match trigger {
            NotificationTrigger::BloodRequestSubmitted(request) => {
                self.handle_blood_request_submitted(request).await
            }
            NotificationTrigger::DonorRegistered(donor) => {
                self.handle_donor_registered(donor).await
            }
            NotificationTrigger::DonationDue {
                donor,
                days_since_last_donation,
            } => {
                self.handle_donation_due(donor, days_since_last_donation)
                    .await
            }
            NotificationTrigger::AppointmentScheduled(appointment) => {
                self.handle_appointment_scheduled(appointment).await
            }
            NotificationTrigger::VolunteerRegistered(volunteer) => {
                self.handle_volunteer_registered(volunteer).await
            }
            NotificationTrigger::PartnershipInquiry(inquiry) => {
                self.handle_partnership_inquiry(inquiry).await
            }
        };

        if let Err(err) = outcome {
            error!("❌ Error processing {kind} trigger: {err:#}");
        }
        Ok(())
    }

    /// Confirmation to the requester, then matching, then donor fan-out.
    async fn handle_blood_request_submitted(&self, request: BloodRequest) -> Result<()> {
        self.notifier
            .send_blood_request_confirmation(
                Recipient::with_phone(&request.patient_name, &request.contact_number),
                BloodRequestConfirmationData {
                    blood_group: request.blood_group,
                    patient_name: request.patient_name.clone(),
                    hospital_name: request.hospital_name.clone(),
                    city: request.city.clone(),
                    country: request.country.clone(),
                },
            )
            .await?;

        let matches = self
            .matcher
            .find_matching_donors(&request)
            .await
            .context("Donor matching failed for submitted request")?;

        if matches.is_empty() {
            info!(
                "No donors matched yet for {}; the request stays pending",
                request.patient_name
            );
            return Ok(());
        }

        self.notifier
            .send_donor_match_notification(
                Recipient::with_phone(&request.patient_name, &request.contact_number),
                DonorMatchData {
                    blood_group: request.blood_group,
                    donor_count: matches.len(),
                    city: request.city.clone(),
                    country: request.country.clone(),
                },
            )
            .await?;

        // Donor alerts are independent; fire them together, order is not
        // significant.
        let alerts = matches.iter().take(MAX_DONOR_ALERTS).map(|donor| {
            self.notify_donor_about_request(&donor.full_name, &donor.phone_number, &request)
        });
        join_all(alerts).await;
        Ok(())
    }

    /// Welcome the new donor, then re-check pending requests they could
    /// serve (reverse-direction matching).
    async fn handle_donor_registered(&self, donor: Donor) -> Result<()> {
        let welcome = NotificationEvent {
            // The welcome rides the confirmation template, with no
            // request-specific fields set.
            notification_type: NotificationType::BloodRequestConfirmation,
            recipient: Recipient::with_phone(&donor.full_name, &donor.phone_number),
            payload: NotificationPayload {
                blood_group: Some(donor.blood_group),
                city: Some(donor.city.clone()),
                country: Some(donor.country.clone()),
                ..Default::default()
            },
            urgency: UrgencyLevel::Low,
            channels: NotificationChannels::sms_only(),
        };
        if let Err(err) = self.notifier.send_notification(welcome).await {
            error!("❌ Failed to welcome donor {}: {err:#}", donor.full_name);
        }

        let pending = self
            .request_store
            .find_pending_requests(&donor.country, donor.blood_group)
            .await
            .context("Failed to fetch pending requests for new donor")?;

        if pending.is_empty() {
            return Ok(());
        }
        debug!(
            "🔍 Found {} pending requests matching new donor {}",
            pending.len(),
            donor.full_name
        );

        for record in pending.iter().take(MAX_PENDING_REQUEST_ALERTS) {
            if record.request.urgency_level == UrgencyLevel::High {
                self.notify_donor_about_request(
                    &donor.full_name,
                    &donor.phone_number,
                    &record.request,
                )
                .await;
            }
        }
        Ok(())
    }

    async fn handle_donation_due(
        &self,
        donor: Donor,
        days_since_last_donation: Option<i64>,
    ) -> Result<()> {
        let eligible = match days_since_last_donation {
            Some(days) => days >= MIN_DONATION_INTERVAL_DAYS,
            None => true,
        };
        if !eligible {
            debug!(
                "Donor {} is not yet eligible, skipping reminder",
                donor.full_name
            );
            return Ok(());
        }

        self.notifier
            .send_donation_reminder(
                Recipient::with_phone(&donor.full_name, &donor.phone_number),
                DonationReminderData {
                    blood_group: donor.blood_group,
                    days_since_last_donation: days_since_last_donation.unwrap_or(365),
                },
            )
            .await?;
        info!("✅ Sent donation reminder to {}", donor.full_name);
        Ok(())
    }

    async fn handle_appointment_scheduled(&self, appointment: Appointment) -> Result<()> {
        self.notifier
            .send_appointment_reminder(
                Recipient {
                    name: appointment.donor_name.clone(),
                    email: appointment.donor_email.clone(),
                    phone: appointment.donor_phone.clone(),
                },
                AppointmentReminderData {
                    appointment_date: appointment.appointment_date,
                    appointment_time: appointment.appointment_time,
                    hospital_name: appointment.hospital_name,
                    city: appointment.city,
                },
            )
            .await?;
        info!("✅ Sent appointment reminder to {}", appointment.donor_name);
        Ok(())
    }

    async fn handle_volunteer_registered(&self, volunteer: Volunteer) -> Result<()> {
        self.notifier
            .send_notification(NotificationEvent {
                notification_type: NotificationType::VolunteerWelcome,
                recipient: Recipient::with_email(&volunteer.name, &volunteer.email),
                payload: NotificationPayload {
                    name: Some(volunteer.name.clone()),
                    region: Some(volunteer.region),
                    motivation: volunteer.motivation,
                    ..Default::default()
                },
                urgency: UrgencyLevel::Low,
                channels: NotificationChannels::email_only(),
            })
            .await?;
        info!("✅ Sent welcome message to new volunteer {}", volunteer.name);
        Ok(())
    }

    async fn handle_partnership_inquiry(&self, inquiry: PartnershipInquiry) -> Result<()> {
        self.notifier
            .send_notification(NotificationEvent {
                notification_type: NotificationType::PartnershipConfirmation,
                recipient: Recipient::with_email(&inquiry.contact_name, &inquiry.email),
                payload: NotificationPayload {
                    organization_name: Some(inquiry.organization_name.clone()),
                    contact_name: Some(inquiry.contact_name),
                    organization_type: Some(inquiry.organization_type),
                    message: inquiry.message,
                    ..Default::default()
                },
                urgency: UrgencyLevel::Medium,
                channels: NotificationChannels::email_only(),
            })
            .await?;
        info!(
            "✅ Sent partnership confirmation to {}",
            inquiry.organization_name
        );
        Ok(())
    }

    /// Alert one donor about a request over SMS and WhatsApp. Failures are
    /// logged here so one unreachable donor never blocks the fan-out.
    async fn notify_donor_about_request(
        &self,
        donor_name: &str,
        donor_phone: &str,
        request: &BloodRequest,
    ) {
        let mut payload = NotificationPayload {
            blood_group: Some(request.blood_group),
            patient_name: Some(request.patient_name.clone()),
            hospital_name: Some(request.hospital_name.clone()),
            city: Some(request.city.clone()),
            country: Some(request.country.clone()),
            contact_number: Some(request.contact_number.clone()),
            urgency_level: Some(request.urgency_level),
            ..Default::default()
        };
        payload.message = Some(render_donor_alert(&payload, request.urgency_level));

        let event = NotificationEvent {
            notification_type: NotificationType::DonorMatchFound,
            recipient: Recipient::with_phone(donor_name, donor_phone),
            payload,
            urgency: request.urgency_level,
            channels: NotificationChannels {
                email: false,
                sms: true,
                whatsapp: true,
            },
        };

        match self.notifier.send_notification(event).await {
            Ok(true) => info!("✅ Notified donor {donor_name} about blood request"),
            Ok(false) => warn!("⚠️ Could not reach donor {donor_name} on any channel"),
            Err(err) => error!("❌ Failed to notify donor {donor_name}: {err:#}"),
        }
    }

    /// Batch sweep firing `donation_due` for every available donor whose
    /// last donation was exactly 90 days ago, or who registered exactly 30
    /// days ago without donating. Meant to run once per day; re-running the
    /// same day re-notifies.
    pub async fn schedule_eligibility_reminders(&self) -> Result<usize> {
        info!("🔄 Checking for donors eligible for donation reminders");

        let donors = self
            .donor_store
            .list_available_donors()
            .await
            .context("Failed to list donors for the eligibility sweep")?;

        let today = Utc::now().date_naive();
        let mut reminders_sent = 0;

        for donor in donors {
            let due = match donor.last_donation_date {
                Some(last) => {
                    let days = today.signed_duration_since(last).num_days();
                    (days == MIN_DONATION_INTERVAL_DAYS).then_some(Some(days))
                }
                None => {
                    let registered_days = today
                        .signed_duration_since(donor.created_at.date_naive())
                        .num_days();
                    (registered_days == FIRST_REMINDER_AFTER_DAYS).then_some(None)
                }
            };

            if let Some(days_since_last_donation) = due {
                self.process_trigger(NotificationTrigger::DonationDue {
                    donor,
                    days_since_last_donation,
                })
                .await?;
                reminders_sent += 1;
            }
        }

        info!("✅ Sent {reminders_sent} donation reminders");
        Ok(reminders_sent)
    }

    /// Alert every matched donor about a critical request, forcing high
    /// urgency. Returns how many donors were alerted.
    pub async fn send_emergency_alert(&self, request: &BloodRequest) -> Result<usize> {
        info!("🚨 Sending emergency blood alert for {}", request.patient_name);

        let mut urgent = request.clone();
        urgent.urgency_level = UrgencyLevel::High;

        let matches = self
            .matcher
            .find_matching_donors(&urgent)
            .await
            .context("Donor matching failed for emergency alert")?;

        let alerts = matches.iter().map(|donor| {
            self.notify_donor_about_request(&donor.full_name, &donor.phone_number, &urgent)
        });
        join_all(alerts).await;

        info!("🚨 Sent emergency alerts to {} donors", matches.len());
        Ok(matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ChannelKind, RenderedContent};
    use crate::domain::models::blood::BloodGroup;
    use crate::domain::models::request::{BloodRequestRecord, RequestStatus};
    use crate::domain::notification_service::test_support::RecordingChannel;
    use crate::storage::memory::{InMemoryDonorStore, InMemoryNotificationLog, InMemoryRequestStore};
    use crate::storage::traits::NotificationLogStore;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveTime};

    struct Harness {
        agent: NotificationAgent,
        donors: Arc<InMemoryDonorStore>,
        requests: Arc<InMemoryRequestStore>,
        email: Arc<RecordingChannel>,
        sms: Arc<RecordingChannel>,
        whatsapp: Arc<RecordingChannel>,
        logs: Arc<InMemoryNotificationLog>,
    }

    fn harness() -> Harness {
        let _ = env_logger::builder().is_test(true).try_init();

        let donors = Arc::new(InMemoryDonorStore::new());
        let requests = Arc::new(InMemoryRequestStore::new());
        let email = Arc::new(RecordingChannel::new(ChannelKind::Email));
        let sms = Arc::new(RecordingChannel::new(ChannelKind::Sms));
        let whatsapp = Arc::new(RecordingChannel::new(ChannelKind::WhatsApp));
        let logs = Arc::new(InMemoryNotificationLog::new());

        let matcher = DonorMatcherService::new(donors.clone());
        let notifier = NotificationService::new(
            email.clone(),
            sms.clone(),
            whatsapp.clone(),
            logs.clone(),
        );
        let agent = NotificationAgent::new(matcher, notifier, donors.clone(), requests.clone());

        Harness {
            agent,
            donors,
            requests,
            email,
            sms,
            whatsapp,
            logs,
        }
    }

    fn test_request(blood_group: BloodGroup, urgency: UrgencyLevel) -> BloodRequest {
        BloodRequest {
            patient_name: "Marie Curie".to_string(),
            blood_group,
            country: "FR".to_string(),
            city: "Paris".to_string(),
            urgency_level: urgency,
            hospital_name: "Hopital Saint-Louis".to_string(),
            contact_number: "+33123456789".to_string(),
            preferred_date: Utc::now().date_naive(),
            preferred_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }
    }

    fn test_donor(id: &str, blood_group: BloodGroup, city: &str, days_ago: Option<i64>) -> Donor {
        Donor {
            id: id.to_string(),
            full_name: format!("Donor {id}"),
            phone_number: "+33600000000".to_string(),
            country: "FR".to_string(),
            city: city.to_string(),
            blood_group,
            last_donation_date: days_ago.map(|d| Utc::now().date_naive() - Duration::days(d)),
            is_available: true,
            created_at: Utc::now(),
        }
    }

    fn pending_record(id: &str, urgency: UrgencyLevel, hours_ago: i64) -> BloodRequestRecord {
        BloodRequestRecord {
            id: id.to_string(),
            request: test_request(BloodGroup::APositive, urgency),
            status: RequestStatus::Pending,
            created_at: Utc::now() - Duration::hours(hours_ago),
        }
    }

    #[tokio::test]
    async fn request_submission_confirms_then_notifies_everyone() {
        let h = harness();
        h.donors.add_donor(test_donor("d1", BloodGroup::APositive, "Paris", None));
        h.donors.add_donor(test_donor("d2", BloodGroup::APositive, "Paris", Some(100)));

        h.agent
            .process_trigger(NotificationTrigger::BloodRequestSubmitted(test_request(
                BloodGroup::APositive,
                UrgencyLevel::High,
            )))
            .await
            .unwrap();

        // SMS: confirmation + match-count + two donor alerts.
        assert_eq!(h.sms.delivery_count(), 4);
        // WhatsApp: match-count + two donor alerts.
        assert_eq!(h.whatsapp.delivery_count(), 3);
        // Requester has no email address.
        assert_eq!(h.email.delivery_count(), 0);
        assert_eq!(h.logs.recent(10).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn donor_alerts_carry_the_urgency_marker() {
        let h = harness();
        h.donors.add_donor(test_donor("d1", BloodGroup::APositive, "Paris", None));

        h.agent
            .process_trigger(NotificationTrigger::BloodRequestSubmitted(test_request(
                BloodGroup::APositive,
                UrgencyLevel::High,
            )))
            .await
            .unwrap();

        let deliveries = h.whatsapp.deliveries.lock().unwrap();
        let (_, content) = deliveries.last().unwrap();
        match content {
            RenderedContent::Text(text) => {
                assert!(text.starts_with("🚨"));
                assert!(text.contains("URGENT"));
                assert!(text.contains("Hopital Saint-Louis"));
            }
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn donor_fan_out_stops_at_five() {
        let h = harness();
        for i in 0..8 {
            h.donors
                .add_donor(test_donor(&format!("d{i}"), BloodGroup::APositive, "Paris", None));
        }

        h.agent
            .process_trigger(NotificationTrigger::BloodRequestSubmitted(test_request(
                BloodGroup::APositive,
                UrgencyLevel::Medium,
            )))
            .await
            .unwrap();

        // Confirmation + match-count + five donor alerts.
        assert_eq!(h.sms.delivery_count(), 7);
    }

    #[tokio::test]
    async fn no_matches_means_confirmation_only() {
        let h = harness();

        h.agent
            .process_trigger(NotificationTrigger::BloodRequestSubmitted(test_request(
                BloodGroup::AbNegative,
                UrgencyLevel::High,
            )))
            .await
            .unwrap();

        assert_eq!(h.sms.delivery_count(), 1);
        assert_eq!(h.whatsapp.delivery_count(), 0);
        assert_eq!(h.logs.recent(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn new_donor_is_welcomed_and_told_about_urgent_pending_requests() {
        let h = harness();
        h.requests.add_request(pending_record("r-high", UrgencyLevel::High, 1));
        h.requests.add_request(pending_record("r-low", UrgencyLevel::Low, 2));

        h.agent
            .process_trigger(NotificationTrigger::DonorRegistered(test_donor(
                "new",
                BloodGroup::APositive,
                "Paris",
                None,
            )))
            .await
            .unwrap();

        // Welcome SMS plus one alert for the high-urgency request only.
        assert_eq!(h.sms.delivery_count(), 2);
        assert_eq!(h.whatsapp.delivery_count(), 1);
    }

    #[tokio::test]
    async fn pending_request_recheck_considers_three_most_recent() {
        let h = harness();
        for i in 0..5 {
            h.requests
                .add_request(pending_record(&format!("r{i}"), UrgencyLevel::High, i));
        }

        h.agent
            .process_trigger(NotificationTrigger::DonorRegistered(test_donor(
                "new",
                BloodGroup::APositive,
                "Paris",
                None,
            )))
            .await
            .unwrap();

        // Welcome plus three alerts.
        assert_eq!(h.sms.delivery_count(), 4);
        assert_eq!(h.whatsapp.delivery_count(), 3);
    }

    #[tokio::test]
    async fn pending_requests_for_other_groups_are_ignored() {
        let h = harness();
        h.requests.add_request(pending_record("r1", UrgencyLevel::High, 1));

        h.agent
            .process_trigger(NotificationTrigger::DonorRegistered(test_donor(
                "new",
                BloodGroup::BNegative,
                "Paris",
                None,
            )))
            .await
            .unwrap();

        // Welcome only; the A+ request is not an exact group match.
        assert_eq!(h.sms.delivery_count(), 1);
        assert_eq!(h.whatsapp.delivery_count(), 0);
    }

    #[tokio::test]
    async fn donation_due_respects_the_interval() {
        let h = harness();

        h.agent
            .process_trigger(NotificationTrigger::DonationDue {
                donor: test_donor("early", BloodGroup::APositive, "Paris", Some(45)),
                days_since_last_donation: Some(45),
            })
            .await
            .unwrap();
        assert_eq!(h.sms.delivery_count(), 0);

        h.agent
            .process_trigger(NotificationTrigger::DonationDue {
                donor: test_donor("due", BloodGroup::APositive, "Paris", Some(90)),
                days_since_last_donation: Some(90),
            })
            .await
            .unwrap();
        assert_eq!(h.sms.delivery_count(), 1);
    }

    #[tokio::test]
    async fn appointment_reminder_reaches_all_channels() {
        let h = harness();

        h.agent
            .process_trigger(NotificationTrigger::AppointmentScheduled(Appointment {
                donor_name: "Jean Dupont".to_string(),
                donor_email: Some("jean@example.org".to_string()),
                donor_phone: Some("+33600000000".to_string()),
                appointment_date: "2026-09-15".to_string(),
                appointment_time: "10:00".to_string(),
                hospital_name: "Hopital Saint-Louis".to_string(),
                city: "Paris".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(h.email.delivery_count(), 1);
        assert_eq!(h.sms.delivery_count(), 1);
        assert_eq!(h.whatsapp.delivery_count(), 1);
    }

    #[tokio::test]
    async fn volunteer_and_partnership_triggers_are_email_only() {
        let h = harness();

        h.agent
            .process_trigger(NotificationTrigger::VolunteerRegistered(Volunteer {
                name: "Ada".to_string(),
                email: "ada@example.org".to_string(),
                region: "Ile-de-France".to_string(),
                motivation: Some("Lost a friend to blood shortage".to_string()),
            }))
            .await
            .unwrap();

        h.agent
            .process_trigger(NotificationTrigger::PartnershipInquiry(PartnershipInquiry {
                organization_name: "Red Drop NGO".to_string(),
                contact_name: "Grace".to_string(),
                email: "grace@reddrop.org".to_string(),
                organization_type: "NGO".to_string(),
                message: None,
            }))
            .await
            .unwrap();

        assert_eq!(h.email.delivery_count(), 2);
        assert_eq!(h.sms.delivery_count(), 0);
        assert_eq!(h.whatsapp.delivery_count(), 0);
    }

    #[tokio::test]
    async fn eligibility_sweep_fires_only_on_exact_boundaries() {
        let h = harness();
        h.donors.add_donor(test_donor("at-90", BloodGroup::APositive, "Paris", Some(90)));
        h.donors.add_donor(test_donor("at-91", BloodGroup::APositive, "Paris", Some(91)));
        h.donors.add_donor(test_donor("at-10", BloodGroup::APositive, "Paris", Some(10)));

        let mut fresh = test_donor("registered-30d", BloodGroup::OPositive, "Lyon", None);
        fresh.created_at = Utc::now() - Duration::days(30);
        h.donors.add_donor(fresh);

        let mut newer = test_donor("registered-10d", BloodGroup::OPositive, "Lyon", None);
        newer.created_at = Utc::now() - Duration::days(10);
        h.donors.add_donor(newer);

        let sent = h.agent.schedule_eligibility_reminders().await.unwrap();
        assert_eq!(sent, 2);
        assert_eq!(h.sms.delivery_count(), 2);
    }

    #[tokio::test]
    async fn emergency_alert_reaches_every_match() {
        let h = harness();
        for i in 0..12 {
            h.donors
                .add_donor(test_donor(&format!("lyon-{i}"), BloodGroup::APositive, "Lyon", None));
        }

        let alerted = h
            .agent
            .send_emergency_alert(&test_request(BloodGroup::APositive, UrgencyLevel::Low))
            .await
            .unwrap();

        // Country tier caps the match list at ten.
        assert_eq!(alerted, 10);
        assert_eq!(h.whatsapp.delivery_count(), 10);
    }

    struct FailingDonorStore;

    #[async_trait]
    impl DonorStore for FailingDonorStore {
        async fn find_available_donors(
            &self,
            _groups: &[BloodGroup],
            _country: &str,
            _city_contains: Option<&str>,
        ) -> Result<Vec<Donor>> {
            anyhow::bail!("donor store is unreachable")
        }

        async fn list_available_donors(&self) -> Result<Vec<Donor>> {
            anyhow::bail!("donor store is unreachable")
        }
    }

    #[tokio::test]
    async fn store_failure_is_contained_at_the_trigger_boundary() {
        let failing: Arc<dyn DonorStore> = Arc::new(FailingDonorStore);
        let requests = Arc::new(InMemoryRequestStore::new());
        let email = Arc::new(RecordingChannel::new(ChannelKind::Email));
        let sms = Arc::new(RecordingChannel::new(ChannelKind::Sms));
        let whatsapp = Arc::new(RecordingChannel::new(ChannelKind::WhatsApp));
        let logs = Arc::new(InMemoryNotificationLog::new());

        let matcher = DonorMatcherService::new(failing.clone());
        let notifier = NotificationService::new(email, sms.clone(), whatsapp, logs);
        let agent = NotificationAgent::new(matcher, notifier, failing, requests);

        let result = agent
            .process_trigger(NotificationTrigger::BloodRequestSubmitted(test_request(
                BloodGroup::APositive,
                UrgencyLevel::High,
            )))
            .await;

        // The handler failed internally, but the trigger boundary held.
        assert!(result.is_ok());
        // The confirmation had already gone out before matching failed.
        assert_eq!(sms.delivery_count(), 1);

        // And the sweep surfaces the error to its caller directly.
        assert!(agent.schedule_eligibility_reminders().await.is_err());
    }
}
