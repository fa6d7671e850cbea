//! Notification dispatch service.
//!
//! Routes a notification through the channels flagged on the event, fans
//! the channel attempts out concurrently, and appends one delivery log
//! entry per call. Channel failures are recovered here and recorded in the
//! log; they never surface as errors to the caller.

use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::channels::DeliveryChannel;
use crate::domain::content::render_for_channel;
use crate::domain::models::blood::{BloodGroup, UrgencyLevel};
use crate::domain::models::notification::{
    DeliveryStatus, NotificationChannels, NotificationEvent, NotificationLog, NotificationPayload,
    NotificationType, Recipient,
};
use crate::storage::traits::NotificationLogStore;

/// Payload for the blood-request confirmation wrapper.
#[derive(Debug, Clone)]
pub struct BloodRequestConfirmationData {
    pub blood_group: BloodGroup,
    pub patient_name: String,
    pub hospital_name: String,
    pub city: String,
    pub country: String,
}

/// Payload for the donor-match wrapper.
#[derive(Debug, Clone)]
pub struct DonorMatchData {
    pub blood_group: BloodGroup,
    pub donor_count: usize,
    pub city: String,
    pub country: String,
}

/// Payload for the donation-reminder wrapper.
#[derive(Debug, Clone)]
pub struct DonationReminderData {
    pub blood_group: BloodGroup,
    pub days_since_last_donation: i64,
}

/// Payload for the appointment-reminder wrapper.
#[derive(Debug, Clone)]
pub struct AppointmentReminderData {
    pub appointment_date: String,
    pub appointment_time: String,
    pub hospital_name: String,
    pub city: String,
}

/// Service that fans notifications out through the delivery channels and
/// keeps the append-only delivery log.
#[derive(Clone)]
pub struct NotificationService {
    email: Arc<dyn DeliveryChannel>,
    sms: Arc<dyn DeliveryChannel>,
    whatsapp: Arc<dyn DeliveryChannel>,
    log_store: Arc<dyn NotificationLogStore>,
}

impl NotificationService {
    /// Wire the service with one adapter per channel kind.
    ///
    /// For non-live deployments pass [`crate::channels::ConsoleChannel`]
    /// adapters, which log instead of delivering.
    pub fn new(
        email: Arc<dyn DeliveryChannel>,
        sms: Arc<dyn DeliveryChannel>,
        whatsapp: Arc<dyn DeliveryChannel>,
        log_store: Arc<dyn NotificationLogStore>,
    ) -> Self {
        Self {
            email,
            sms,
            whatsapp,
            log_store,
        }
    }

    /// Send a notification through every requested channel the recipient is
    /// reachable on. Returns `Ok(true)` iff at least one channel succeeded.
    ///
    /// Channels are attempted concurrently and independently; a failure on
    /// one never aborts the others. Callers needing per-channel detail must
    /// read the delivery log, the boolean only distinguishes total failure.
    pub async fn send_notification(&self, event: NotificationEvent) -> Result<bool> {
        info!(
            "📤 Sending {} notification to {}",
            event.notification_type.as_str(),
            event.recipient.name
        );

        let mut attempts: Vec<&Arc<dyn DeliveryChannel>> = Vec::new();
        if event.channels.email && event.recipient.email.is_some() {
            attempts.push(&self.email);
        }
        if event.channels.sms && event.recipient.phone.is_some() {
            attempts.push(&self.sms);
        }
        if event.channels.whatsapp && event.recipient.phone.is_some() {
            attempts.push(&self.whatsapp);
        }

        let sends = attempts.into_iter().map(|channel| {
            let kind = channel.kind();
            let content = render_for_channel(
                kind,
                event.notification_type,
                &event.recipient.name,
                &event.payload,
            );
            let recipient = &event.recipient;
            async move {
                let outcome = channel.deliver(recipient, &content).await;
                (kind, outcome)
            }
        });

        let mut channels_used = Vec::new();
        let mut errors = Vec::new();
        for (kind, outcome) in join_all(sends).await {
            match outcome {
                Ok(()) => channels_used.push(kind.as_str().to_string()),
                Err(err) => {
                    warn!("❌ {kind} delivery failed: {err}");
                    errors.push(format!("{kind}: {err}"));
                }
            }
        }

        let any_sent = !channels_used.is_empty();
        let error_message = if !any_sent && !errors.is_empty() {
            Some(errors.join("; "))
        } else {
            None
        };

        let log = NotificationLog {
            id: Uuid::new_v4(),
            notification_type: event.notification_type,
            recipient_email: event.recipient.email.clone(),
            recipient_phone: event.recipient.phone.clone(),
            channels_used,
            status: if any_sent {
                DeliveryStatus::Sent
            } else {
                DeliveryStatus::Failed
            },
            sent_at: Some(Utc::now()),
            error_message,
            payload: event.payload,
        };

        // The dispatch outcome stands even if the log append fails.
        if let Err(err) = self.log_store.append(log).await {
            warn!("❌ Failed to append notification log: {err:#}");
        }

        Ok(any_sent)
    }

    /// Most recent delivery log entries, newest first.
    pub async fn recent_logs(&self, limit: usize) -> Result<Vec<NotificationLog>> {
        self.log_store.recent(limit).await
    }

    /// Confirmation to the requester that their request was submitted.
    /// Email and SMS when the contact fields exist; no WhatsApp.
    pub async fn send_blood_request_confirmation(
        &self,
        recipient: Recipient,
        data: BloodRequestConfirmationData,
    ) -> Result<bool> {
        let channels = NotificationChannels {
            email: recipient.email.is_some(),
            sms: recipient.phone.is_some(),
            whatsapp: false,
        };
        self.send_notification(NotificationEvent {
            notification_type: NotificationType::BloodRequestConfirmation,
            recipient,
            payload: NotificationPayload {
                blood_group: Some(data.blood_group),
                patient_name: Some(data.patient_name),
                hospital_name: Some(data.hospital_name),
                city: Some(data.city),
                country: Some(data.country),
                ..Default::default()
            },
            urgency: UrgencyLevel::Medium,
            channels,
        })
        .await
    }

    /// Tell the requester how many donors matched. All three channels.
    pub async fn send_donor_match_notification(
        &self,
        recipient: Recipient,
        data: DonorMatchData,
    ) -> Result<bool> {
        let channels = NotificationChannels {
            email: recipient.email.is_some(),
            sms: recipient.phone.is_some(),
            whatsapp: recipient.phone.is_some(),
        };
        self.send_notification(NotificationEvent {
            notification_type: NotificationType::DonorMatchFound,
            recipient,
            payload: NotificationPayload {
                blood_group: Some(data.blood_group),
                donor_count: Some(data.donor_count),
                city: Some(data.city),
                country: Some(data.country),
                ..Default::default()
            },
            urgency: UrgencyLevel::High,
            channels,
        })
        .await
    }

    /// Remind an eligible donor that they can donate again. Email and SMS.
    pub async fn send_donation_reminder(
        &self,
        recipient: Recipient,
        data: DonationReminderData,
    ) -> Result<bool> {
        let channels = NotificationChannels {
            email: recipient.email.is_some(),
            sms: recipient.phone.is_some(),
            whatsapp: false,
        };
        self.send_notification(NotificationEvent {
            notification_type: NotificationType::DonationReminder,
            recipient,
            payload: NotificationPayload {
                blood_group: Some(data.blood_group),
                days_since_last_donation: Some(data.days_since_last_donation),
                ..Default::default()
            },
            urgency: UrgencyLevel::Low,
            channels,
        })
        .await
    }

    /// Remind a donor of an upcoming appointment. All three channels.
    pub async fn send_appointment_reminder(
        &self,
        recipient: Recipient,
        data: AppointmentReminderData,
    ) -> Result<bool> {
        let channels = NotificationChannels {
            email: recipient.email.is_some(),
            sms: recipient.phone.is_some(),
            whatsapp: recipient.phone.is_some(),
        };
        self.send_notification(NotificationEvent {
            notification_type: NotificationType::AppointmentReminder,
            recipient,
            payload: NotificationPayload {
                appointment_date: Some(data.appointment_date),
                appointment_time: Some(data.appointment_time),
                hospital_name: Some(data.hospital_name),
                city: Some(data.city),
                ..Default::default()
            },
            urgency: UrgencyLevel::Medium,
            channels,
        })
        .await
    }
}
