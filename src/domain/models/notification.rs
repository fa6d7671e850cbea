//! Notification events, payloads, and the append-only delivery log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::blood::{BloodGroup, UrgencyLevel};

/// The six supported notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BloodRequestConfirmation,
    DonorMatchFound,
    DonationReminder,
    AppointmentReminder,
    VolunteerWelcome,
    PartnershipConfirmation,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::BloodRequestConfirmation => "blood_request_confirmation",
            NotificationType::DonorMatchFound => "donor_match_found",
            NotificationType::DonationReminder => "donation_reminder",
            NotificationType::AppointmentReminder => "appointment_reminder",
            NotificationType::VolunteerWelcome => "volunteer_welcome",
            NotificationType::PartnershipConfirmation => "partnership_confirmation",
        }
    }
}

/// Who a notification is addressed to. The channel router only attempts a
/// channel when the matching contact field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Recipient {
    pub fn with_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: Some(email.into()),
            phone: None,
        }
    }

    pub fn with_phone(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: Some(phone.into()),
        }
    }
}

/// Which delivery channels a notification should be attempted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannels {
    pub email: bool,
    pub sms: bool,
    pub whatsapp: bool,
}

impl NotificationChannels {
    pub fn email_only() -> Self {
        Self {
            email: true,
            sms: false,
            whatsapp: false,
        }
    }

    pub fn sms_only() -> Self {
        Self {
            email: false,
            sms: true,
            whatsapp: false,
        }
    }
}

/// Event-specific payload fields, rendered into channel content.
///
/// Every field is optional; templates fall back to neutral wording when a
/// field is absent rather than failing the send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_donation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A notification ready to be routed through delivery channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub notification_type: NotificationType,
    pub recipient: Recipient,
    pub payload: NotificationPayload,
    pub urgency: UrgencyLevel,
    pub channels: NotificationChannels,
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

/// One append-only log entry per `send_notification` call.
///
/// The status is fixed at creation time; entries are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationLog {
    pub id: Uuid,
    pub notification_type: NotificationType,
    pub recipient_email: Option<String>,
    pub recipient_phone: Option<String>,
    /// Channels that actually succeeded.
    pub channels_used: Vec<String>,
    pub status: DeliveryStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub payload: NotificationPayload,
}

/// A newly registered volunteer (trigger payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub name: String,
    pub email: String,
    pub region: String,
    pub motivation: Option<String>,
}

/// A partnership inquiry from an organization (trigger payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnershipInquiry {
    pub organization_name: String,
    pub contact_name: String,
    pub email: String,
    pub organization_type: String,
    pub message: Option<String>,
}

/// A scheduled donation appointment (trigger payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub hospital_name: String,
    pub city: String,
}
