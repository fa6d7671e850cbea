//! Per-channel notification content rendering.
//!
//! Template selection is a pure lookup on `(notification type, channel)`.
//! Email gets a subject plus an HTML body; SMS and WhatsApp get short text
//! with an urgency-appropriate marker. Rendering is deterministic and makes
//! no external calls; missing payload fields fall back to neutral wording.

use crate::channels::{ChannelKind, RenderedContent};
use crate::domain::models::blood::UrgencyLevel;
use crate::domain::models::notification::{NotificationPayload, NotificationType};

/// Subject line and HTML body for an email notification.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

/// Alert cue prefixed to donor-facing request messages.
pub fn urgency_marker(urgency: UrgencyLevel) -> &'static str {
    match urgency {
        UrgencyLevel::High => "🚨",
        UrgencyLevel::Medium => "⚠️",
        UrgencyLevel::Low => "ℹ️",
    }
}

fn text_or(field: &Option<String>, fallback: &str) -> String {
    field.as_deref().unwrap_or(fallback).to_string()
}

fn blood_group_code(payload: &NotificationPayload) -> String {
    payload
        .blood_group
        .map(|g| g.code().to_string())
        .unwrap_or_else(|| "your blood group".to_string())
}

/// Render content for one channel attempt.
pub fn render_for_channel(
    channel: ChannelKind,
    notification_type: NotificationType,
    recipient_name: &str,
    payload: &NotificationPayload,
) -> RenderedContent {
    match channel {
        ChannelKind::Email => {
            let EmailContent { subject, html_body } =
                render_email(notification_type, recipient_name, payload);
            RenderedContent::Email { subject, html_body }
        }
        ChannelKind::Sms => RenderedContent::Text(render_sms(notification_type, recipient_name, payload)),
        ChannelKind::WhatsApp => {
            RenderedContent::Text(render_whatsapp(notification_type, recipient_name, payload))
        }
    }
}

/// Email subject and HTML body for a notification type.
pub fn render_email(
    notification_type: NotificationType,
    recipient_name: &str,
    payload: &NotificationPayload,
) -> EmailContent {
    match notification_type {
        NotificationType::VolunteerWelcome => {
            let motivation_row = payload
                .motivation
                .as_deref()
                .map(|m| format!("<li><strong>Motivation:</strong> {m}</li>"))
                .unwrap_or_default();
            EmailContent {
                subject: "🎉 Welcome to BloodLink Volunteer Team!".to_string(),
                html_body: format!(
                    "<h2>Welcome to the BloodLink Family!</h2>\
                     <p>Dear {recipient_name},</p>\
                     <p>Thank you for joining our volunteer team! Your commitment to helping save lives is truly inspiring.</p>\
                     <h3>Your Volunteer Profile:</h3>\
                     <ul>\
                     <li><strong>Name:</strong> {name}</li>\
                     <li><strong>Region:</strong> {region}</li>\
                     {motivation_row}\
                     </ul>\
                     <h3>What's Next?</h3>\
                     <ol>\
                     <li>Our volunteer coordinator will contact you within 48 hours</li>\
                     <li>You'll receive training materials and guidelines</li>\
                     <li>Start making a difference in your community!</li>\
                     </ol>\
                     <p>Best regards,<br>The BloodLink Volunteer Team</p>",
                    name = text_or(&payload.name, "-"),
                    region = text_or(&payload.region, "-"),
                ),
            }
        }
        NotificationType::PartnershipConfirmation => EmailContent {
            subject: "🤝 Partnership Inquiry Received - BloodLink".to_string(),
            html_body: format!(
                "<h2>Thank You for Your Partnership Interest!</h2>\
                 <p>Dear {recipient_name},</p>\
                 <p>We've received your partnership inquiry for <strong>{organization}</strong> and are excited about the possibility of working together.</p>\
                 <h3>Your Inquiry Details:</h3>\
                 <ul>\
                 <li><strong>Organization:</strong> {organization}</li>\
                 <li><strong>Type:</strong> {org_type}</li>\
                 <li><strong>Contact:</strong> {contact}</li>\
                 </ul>\
                 <h3>Next Steps:</h3>\
                 <ol>\
                 <li>Our partnership team will review your inquiry within 24 hours</li>\
                 <li>We'll schedule a call to discuss collaboration opportunities</li>\
                 </ol>\
                 <p>Best regards,<br>The BloodLink Partnership Team</p>",
                organization = text_or(&payload.organization_name, "your organization"),
                org_type = text_or(&payload.organization_type, "-"),
                contact = text_or(&payload.contact_name, "-"),
            ),
        },
        NotificationType::BloodRequestConfirmation => EmailContent {
            subject: "🩸 Blood Request Confirmed - BloodLink".to_string(),
            html_body: format!(
                "<h2>Blood Request Confirmed</h2>\
                 <p>Dear {recipient_name},</p>\
                 <p>Your blood request has been successfully submitted to our global network.</p>\
                 <h3>Request Details:</h3>\
                 <ul>\
                 <li><strong>Blood Group:</strong> {blood_group}</li>\
                 <li><strong>Patient:</strong> {patient}</li>\
                 <li><strong>Hospital:</strong> {hospital}</li>\
                 <li><strong>Location:</strong> {city}, {country}</li>\
                 </ul>\
                 <p>We're now searching for matching donors in your area. You'll be notified as soon as we find potential matches.</p>\
                 <p>Best regards,<br>The BloodLink Team</p>",
                blood_group = blood_group_code(payload),
                patient = text_or(&payload.patient_name, "-"),
                hospital = text_or(&payload.hospital_name, "-"),
                city = text_or(&payload.city, "-"),
                country = text_or(&payload.country, "-"),
            ),
        },
        NotificationType::DonorMatchFound => EmailContent {
            subject: "🎯 Matching Donors Found - BloodLink".to_string(),
            html_body: format!(
                "<h2>Great News! We Found Matching Donors</h2>\
                 <p>Dear {recipient_name},</p>\
                 <p>We've found <strong>{donor_count} potential donors</strong> who can help with your blood request!</p>\
                 <h3>Next Steps:</h3>\
                 <ol>\
                 <li>Log into your BloodLink account to view donor details</li>\
                 <li>Contact the donors directly using the provided information</li>\
                 <li>Coordinate with your hospital for the donation process</li>\
                 </ol>\
                 <p>Time is precious; reach out to the donors as soon as possible!</p>\
                 <p>Wishing you the best,<br>The BloodLink Team</p>",
                donor_count = payload.donor_count.unwrap_or(0),
            ),
        },
        NotificationType::DonationReminder => EmailContent {
            subject: "🩸 You're Eligible to Donate Again - BloodLink".to_string(),
            html_body: format!(
                "<h2>Ready to Save Another Life?</h2>\
                 <p>Dear {recipient_name},</p>\
                 <p>It's been {days} days since your last donation, which means you're now eligible to donate blood again!</p>\
                 <ul>\
                 <li>Every donation can save up to 3 lives</li>\
                 <li>Blood cannot be manufactured; it can only come from generous donors like you</li>\
                 <li>Your {blood_group} blood type is always needed</li>\
                 </ul>\
                 <p>Ready to be someone's hero again? Update your availability in the BloodLink app!</p>\
                 <p>With gratitude,<br>The BloodLink Team</p>",
                days = payload.days_since_last_donation.unwrap_or(365),
                blood_group = blood_group_code(payload),
            ),
        },
        NotificationType::AppointmentReminder => EmailContent {
            subject: "📅 Donation Appointment Reminder - BloodLink".to_string(),
            html_body: format!(
                "<h2>Appointment Reminder</h2>\
                 <p>Dear {recipient_name},</p>\
                 <p>This is a friendly reminder about your upcoming blood donation appointment.</p>\
                 <h3>Appointment Details:</h3>\
                 <ul>\
                 <li><strong>Date:</strong> {date}</li>\
                 <li><strong>Time:</strong> {time}</li>\
                 <li><strong>Location:</strong> {hospital}, {city}</li>\
                 </ul>\
                 <h3>Before You Donate:</h3>\
                 <ul>\
                 <li>Eat a healthy meal 2-3 hours before</li>\
                 <li>Drink plenty of water</li>\
                 <li>Bring a valid ID</li>\
                 </ul>\
                 <p>Thank you for your commitment to saving lives!</p>\
                 <p>See you soon,<br>The BloodLink Team</p>",
                date = text_or(&payload.appointment_date, "-"),
                time = text_or(&payload.appointment_time, "-"),
                hospital = text_or(&payload.hospital_name, "-"),
                city = text_or(&payload.city, "-"),
            ),
        },
    }
}

/// Short plain-text message for the SMS channel.
pub fn render_sms(
    notification_type: NotificationType,
    recipient_name: &str,
    payload: &NotificationPayload,
) -> String {
    match notification_type {
        NotificationType::VolunteerWelcome => format!(
            "🎉 BloodLink: Welcome to our volunteer team, {recipient_name}! Our coordinator will contact you within 48 hours with next steps. Thank you for joining our mission! 💪"
        ),
        NotificationType::PartnershipConfirmation => format!(
            "🤝 BloodLink: Thank you for your partnership inquiry, {organization}! Our team will contact you within 24 hours to discuss collaboration opportunities. 🌟",
            organization = text_or(&payload.organization_name, recipient_name),
        ),
        NotificationType::BloodRequestConfirmation => {
            // Also serves as the new-donor welcome, where no hospital is set.
            let location = match (&payload.hospital_name, &payload.city) {
                (Some(hospital), Some(city)) => format!(" at {hospital}, {city}"),
                (Some(hospital), None) => format!(" at {hospital}"),
                _ => String::new(),
            };
            format!(
                "🩸 BloodLink: Your blood request for {blood_group}{location} has been confirmed. We're searching for donors now. Stay strong! 💪",
                blood_group = blood_group_code(payload),
            )
        }
        NotificationType::DonorMatchFound => match &payload.message {
            // Donor-side alerts arrive prerendered with the urgency marker.
            Some(alert) => alert.clone(),
            None => format!(
                "🎯 BloodLink: Great news {recipient_name}! We found {donor_count} matching donors for your blood request. Check the app to contact them immediately. Time is precious! ⏰",
                donor_count = payload.donor_count.unwrap_or(0),
            ),
        },
        NotificationType::DonationReminder => format!(
            "🩸 BloodLink: Hi {recipient_name}! You're now eligible to donate blood again ({days} days since last donation). Ready to save another life? Update your availability in the app!",
            days = payload.days_since_last_donation.unwrap_or(365),
        ),
        NotificationType::AppointmentReminder => format!(
            "📅 BloodLink: Reminder - Your donation appointment is at {time} at {hospital}. Eat well, hydrate, and bring ID. Thank you for being a hero! 💪",
            time = text_or(&payload.appointment_time, "-"),
            hospital = text_or(&payload.hospital_name, "-"),
        ),
    }
}

/// Lightly formatted message for the WhatsApp channel.
pub fn render_whatsapp(
    notification_type: NotificationType,
    recipient_name: &str,
    payload: &NotificationPayload,
) -> String {
    match notification_type {
        NotificationType::VolunteerWelcome => format!(
            "🎉 *BloodLink - Welcome Volunteer!*\n\nHi {recipient_name}!\n\nWelcome to our volunteer team! 🙌\n\n📋 *Your Details:*\n• Name: {name}\n• Region: {region}\n\n*What's Next:*\n✅ Coordinator will contact you in 48hrs\n✅ Training materials coming soon\n✅ Start making a difference!\n\nThank you for joining our life-saving mission! 💪",
            name = text_or(&payload.name, "-"),
            region = text_or(&payload.region, "-"),
        ),
        NotificationType::PartnershipConfirmation => format!(
            "🤝 *BloodLink - Partnership Inquiry*\n\nHi {recipient_name}!\n\nThank you for your interest in partnering with BloodLink!\n\n🏥 *Organization:* {organization}\n📋 *Type:* {org_type}\n\n*Next Steps:*\n✅ Review within 24 hours\n✅ Schedule partnership call\n✅ Start saving lives together!",
            organization = text_or(&payload.organization_name, "-"),
            org_type = text_or(&payload.organization_type, "-"),
        ),
        NotificationType::BloodRequestConfirmation => format!(
            "🩸 *BloodLink - Request Confirmed*\n\nHi {recipient_name}!\n\nYour blood request has been submitted:\n• Blood Group: {blood_group}\n• Patient: {patient}\n• Hospital: {hospital}\n• Location: {city}, {country}\n\nWe're searching our global network for donors. You'll hear from us soon! 💪",
            blood_group = blood_group_code(payload),
            patient = text_or(&payload.patient_name, "-"),
            hospital = text_or(&payload.hospital_name, "-"),
            city = text_or(&payload.city, "-"),
            country = text_or(&payload.country, "-"),
        ),
        NotificationType::DonorMatchFound => match &payload.message {
            Some(alert) => alert.clone(),
            None => format!(
                "🎯 *BloodLink - Donors Found!*\n\nAmazing news {recipient_name}!\n\nWe found *{donor_count} potential donors* for your blood request.\n\n✅ Check the BloodLink app now\n✅ Contact donors immediately\n✅ Coordinate with your hospital\n\nTime is precious - act fast! ⏰",
                donor_count = payload.donor_count.unwrap_or(0),
            ),
        },
        NotificationType::DonationReminder => format!(
            "🩸 *BloodLink - Ready to Donate?*\n\nHi {recipient_name}!\n\nYou're eligible to donate again! 🎉\n\n📊 Days since last donation: {days}\n🩸 Your blood type: {blood_group}\n💝 Lives you can save: Up to 3\n\nUpdate your availability in the app and be someone's hero again!",
            days = payload.days_since_last_donation.unwrap_or(365),
            blood_group = blood_group_code(payload),
        ),
        NotificationType::AppointmentReminder => format!(
            "📅 *BloodLink - Appointment Reminder*\n\nHi {recipient_name}!\n\nDonation appointment reminder:\n• 📅 Date: {date}\n• ⏰ Time: {time}\n• 🏥 Location: {hospital}\n\n*Before you come:*\n✅ Eat a healthy meal\n✅ Drink plenty of water\n✅ Bring valid ID\n\nThank you for saving lives! 💪",
            date = text_or(&payload.appointment_date, "-"),
            time = text_or(&payload.appointment_time, "-"),
            hospital = text_or(&payload.hospital_name, "-"),
        ),
    }
}

/// The urgent request alert sent directly to a matched donor over SMS and
/// WhatsApp. Not a per-type template: every donor alert carries the request
/// details and an urgency cue.
pub fn render_donor_alert(request_payload: &NotificationPayload, urgency: UrgencyLevel) -> String {
    format!(
        "{marker} BloodLink: {urgency_word} blood request for {blood_group} at {hospital}, {city}. Patient: {patient}. Contact: {contact}. Can you help save a life? 🩸💪",
        marker = urgency_marker(urgency),
        urgency_word = match urgency {
            UrgencyLevel::High => "URGENT",
            _ => "New",
        },
        blood_group = blood_group_code(request_payload),
        hospital = text_or(&request_payload.hospital_name, "-"),
        city = text_or(&request_payload.city, "-"),
        patient = text_or(&request_payload.patient_name, "-"),
        contact = text_or(&request_payload.contact_number, "-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::blood::BloodGroup;

    fn request_payload() -> NotificationPayload {
        NotificationPayload {
            blood_group: Some(BloodGroup::AbNegative),
            city: Some("Paris".to_string()),
            country: Some("FR".to_string()),
            hospital_name: Some("Hopital Saint-Louis".to_string()),
            patient_name: Some("Marie Curie".to_string()),
            contact_number: Some("+33123456789".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn email_confirmation_carries_request_details() {
        let content = render_email(
            NotificationType::BloodRequestConfirmation,
            "Marie Curie",
            &request_payload(),
        );
        assert!(content.subject.contains("Blood Request Confirmed"));
        assert!(content.html_body.contains("AB-"));
        assert!(content.html_body.contains("Hopital Saint-Louis"));
        assert!(content.html_body.contains("Paris, FR"));
    }

    #[test]
    fn sms_confirmation_without_hospital_reads_as_welcome() {
        let payload = NotificationPayload {
            blood_group: Some(BloodGroup::OPositive),
            city: None,
            ..Default::default()
        };
        let sms = render_sms(NotificationType::BloodRequestConfirmation, "Jean", &payload);
        assert!(sms.contains("O+"));
        assert!(!sms.contains(" at "));
    }

    #[test]
    fn match_found_reports_donor_count_on_every_channel() {
        let payload = NotificationPayload {
            donor_count: Some(4),
            ..Default::default()
        };
        let email = render_email(NotificationType::DonorMatchFound, "Marie", &payload);
        let sms = render_sms(NotificationType::DonorMatchFound, "Marie", &payload);
        let whatsapp = render_whatsapp(NotificationType::DonorMatchFound, "Marie", &payload);
        assert!(email.html_body.contains("4 potential donors"));
        assert!(sms.contains("4 matching donors"));
        assert!(whatsapp.contains("*4 potential donors*"));
    }

    #[test]
    fn donor_alert_marks_high_urgency() {
        let alert = render_donor_alert(&request_payload(), UrgencyLevel::High);
        assert!(alert.starts_with("🚨"));
        assert!(alert.contains("URGENT"));
        assert!(alert.contains("AB-"));
        assert!(alert.contains("+33123456789"));
    }

    #[test]
    fn empty_payload_never_panics() {
        let payload = NotificationPayload::default();
        for nt in [
            NotificationType::BloodRequestConfirmation,
            NotificationType::DonorMatchFound,
            NotificationType::DonationReminder,
            NotificationType::AppointmentReminder,
            NotificationType::VolunteerWelcome,
            NotificationType::PartnershipConfirmation,
        ] {
            render_email(nt, "Someone", &payload);
            render_sms(nt, "Someone", &payload);
            render_whatsapp(nt, "Someone", &payload);
        }
    }
}
