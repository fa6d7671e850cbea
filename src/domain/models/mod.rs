//! Domain models for the BloodLink core.

pub mod blood;
pub mod donor;
pub mod notification;
pub mod request;

pub use blood::{compatible_donor_groups_for, BloodGroup, UrgencyLevel};
pub use donor::{DonationEligibility, Donor, MatchingDonor};
pub use notification::{
    Appointment, DeliveryStatus, NotificationChannels, NotificationEvent, NotificationLog,
    NotificationPayload, NotificationType, PartnershipInquiry, Recipient, Volunteer,
};
pub use request::{BloodRequest, BloodRequestRecord, RequestStatus};
