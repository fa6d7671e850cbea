//! # BloodLink Core
//!
//! Donor-matching and notification-dispatch logic for the BloodLink
//! blood-donor coordination app. The surrounding application handles
//! registration forms, maps, and rendering; this crate owns the domain
//! logic:
//!
//! - ABO/Rh compatibility rules and donor scoring
//! - the two-tier (city, then country) donor search with the 90-day
//!   donation-interval filter
//! - per-channel (email/SMS/WhatsApp) notification content
//! - the dispatcher that fans a notification out across channels and keeps
//!   an append-only delivery log
//! - the trigger agent that reacts to domain events (request submitted,
//!   donor registered, donation due, ...) by sequencing matcher and
//!   dispatcher calls
//!
//! Persistence and delivery are injected through the traits in
//! [`storage`] and [`channels`]; in-memory implementations back the test
//! suite and demo deployments.

pub mod channels;
pub mod domain;
pub mod storage;

pub use channels::{ChannelKind, ConsoleChannel, DeliveryChannel, SmtpConfig, SmtpEmailChannel};
pub use domain::matcher_service::{
    donation_eligibility, format_donor_info, score_donor, DonorMatcherService, MatcherConfig,
    MIN_DONATION_INTERVAL_DAYS,
};
pub use domain::models::{
    compatible_donor_groups_for, BloodGroup, BloodRequest, BloodRequestRecord, DeliveryStatus,
    DonationEligibility, Donor, MatchingDonor, NotificationChannels, NotificationEvent,
    NotificationLog, NotificationPayload, NotificationType, Recipient, RequestStatus,
    UrgencyLevel,
};
pub use domain::notification_agent::{NotificationAgent, NotificationTrigger};
pub use domain::notification_service::NotificationService;
pub use storage::{
    BloodRequestStore, DonorStore, InMemoryDonorStore, InMemoryNotificationLog,
    InMemoryRequestStore, NotificationLogStore,
};
