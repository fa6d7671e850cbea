//! Domain layer: matching, content generation, dispatch, and triggers.

pub mod content;
pub mod matcher_service;
pub mod models;
pub mod notification_agent;
pub mod notification_service;

pub use matcher_service::{DonorMatcherService, MatcherConfig};
pub use notification_agent::{NotificationAgent, NotificationTrigger};
pub use notification_service::NotificationService;
