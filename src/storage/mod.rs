//! Storage abstractions and the bundled in-memory backend.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryDonorStore, InMemoryNotificationLog, InMemoryRequestStore};
pub use traits::{BloodRequestStore, DonorStore, NotificationLogStore};
