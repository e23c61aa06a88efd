pub mod availability_service;
pub mod booking_service;
pub mod notification_service;
pub mod stores;

#[cfg(test)]
pub mod testing;

pub use availability_service::{AvailabilityQuery, AvailabilityService, ProfessionalSlots};
pub use booking_service::{BookingOutcome, BookingService};
pub use notification_service::{NotificationScheduler, NotificationService};
pub use stores::PgStore;
