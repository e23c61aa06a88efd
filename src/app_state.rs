use sqlx::PgPool;
use std::sync::Arc;

use crate::config;
use crate::services::stores::WorkingHoursStore;
use crate::services::{AvailabilityService, BookingService, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub booking: Arc<BookingService>,
    pub availability: Arc<AvailabilityService>,
    pub notifications: Arc<NotificationService>,
    pub hours: Arc<dyn WorkingHoursStore>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        env: config::Config,
        booking: Arc<BookingService>,
        availability: Arc<AvailabilityService>,
        notifications: Arc<NotificationService>,
        hours: Arc<dyn WorkingHoursStore>,
    ) -> Self {
        Self {
            db,
            env,
            booking,
            availability,
            notifications,
            hours,
        }
    }
}
