use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Duration, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub status: AppointmentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Price captured from the service at booking time, in cents. Later
    /// service price changes do not touch existing appointments.
    pub price_cents: i64,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAppointment {
    pub salon_id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Omit to derive the end from the service duration.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn end_time_or(&self, service_duration_minutes: i64) -> OffsetDateTime {
        self.end_time
            .unwrap_or(self.start_time + Duration::minutes(service_duration_minutes))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAppointmentPayload {
    pub status: Option<AppointmentStatus>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl UpdateAppointmentPayload {
    pub fn changes_times(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }
}
