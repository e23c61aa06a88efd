use async_trait::async_trait;
use sqlx::types::Json;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::config::ScheduleConfig;
use crate::db::{
    Appointment, Notification, NotificationKind, NotificationPayload, NotificationStatus,
};
use crate::error::{AppError, AppResult};
use crate::services::stores::{AppointmentStore, CatalogStore, NotificationStore};

/// What the booking lifecycle needs from notification scheduling. The
/// dependency runs one way only: this side never calls back into booking
/// logic.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Persists a notification intent with its fire time. `None` means
    /// "deliver as soon as possible". Delivery itself belongs to the
    /// external dispatcher polling the due queue.
    async fn schedule(
        &self,
        appointment_id: Uuid,
        kind: NotificationKind,
        scheduled_for: Option<OffsetDateTime>,
    ) -> AppResult<Uuid>;

    /// Confirmation plus the configured reminders for a fresh booking.
    /// Failures are collected as warnings, never errors: the appointment is
    /// the primary artifact and has already been persisted.
    async fn on_booked(&self, appointment: &Appointment) -> Vec<String>;

    async fn on_cancelled(&self, appointment: &Appointment) -> Vec<String>;

    /// Replaces not-yet-sent reminders after a start-time change. Persisted
    /// rows are the single source of truth for reminder timing, so they must
    /// follow the appointment.
    async fn on_times_changed(&self, appointment: &Appointment) -> Vec<String>;
}

pub struct NotificationService {
    appointments: Arc<dyn AppointmentStore>,
    catalog: Arc<dyn CatalogStore>,
    notifications: Arc<dyn NotificationStore>,
    config: ScheduleConfig,
}

impl NotificationService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        catalog: Arc<dyn CatalogStore>,
        notifications: Arc<dyn NotificationStore>,
        config: ScheduleConfig,
    ) -> Self {
        Self {
            appointments,
            catalog,
            notifications,
            config,
        }
    }

    /// Captures the denormalized payload snapshot at schedule time. Joining
    /// at send time instead would let later renames corrupt queued messages.
    async fn snapshot_payload(
        &self,
        appointment: &Appointment,
    ) -> AppResult<NotificationPayload> {
        let client = self
            .catalog
            .client(appointment.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        let professional = self
            .catalog
            .professional(appointment.professional_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Professional not found".to_string()))?;
        let service = self
            .catalog
            .service(appointment.service_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
        let salon = self
            .catalog
            .salon(appointment.salon_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;

        Ok(NotificationPayload {
            client_name: client.name,
            professional_name: professional.name,
            service_name: service.name,
            salon_name: salon.name,
            start_time: appointment.start_time,
        })
    }

    async fn schedule_for(
        &self,
        appointment: &Appointment,
        kind: NotificationKind,
        scheduled_for: Option<OffsetDateTime>,
    ) -> AppResult<Uuid> {
        let payload = self.snapshot_payload(appointment).await?;
        let notification = Notification {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            kind,
            status: NotificationStatus::Pending,
            scheduled_for,
            payload: Json(payload),
            created_at: OffsetDateTime::now_utc(),
        };
        let created = self.notifications.insert(notification).await?;
        Ok(created.id)
    }

    async fn schedule_reminders(&self, appointment: &Appointment) -> Vec<String> {
        let mut warnings = Vec::new();
        for offset in self.config.reminder_offsets() {
            let fire_at = appointment.start_time - offset;
            if let Err(err) = self
                .schedule_for(appointment, NotificationKind::Reminder, Some(fire_at))
                .await
            {
                warn!(
                    appointment_id = %appointment.id,
                    %err,
                    "failed to schedule reminder notification"
                );
                warnings.push(format!("reminder scheduling failed: {err}"));
            }
        }
        warnings
    }

    // Dispatcher-facing surface: the external message transport polls the due
    // queue and reports delivery outcomes back.

    pub async fn due(&self, now: OffsetDateTime, limit: i64) -> AppResult<Vec<Notification>> {
        Ok(self.notifications.due(now, limit).await?)
    }

    pub async fn mark_sent(&self, id: Uuid) -> AppResult<()> {
        Ok(self
            .notifications
            .set_status(id, NotificationStatus::Sent)
            .await?)
    }

    pub async fn mark_failed(&self, id: Uuid) -> AppResult<()> {
        Ok(self
            .notifications
            .set_status(id, NotificationStatus::Failed)
            .await?)
    }

    pub async fn for_appointment(&self, appointment_id: Uuid) -> AppResult<Vec<Notification>> {
        Ok(self.notifications.for_appointment(appointment_id).await?)
    }
}

#[async_trait]
impl NotificationScheduler for NotificationService {
    async fn schedule(
        &self,
        appointment_id: Uuid,
        kind: NotificationKind,
        scheduled_for: Option<OffsetDateTime>,
    ) -> AppResult<Uuid> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;
        self.schedule_for(&appointment, kind, scheduled_for).await
    }

    async fn on_booked(&self, appointment: &Appointment) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Err(err) = self
            .schedule_for(appointment, NotificationKind::Confirmation, None)
            .await
        {
            warn!(
                appointment_id = %appointment.id,
                %err,
                "failed to schedule confirmation notification"
            );
            warnings.push(format!("confirmation scheduling failed: {err}"));
        }
        warnings.extend(self.schedule_reminders(appointment).await);
        warnings
    }

    async fn on_cancelled(&self, appointment: &Appointment) -> Vec<String> {
        let mut warnings = Vec::new();
        // Not-yet-sent reminders must not outlive the booking: withdraw them
        // before the cancellation enters the queue.
        if let Err(err) = self
            .notifications
            .delete_pending_reminders(appointment.id)
            .await
        {
            warn!(
                appointment_id = %appointment.id,
                %err,
                "failed to drop reminders for cancelled appointment"
            );
            warnings.push(format!("reminder cleanup failed: {err}"));
        }
        if let Err(err) = self
            .schedule_for(appointment, NotificationKind::Cancellation, None)
            .await
        {
            warn!(
                appointment_id = %appointment.id,
                %err,
                "failed to schedule cancellation notification"
            );
            warnings.push(format!("cancellation scheduling failed: {err}"));
        }
        warnings
    }

    async fn on_times_changed(&self, appointment: &Appointment) -> Vec<String> {
        let mut warnings = Vec::new();
        match self
            .notifications
            .delete_pending_reminders(appointment.id)
            .await
        {
            Ok(_) => {}
            Err(err) => {
                warn!(
                    appointment_id = %appointment.id,
                    %err,
                    "failed to drop stale reminder notifications"
                );
                warnings.push(format!("reminder cleanup failed: {err}"));
            }
        }
        warnings.extend(self.schedule_reminders(appointment).await);
        warnings
    }
}
