use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::db::{Appointment, AppointmentStatus, NewAppointment, UpdateAppointmentPayload};
use crate::error::{AppError, AppResult};
use crate::services::notification_service::NotificationScheduler;
use crate::services::stores::{AppointmentStore, CatalogStore};

/// Result of a booking mutation. Notification scheduling problems surface
/// here as warnings; they never fail the booking itself.
#[derive(Debug)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    pub warnings: Vec<String>,
}

pub struct BookingService {
    appointments: Arc<dyn AppointmentStore>,
    catalog: Arc<dyn CatalogStore>,
    scheduler: Arc<dyn NotificationScheduler>,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        catalog: Arc<dyn CatalogStore>,
        scheduler: Arc<dyn NotificationScheduler>,
    ) -> Self {
        Self {
            appointments,
            catalog,
            scheduler,
        }
    }

    pub async fn create(&self, new: NewAppointment) -> AppResult<BookingOutcome> {
        let service = self
            .catalog
            .service(new.service_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
        self.catalog
            .salon(new.salon_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Salon not found".to_string()))?;
        self.catalog
            .client(new.client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;
        self.catalog
            .professional(new.professional_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Professional not found".to_string()))?;

        let end_time = new.end_time_or(service.duration_minutes as i64);
        validate_interval(new.start_time, end_time)?;

        let now = OffsetDateTime::now_utc();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            salon_id: new.salon_id,
            client_id: new.client_id,
            professional_id: new.professional_id,
            service_id: new.service_id,
            status: AppointmentStatus::Pending,
            start_time: new.start_time,
            end_time,
            price_cents: service.price_cents,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };

        let appointment = self.appointments.create_checked(appointment).await?;
        info!(
            appointment_id = %appointment.id,
            professional_id = %appointment.professional_id,
            "appointment created"
        );

        let warnings = self.scheduler.on_booked(&appointment).await;
        Ok(BookingOutcome {
            appointment,
            warnings,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateAppointmentPayload,
    ) -> AppResult<BookingOutcome> {
        let existing = self
            .appointments
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if existing.status.is_terminal() {
            return Err(AppError::Validation(format!(
                "Appointment is {:?} and can no longer be modified",
                existing.status
            )));
        }

        if let Some(next) = patch.status {
            if !existing.status.can_transition_to(next) {
                return Err(AppError::Validation(format!(
                    "Cannot transition appointment from {:?} to {:?}",
                    existing.status, next
                )));
            }
        }

        let times_changed = patch.changes_times();
        let mut updated = existing.clone();
        if let Some(status) = patch.status {
            updated.status = status;
        }
        if let Some(start_time) = patch.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            updated.end_time = end_time;
        }
        if let Some(notes) = patch.notes {
            updated.notes = Some(notes);
        }
        validate_interval(updated.start_time, updated.end_time)?;

        // A cancelled appointment frees its slot, so no conflict re-check.
        let recheck = times_changed && updated.status != AppointmentStatus::Cancelled;
        let updated = self.appointments.update_checked(updated, recheck).await?;
        info!(appointment_id = %updated.id, status = ?updated.status, "appointment updated");

        let mut warnings = Vec::new();
        let became_cancelled = existing.status != AppointmentStatus::Cancelled
            && updated.status == AppointmentStatus::Cancelled;
        if became_cancelled {
            warnings.extend(self.scheduler.on_cancelled(&updated).await);
        } else if times_changed {
            warnings.extend(self.scheduler.on_times_changed(&updated).await);
        }

        Ok(BookingOutcome {
            appointment: updated,
            warnings,
        })
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<BookingOutcome> {
        self.update(
            id,
            UpdateAppointmentPayload {
                status: Some(AppointmentStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
    }

    /// Hard delete: the appointment and its notifications go in one atomic
    /// unit. A partial failure commits nothing and surfaces as an
    /// infrastructure error.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.appointments.delete_cascade(id).await?;
        info!(appointment_id = %id, "appointment hard-deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        self.appointments
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
    }
}

fn validate_interval(start: OffsetDateTime, end: OffsetDateTime) -> AppResult<()> {
    if end <= start {
        return Err(AppError::Validation(
            "Appointment end time must be after its start time".to_string(),
        ));
    }
    Ok(())
}
