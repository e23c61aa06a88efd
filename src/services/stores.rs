use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::repositories::{
    AppointmentRepository, CatalogRepository, NotificationRepository, WorkingHoursRepository,
};
use crate::db::{
    Appointment, Client, DatabaseError, DaySchedule, Notification, NotificationStatus,
    Professional, Salon, Service,
};

/// Persistence seam for appointments. The conflict check and the write are a
/// single atomic unit per professional in every implementation.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Inserts after an atomic conflict check; `DatabaseError::Conflict` when
    /// the interval overlaps an existing non-cancelled appointment.
    async fn create_checked(&self, appointment: Appointment)
        -> Result<Appointment, DatabaseError>;

    /// Writes the full row back. When `recheck_conflict` is set the conflict
    /// check runs first, excluding the appointment itself; on conflict
    /// nothing is written.
    async fn update_checked(
        &self,
        appointment: Appointment,
        recheck_conflict: bool,
    ) -> Result<Appointment, DatabaseError>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError>;

    /// Non-cancelled appointments for a professional overlapping the window.
    async fn busy_between(
        &self,
        professional_id: Uuid,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError>;

    /// Hard delete of the appointment and everything it owns, all or nothing.
    async fn delete_cascade(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait WorkingHoursStore: Send + Sync {
    /// Schedule for one owner and weekday; `None` means no record, which
    /// callers treat as closed.
    async fn day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
    ) -> Result<Option<DaySchedule>, DatabaseError>;

    async fn set_day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
        schedule: DaySchedule,
    ) -> Result<(), DatabaseError>;
}

/// Lookups into the catalog entities owned by collaborators outside the
/// scheduling core.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn salon(&self, id: Uuid) -> Result<Option<Salon>, DatabaseError>;
    async fn client(&self, id: Uuid) -> Result<Option<Client>, DatabaseError>;
    async fn professional(&self, id: Uuid) -> Result<Option<Professional>, DatabaseError>;
    async fn service(&self, id: Uuid) -> Result<Option<Service>, DatabaseError>;
    async fn active_professionals(
        &self,
        salon_id: Uuid,
        service_id: Option<Uuid>,
    ) -> Result<Vec<Professional>, DatabaseError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<Notification, DatabaseError>;
    async fn due(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, DatabaseError>;
    async fn set_status(&self, id: Uuid, status: NotificationStatus)
        -> Result<(), DatabaseError>;
    async fn delete_pending_reminders(&self, appointment_id: Uuid)
        -> Result<u64, DatabaseError>;
    async fn for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Vec<Notification>, DatabaseError>;
}

/// Postgres-backed implementation of all store seams, delegating the SQL to
/// the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn create_checked(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        AppointmentRepository::lock_professional(&mut tx, appointment.professional_id).await?;
        if AppointmentRepository::has_conflict(
            &mut tx,
            appointment.professional_id,
            appointment.start_time,
            appointment.end_time,
            None,
        )
        .await?
        {
            return Err(DatabaseError::Conflict);
        }
        let created = AppointmentRepository::insert(&mut tx, &appointment).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn update_checked(
        &self,
        appointment: Appointment,
        recheck_conflict: bool,
    ) -> Result<Appointment, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if recheck_conflict {
            AppointmentRepository::lock_professional(&mut tx, appointment.professional_id)
                .await?;
            if AppointmentRepository::has_conflict(
                &mut tx,
                appointment.professional_id,
                appointment.start_time,
                appointment.end_time,
                Some(appointment.id),
            )
            .await?
            {
                return Err(DatabaseError::Conflict);
            }
        }
        let updated = AppointmentRepository::update(&mut tx, &appointment).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        AppointmentRepository::get(&self.pool, id).await
    }

    async fn busy_between(
        &self,
        professional_id: Uuid,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        AppointmentRepository::busy_between(&self.pool, professional_id, window_start, window_end)
            .await
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        AppointmentRepository::delete_cascade(&mut tx, id).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl WorkingHoursStore for PgStore {
    async fn day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
    ) -> Result<Option<DaySchedule>, DatabaseError> {
        let row = WorkingHoursRepository::get_day(&self.pool, owner_id, weekday).await?;
        Ok(row.map(|r| r.day_schedule()))
    }

    async fn set_day_schedule(
        &self,
        owner_id: Uuid,
        weekday: i16,
        schedule: DaySchedule,
    ) -> Result<(), DatabaseError> {
        WorkingHoursRepository::upsert_day(
            &self.pool,
            owner_id,
            weekday,
            schedule.is_open,
            &schedule.ranges,
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn salon(&self, id: Uuid) -> Result<Option<Salon>, DatabaseError> {
        CatalogRepository::salon(&self.pool, id).await
    }

    async fn client(&self, id: Uuid) -> Result<Option<Client>, DatabaseError> {
        CatalogRepository::client(&self.pool, id).await
    }

    async fn professional(&self, id: Uuid) -> Result<Option<Professional>, DatabaseError> {
        CatalogRepository::professional(&self.pool, id).await
    }

    async fn service(&self, id: Uuid) -> Result<Option<Service>, DatabaseError> {
        CatalogRepository::service(&self.pool, id).await
    }

    async fn active_professionals(
        &self,
        salon_id: Uuid,
        service_id: Option<Uuid>,
    ) -> Result<Vec<Professional>, DatabaseError> {
        CatalogRepository::active_professionals(&self.pool, salon_id, service_id).await
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn insert(&self, notification: Notification) -> Result<Notification, DatabaseError> {
        NotificationRepository::insert(&self.pool, &notification).await
    }

    async fn due(
        &self,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, DatabaseError> {
        NotificationRepository::due(&self.pool, now, limit).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), DatabaseError> {
        NotificationRepository::set_status(&self.pool, id, status).await
    }

    async fn delete_pending_reminders(
        &self,
        appointment_id: Uuid,
    ) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let removed =
            NotificationRepository::delete_pending_reminders(&mut tx, appointment_id).await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Vec<Notification>, DatabaseError> {
        NotificationRepository::for_appointment(&self.pool, appointment_id).await
    }
}
