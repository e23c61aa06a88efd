use crate::db::models::Appointment;
use crate::db::DatabaseError;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, salon_id, client_id, professional_id, service_id, \
     status, start_time, end_time, price_cents, notes, created_at, updated_at";

pub struct AppointmentRepository;

impl AppointmentRepository {
    /// Serializes every conflict-check-plus-write for one professional on a
    /// transaction-scoped advisory lock. Concurrent bookings for different
    /// professionals do not contend.
    pub async fn lock_professional(
        tx: &mut Transaction<'_, Postgres>,
        professional_id: Uuid,
    ) -> Result<(), DatabaseError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(professional_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// The conflict predicate in SQL: any non-cancelled appointment for the
    /// professional whose half-open interval overlaps [start, end).
    pub async fn has_conflict(
        tx: &mut Transaction<'_, Postgres>,
        professional_id: Uuid,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DatabaseError> {
        let conflict = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM appointments
                WHERE professional_id = $1
                  AND status <> 'cancelled'
                  AND start_time < $3
                  AND end_time > $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(professional_id)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(conflict)
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        appointment: &Appointment,
    ) -> Result<Appointment, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO appointments
                (id, salon_id, client_id, professional_id, service_id,
                 status, start_time, end_time, price_cents, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(appointment.id)
            .bind(appointment.salon_id)
            .bind(appointment.client_id)
            .bind(appointment.professional_id)
            .bind(appointment.service_id)
            .bind(appointment.status)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(appointment.price_cents)
            .bind(appointment.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        appointment: &Appointment,
    ) -> Result<Appointment, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE appointments
            SET status = $2,
                start_time = $3,
                end_time = $4,
                notes = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Appointment>(&sql)
            .bind(appointment.id)
            .bind(appointment.status)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(appointment.notes.as_deref())
            .fetch_optional(&mut **tx)
            .await
            .map_err(DatabaseError::from_sqlx)?
            .ok_or(DatabaseError::NotFound)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(appointment)
    }

    /// Non-cancelled appointments for a professional overlapping a time
    /// window, ordered by start. Feeds the availability busy set.
    pub async fn busy_between(
        pool: &PgPool,
        professional_id: Uuid,
        window_start: OffsetDateTime,
        window_end: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS} FROM appointments
            WHERE professional_id = $1
              AND status <> 'cancelled'
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time
            "#
        );
        let rows = sqlx::query_as::<_, Appointment>(&sql)
            .bind(professional_id)
            .bind(window_start)
            .bind(window_end)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Hard delete: notifications first, then the appointment, all inside the
    /// caller's transaction so a partial failure commits nothing.
    pub async fn delete_cascade(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM notifications WHERE appointment_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
