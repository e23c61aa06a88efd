use crate::db::models::{Notification, NotificationStatus};
use crate::db::DatabaseError;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, appointment_id, kind, status, scheduled_for, payload, created_at";

pub struct NotificationRepository;

impl NotificationRepository {
    pub async fn insert(
        pool: &PgPool,
        notification: &Notification,
    ) -> Result<Notification, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO notifications
                (id, appointment_id, kind, status, scheduled_for, payload, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Notification>(&sql)
            .bind(notification.id)
            .bind(notification.appointment_id)
            .bind(notification.kind)
            .bind(notification.status)
            .bind(notification.scheduled_for)
            .bind(&notification.payload)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Pending notifications whose fire time has passed (or which were
    /// scheduled for immediate delivery). The external dispatcher polls this.
    pub async fn due(
        pool: &PgPool,
        now: OffsetDateTime,
        limit: i64,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let sql = format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE status = 'pending'
              AND (scheduled_for IS NULL OR scheduled_for <= $1)
            ORDER BY scheduled_for NULLS FIRST, created_at
            LIMIT $2
            "#
        );
        let rows = sqlx::query_as::<_, Notification>(&sql)
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE notifications SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    /// Removes reminder rows that have not been sent yet so they can be
    /// recreated after an appointment's start time changes.
    pub async fn delete_pending_reminders(
        tx: &mut Transaction<'_, Postgres>,
        appointment_id: Uuid,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE appointment_id = $1
              AND kind = 'reminder'
              AND status = 'pending'
            "#,
        )
        .bind(appointment_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn for_appointment(
        pool: &PgPool,
        appointment_id: Uuid,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE appointment_id = $1 ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, Notification>(&sql)
            .bind(appointment_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}
