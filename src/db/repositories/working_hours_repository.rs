use crate::db::models::{TimeRange, WorkingHours};
use crate::db::DatabaseError;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct WorkingHoursRepository;

impl WorkingHoursRepository {
    /// `owner_id` is a salon for the base schedule or a professional for an
    /// override. A missing row means the day is closed; the caller decides.
    pub async fn get_day(
        pool: &PgPool,
        owner_id: Uuid,
        weekday: i16,
    ) -> Result<Option<WorkingHours>, DatabaseError> {
        let row = sqlx::query_as::<_, WorkingHours>(
            "SELECT id, owner_id, weekday, is_open, ranges \
             FROM working_hours WHERE owner_id = $1 AND weekday = $2",
        )
        .bind(owner_id)
        .bind(weekday)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn upsert_day(
        pool: &PgPool,
        owner_id: Uuid,
        weekday: i16,
        is_open: bool,
        ranges: &[TimeRange],
    ) -> Result<WorkingHours, DatabaseError> {
        let row = sqlx::query_as::<_, WorkingHours>(
            r#"
            INSERT INTO working_hours (id, owner_id, weekday, is_open, ranges)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (owner_id, weekday)
            DO UPDATE SET is_open = EXCLUDED.is_open, ranges = EXCLUDED.ranges
            RETURNING id, owner_id, weekday, is_open, ranges
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(weekday)
        .bind(is_open)
        .bind(Json(ranges.to_vec()))
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}
