use crate::db::models::{Client, Professional, Salon, Service};
use crate::db::DatabaseError;
use sqlx::PgPool;
use uuid::Uuid;

/// Read-only access to the catalog entities the scheduling core references.
/// Their CRUD lives outside the core; the booking path only needs lookups.
pub struct CatalogRepository;

impl CatalogRepository {
    pub async fn salon(pool: &PgPool, id: Uuid) -> Result<Option<Salon>, DatabaseError> {
        let row = sqlx::query_as::<_, Salon>(
            "SELECT id, name, created_at FROM salons WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn client(pool: &PgPool, id: Uuid) -> Result<Option<Client>, DatabaseError> {
        let row = sqlx::query_as::<_, Client>(
            "SELECT id, salon_id, name, phone, created_at FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn professional(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<Professional>, DatabaseError> {
        let row = sqlx::query_as::<_, Professional>(
            "SELECT id, salon_id, name, active, created_at FROM professionals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub async fn service(pool: &PgPool, id: Uuid) -> Result<Option<Service>, DatabaseError> {
        let row = sqlx::query_as::<_, Service>(
            "SELECT id, salon_id, name, duration_minutes, price_cents, active, created_at \
             FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Active professionals of a salon, optionally narrowed to those
    /// qualified for a service.
    pub async fn active_professionals(
        pool: &PgPool,
        salon_id: Uuid,
        service_id: Option<Uuid>,
    ) -> Result<Vec<Professional>, DatabaseError> {
        let rows = match service_id {
            Some(service_id) => {
                sqlx::query_as::<_, Professional>(
                    r#"
                    SELECT p.id, p.salon_id, p.name, p.active, p.created_at
                    FROM professionals p
                    JOIN professional_services ps ON ps.professional_id = p.id
                    WHERE p.salon_id = $1 AND p.active AND ps.service_id = $2
                    ORDER BY p.name
                    "#,
                )
                .bind(salon_id)
                .bind(service_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Professional>(
                    "SELECT id, salon_id, name, active, created_at \
                     FROM professionals WHERE salon_id = $1 AND active ORDER BY name",
                )
                .bind(salon_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(rows)
    }
}
