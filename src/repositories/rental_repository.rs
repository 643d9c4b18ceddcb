//! Repositorio PostgreSQL de alquileres

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rental::{Rental, RentalCompletion, STATUS_ACTIVE, STATUS_COMPLETED};
use crate::repositories::{RentalFilter, RentalStore};
use crate::utils::errors::AppResult;

pub struct PgRentalStore {
    pool: PgPool,
}

impl PgRentalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalStore for PgRentalStore {
    async fn insert(&self, rental: &Rental) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rentals (
                id, scooter_id, user_id, user_email, start_time, start_lat, start_lng,
                end_time, end_lat, end_lng, status, distance_traveled_m, cost,
                transaction, created_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(rental.id)
        .bind(&rental.scooter_id)
        .bind(rental.user_id)
        .bind(&rental.user_email)
        .bind(rental.start_time)
        .bind(rental.start_lat)
        .bind(rental.start_lng)
        .bind(rental.end_time)
        .bind(rental.end_lat)
        .bind(rental.end_lng)
        .bind(&rental.status)
        .bind(rental.distance_traveled_m)
        .bind(rental.cost.as_ref())
        .bind(rental.transaction.as_ref())
        .bind(rental.created_at)
        .bind(rental.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rental)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }

    async fn find_active_by_scooter(&self, scooter_id: &str) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE scooter_id = $1 AND status = $2",
        )
        .bind(scooter_id)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }

    async fn complete(
        &self,
        id: Uuid,
        completion: &RentalCompletion,
    ) -> AppResult<Option<Rental>> {
        // Guard "sigue activo" en la misma sentencia: una devolución
        // reintentada en paralelo no puede liquidar dos veces
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            UPDATE rentals
            SET end_time = $2, end_lat = $3, end_lng = $4, status = $5,
                distance_traveled_m = $6, cost = $7, transaction = $8, completed_at = $2
            WHERE id = $1 AND status = $9
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(completion.end_time)
        .bind(completion.end_lat)
        .bind(completion.end_lng)
        .bind(STATUS_COMPLETED)
        .bind(completion.distance_traveled_m)
        .bind(Json(completion.cost.clone()))
        .bind(completion.transaction.clone().map(Json))
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }

    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            "SELECT * FROM rentals WHERE user_id = $1 ORDER BY start_time DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    async fn find_filtered(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::timestamptz IS NULL OR start_time >= $2)
              AND ($3::uuid IS NULL OR user_id = $3)
              AND ($4::text IS NULL OR scooter_id = $4)
            ORDER BY start_time DESC
            "#,
        )
        .bind(filter.status.as_deref())
        .bind(filter.since)
        .bind(filter.user_id)
        .bind(filter.scooter_id.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }
}
