//! Repositorio PostgreSQL de scooters

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::scooter::Scooter;
use crate::repositories::ScooterStore;
use crate::utils::errors::AppResult;

pub struct PgScooterStore {
    pool: PgPool,
}

impl PgScooterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScooterStore for PgScooterStore {
    async fn insert(&self, scooter: &Scooter) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO scooters (id, lat, lng, is_reserved, current_rental_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&scooter.id)
        .bind(scooter.lat)
        .bind(scooter.lng)
        .bind(scooter.is_reserved)
        .bind(scooter.current_rental_id)
        .bind(scooter.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Scooter>> {
        let scooter = sqlx::query_as::<_, Scooter>("SELECT * FROM scooters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(scooter)
    }

    async fn find_available(&self) -> AppResult<Vec<Scooter>> {
        let scooters = sqlx::query_as::<_, Scooter>(
            "SELECT * FROM scooters WHERE is_reserved = FALSE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(scooters)
    }

    async fn find_all(&self) -> AppResult<Vec<Scooter>> {
        let scooters = sqlx::query_as::<_, Scooter>("SELECT * FROM scooters ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(scooters)
    }

    async fn claim(&self, id: &str, rental_id: Uuid) -> AppResult<bool> {
        // Guard en la propia sentencia: la fila solo se toca si sigue libre
        let result = sqlx::query(
            r#"
            UPDATE scooters
            SET is_reserved = TRUE, current_rental_id = $2
            WHERE id = $1 AND is_reserved = FALSE
            "#,
        )
        .bind(id)
        .bind(rental_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn release(&self, id: &str, lat: f64, lng: f64) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE scooters
            SET is_reserved = FALSE, lat = $2, lng = $3, current_rental_id = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(lat)
        .bind(lng)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_location(&self, id: &str, lat: f64, lng: f64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE scooters SET lat = $2, lng = $3 WHERE id = $1")
            .bind(id)
            .bind(lat)
            .bind(lng)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_available(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM scooters WHERE id = $1 AND is_reserved = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
