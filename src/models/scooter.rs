//! Modelo de Scooter
//!
//! Mapea exactamente a la tabla scooters. El flag `is_reserved` y la
//! referencia `current_rental_id` cambian juntos: el flag está activo
//! si y solo si hay un alquiler activo asociado.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Unidad física de la flota
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Scooter {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub is_reserved: bool,
    pub current_rental_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Scooter {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            is_reserved: false,
            current_rental_id: None,
            created_at: Utc::now(),
        }
    }
}
