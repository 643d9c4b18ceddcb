//! Modelo de Rental
//!
//! Un ciclo completo de préstamo y devolución de un scooter. El registro se
//! crea al reclamar, se muta una sola vez al completarse y nunca se borra
//! (histórico append-only).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::payment::ChargeTransaction;
use crate::models::pricing::CostBreakdown;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub scooter_id: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub start_time: DateTime<Utc>,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_time: Option<DateTime<Utc>>,
    pub end_lat: Option<f64>,
    pub end_lng: Option<f64>,
    pub status: String,
    pub distance_traveled_m: Option<f64>,
    pub cost: Option<Json<CostBreakdown>>,
    pub transaction: Option<Json<ChargeTransaction>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Rental {
    /// Crear el registro de un alquiler recién reclamado.
    ///
    /// La ubicación inicial se copia del scooter en el momento del claim.
    pub fn started(
        id: Uuid,
        scooter: &crate::models::scooter::Scooter,
        user_id: Uuid,
        user_email: &str,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            scooter_id: scooter.id.clone(),
            user_id,
            user_email: user_email.to_string(),
            start_time,
            start_lat: scooter.lat,
            start_lng: scooter.lng,
            end_time: None,
            end_lat: None,
            end_lng: None,
            status: STATUS_ACTIVE.to_string(),
            distance_traveled_m: None,
            cost: None,
            transaction: None,
            created_at: start_time,
            completed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Datos de cierre de un alquiler.
///
/// Se aplican en una única escritura condicionada a que el alquiler siga
/// activo, para que dos devoluciones concurrentes no liquiden dos veces.
#[derive(Debug, Clone)]
pub struct RentalCompletion {
    pub end_time: DateTime<Utc>,
    pub end_lat: f64,
    pub end_lng: f64,
    pub cost: CostBreakdown,
    pub transaction: Option<ChargeTransaction>,
    pub distance_traveled_m: f64,
}
