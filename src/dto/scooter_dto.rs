//! DTOs de scooters y búsqueda de flota

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::scooter::Scooter;

/// Request para dar de alta un scooter.
///
/// Las coordenadas se comprueban con `validation::validate_coordinates`
/// en el controlador.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScooterRequest {
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    pub lat: f64,
    pub lng: f64,
}

/// Request para reubicar un scooter
#[derive(Debug, Deserialize)]
pub struct UpdateScooterRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Response de scooter para la API
#[derive(Debug, Serialize)]
pub struct ScooterResponse {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub is_reserved: bool,
}

impl From<Scooter> for ScooterResponse {
    fn from(scooter: Scooter) -> Self {
        Self {
            id: scooter.id,
            lat: scooter.lat,
            lng: scooter.lng,
            is_reserved: scooter.is_reserved,
        }
    }
}

/// Parámetros de búsqueda por radio
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
}

/// Resultado de búsqueda, ordenado por distancia ascendente
#[derive(Debug, Serialize)]
pub struct ScooterSearchResult {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub distance: f64,
}

/// Estadísticas de flota para el panel de administración
#[derive(Debug, Serialize)]
pub struct FleetStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
}

#[derive(Debug, Serialize)]
pub struct FleetOverviewResponse {
    pub stats: FleetStats,
    pub scooters: Vec<ScooterResponse>,
}
