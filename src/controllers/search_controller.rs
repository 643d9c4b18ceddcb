//! Controlador de búsqueda de flota
//!
//! Camino de solo lectura, independiente de la máquina de reservas.
//! Escaneo lineal de los scooters libres: filtra por radio y ordena por
//! distancia ascendente.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::PricingConfig;
use crate::dto::scooter_dto::{ScooterResponse, ScooterSearchResult};
use crate::repositories::ScooterStore;
use crate::services::geo;
use crate::utils::errors::{validation_error_from, AppResult};
use crate::utils::validation::{validate_coordinates, validate_radius};

pub struct SearchController {
    scooters: Arc<dyn ScooterStore>,
    config: Arc<PricingConfig>,
}

impl SearchController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(state.scooters.clone(), state.pricing.clone())
    }

    pub fn with_stores(scooters: Arc<dyn ScooterStore>, config: Arc<PricingConfig>) -> Self {
        Self { scooters, config }
    }

    /// Todos los scooters libres
    pub async fn list_available(&self) -> AppResult<Vec<ScooterResponse>> {
        let scooters = self.scooters.find_available().await?;
        log::info!("Found {} available scooters", scooters.len());
        Ok(scooters.into_iter().map(ScooterResponse::from).collect())
    }

    /// Scooters libres dentro del radio, ordenados por distancia
    pub async fn search(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> AppResult<Vec<ScooterSearchResult>> {
        validate_coordinates(lat, lng).map_err(|e| validation_error_from("coordinates", e))?;
        validate_radius(radius_m, self.config.max_search_radius_m)
            .map_err(|e| validation_error_from("radius", e))?;

        let scooters = self.scooters.find_available().await?;

        let mut results: Vec<ScooterSearchResult> = scooters
            .iter()
            .filter_map(|scooter| {
                let distance = geo::distance_m(scooter.lat, scooter.lng, lat, lng);
                if distance <= radius_m {
                    Some(ScooterSearchResult {
                        id: scooter.id.clone(),
                        lat: scooter.lat,
                        lng: scooter.lng,
                        distance: (distance * 100.0).round() / 100.0,
                    })
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));

        log::info!(
            "Search completed: Found {} scooters within {}m",
            results.len(),
            radius_m
        );

        Ok(results)
    }
}
