//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los stores se exponen como trait objects
//! para que los controladores no dependan del backend concreto.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{EnvironmentConfig, PricingConfig};
use crate::repositories::{
    PgRentalStore, PgScooterStore, PgUserStore, RentalStore, ScooterStore, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub pricing: Arc<PricingConfig>,
    pub scooters: Arc<dyn ScooterStore>,
    pub rentals: Arc<dyn RentalStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            scooters: Arc::new(PgScooterStore::new(pool.clone())),
            rentals: Arc::new(PgRentalStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            pricing: Arc::new(PricingConfig::default()),
            pool,
            config,
        }
    }
}
