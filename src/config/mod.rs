//! Configuración de la aplicación

pub mod environment;
pub mod pricing;

pub use environment::EnvironmentConfig;
pub use pricing::PricingConfig;
