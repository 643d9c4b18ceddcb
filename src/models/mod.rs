//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod payment;
pub mod pricing;
pub mod rental;
pub mod scooter;
pub mod user;
