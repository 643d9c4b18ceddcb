//! Services module
//!
//! Este módulo contiene la lógica de negocio pura: el motor de precios,
//! el simulador de cobros y las utilidades geográficas. Ninguno de estos
//! servicios persiste estado propio; reciben entradas y devuelven valores
//! que los controladores persisten.

pub mod geo;
pub mod payment_service;
pub mod pricing_service;

pub use pricing_service::PricingEngine;
