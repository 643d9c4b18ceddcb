//! Configuración de precios del alquiler
//!
//! Todas las tarifas en USD. Estos valores se leen una sola vez al arrancar
//! y se comparten como objeto de configuración estático.

use std::collections::BTreeMap;

/// Tarifas y umbrales del motor de precios
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Cuota fija de desbloqueo cobrada en cada alquiler
    pub unlock_fee: f64,
    /// Tarifa por hora
    pub hourly_rate: f64,
    /// Incremento mínimo de facturación en minutos
    pub min_charge_minutes: i64,
    /// Tarifa por día (24 horas)
    pub daily_rate: f64,
    /// Tarifas con descuento para 2-6 días, por número de días
    pub multiday_rates: BTreeMap<i64, f64>,
    /// Factor aplicado a días fuera de la tabla multi-día (15% de descuento)
    pub multiday_discount_factor: f64,
    /// Tarifa semanal (7 días)
    pub weekly_rate: f64,
    /// Días a partir de los cuales la tarifa semanal es elegible
    pub weekly_threshold_days: f64,
    /// Tarifa mensual (30 días)
    pub monthly_rate: f64,
    /// Días a partir de los cuales la tarifa mensual es elegible
    pub monthly_threshold_days: f64,
    /// Período de gracia en minutos, sin cargo
    pub grace_period_minutes: f64,
    /// Duración máxima de alquiler en días (informativo)
    pub max_rental_duration_days: i64,
    /// Radio máximo de búsqueda en metros
    pub max_search_radius_m: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        let mut multiday_rates = BTreeMap::new();
        multiday_rates.insert(2, 45.00); // 10% off
        multiday_rates.insert(3, 63.00); // 16% off
        multiday_rates.insert(4, 80.00); // 20% off
        multiday_rates.insert(5, 95.00); // 24% off
        multiday_rates.insert(6, 108.00); // 28% off

        Self {
            unlock_fee: 1.00,
            hourly_rate: 3.50,
            min_charge_minutes: 15,
            daily_rate: 25.00,
            multiday_rates,
            multiday_discount_factor: 0.85,
            weekly_rate: 99.00,
            weekly_threshold_days: 5.0,
            monthly_rate: 299.00,
            monthly_threshold_days: 12.0,
            grace_period_minutes: 2.0,
            max_rental_duration_days: 30,
            max_search_radius_m: 50_000.0,
        }
    }
}
