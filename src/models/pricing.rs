//! Tipos del motor de precios

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tarifa seleccionada para un alquiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    GracePeriod,
    Hourly,
    Daily,
    MultiDay,
    Weekly,
    Monthly,
}

impl std::fmt::Display for PricingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PricingTier::GracePeriod => "grace_period",
            PricingTier::Hourly => "hourly",
            PricingTier::Daily => "daily",
            PricingTier::MultiDay => "multi_day",
            PricingTier::Weekly => "weekly",
            PricingTier::Monthly => "monthly",
        };
        write!(f, "{}", name)
    }
}

/// Desglose de coste de un alquiler. Inmutable una vez calculado.
///
/// Las duraciones se redondean solo para presentación; el redondeo a
/// céntimos ocurre únicamente en los campos monetarios finales.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    pub duration_minutes: f64,
    pub duration_hours: f64,
    pub duration_days: f64,
    pub pricing_tier: PricingTier,
    pub unlock_fee: Decimal,
    pub rental_fee: Decimal,
    pub total_cost: Decimal,
    pub description: String,
}
