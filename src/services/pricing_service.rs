//! Motor de precios
//!
//! Calcula el coste de un alquiler a partir de dos instantes. Entre las
//! tarifas elegibles para la duración siempre gana la más barata: la lista
//! de candidatas se construye completa y se toma el mínimo, nunca una
//! cascada de prioridades que podría elegir mal en los bordes de banda.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PricingConfig;
use crate::models::pricing::{CostBreakdown, PricingTier};
use crate::utils::errors::{validation_error, AppResult};

/// Redondear a céntimos; solo se aplica a los valores finales
fn to_money(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default().round_dp(2)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Información de tarifas para mostrar al usuario
#[derive(Debug, Clone, Serialize)]
pub struct PricingInfo {
    pub unlock_fee: f64,
    pub hourly_rate: f64,
    pub min_charge_minutes: i64,
    pub daily_rate: f64,
    pub multiday_rates: BTreeMap<i64, f64>,
    pub weekly_rate: f64,
    pub monthly_rate: f64,
    pub grace_period_minutes: f64,
    pub max_duration_days: i64,
}

/// Motor de precios. Función pura sobre dos instantes más la configuración.
#[derive(Clone)]
pub struct PricingEngine {
    config: Arc<PricingConfig>,
}

impl PricingEngine {
    pub fn new(config: Arc<PricingConfig>) -> Self {
        Self { config }
    }

    /// Calcular el desglose de coste para el intervalo [start, end].
    ///
    /// Una duración negativa es un error de datos y se devuelve como error
    /// de validación, nunca se recorta a cero en silencio.
    pub fn compute_cost(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<CostBreakdown> {
        let duration = end.signed_duration_since(start);
        if duration < Duration::zero() {
            return Err(validation_error(
                "duration",
                "rental end time precedes start time",
            ));
        }

        let total_minutes = duration.num_milliseconds() as f64 / 60_000.0;
        let total_hours = total_minutes / 60.0;
        let total_days = total_hours / 24.0;

        log::info!(
            "Calculating rental cost: {:.1} minutes ({:.2} hours, {:.2} days)",
            total_minutes,
            total_hours,
            total_days
        );

        // Período de gracia, sin cargo
        if total_minutes <= self.config.grace_period_minutes {
            return Ok(CostBreakdown {
                duration_minutes: round1(total_minutes),
                duration_hours: round2(total_hours),
                duration_days: round2(total_days),
                pricing_tier: PricingTier::GracePeriod,
                unlock_fee: Decimal::ZERO,
                rental_fee: Decimal::ZERO,
                total_cost: Decimal::ZERO,
                description: "Grace period - no charge".to_string(),
            });
        }

        let (pricing_tier, rental_fee, description) =
            self.best_rate(total_minutes, total_hours, total_days);
        let total_cost = self.config.unlock_fee + rental_fee;

        Ok(CostBreakdown {
            duration_minutes: round1(total_minutes),
            duration_hours: round2(total_hours),
            duration_days: round2(total_days),
            pricing_tier,
            unlock_fee: to_money(self.config.unlock_fee),
            rental_fee: to_money(rental_fee),
            total_cost: to_money(total_cost),
            description,
        })
    }

    /// Determinar la tarifa más barata para la duración dada.
    fn best_rate(
        &self,
        total_minutes: f64,
        total_hours: f64,
        total_days: f64,
    ) -> (PricingTier, f64, String) {
        let cfg = &self.config;
        let mut options: Vec<(PricingTier, f64, String)> = Vec::new();

        // Tarifa horaria, siempre elegible: minutos enteros redondeados
        // hacia arriba al siguiente incremento de facturación
        let billable_minutes = total_minutes.max(cfg.min_charge_minutes as f64);
        let whole_minutes = billable_minutes as i64;
        let increments = (whole_minutes + cfg.min_charge_minutes - 1) / cfg.min_charge_minutes;
        let hourly_fee =
            increments as f64 * cfg.min_charge_minutes as f64 / 60.0 * cfg.hourly_rate;
        options.push((
            PricingTier::Hourly,
            hourly_fee,
            format!(
                "{} min @ ${}/hr",
                increments * cfg.min_charge_minutes,
                cfg.hourly_rate
            ),
        ));

        // Tarifa diaria / multi-día, elegible a partir de una hora
        if total_hours >= 1.0 {
            let days_needed = (total_days.ceil() as i64).max(1);
            if days_needed == 1 {
                options.push((
                    PricingTier::Daily,
                    cfg.daily_rate,
                    format!("1 day @ ${}", cfg.daily_rate),
                ));
            } else if let Some(rate) = cfg.multiday_rates.get(&days_needed) {
                options.push((
                    PricingTier::MultiDay,
                    *rate,
                    format!("{} days @ ${} (discounted)", days_needed, rate),
                ));
            } else if days_needed < 7 {
                // Días dentro de la banda multi-día pero fuera de la tabla
                let fee = cfg.daily_rate * days_needed as f64 * cfg.multiday_discount_factor;
                options.push((
                    PricingTier::MultiDay,
                    fee,
                    format!("{} days @ ${:.2} (15% off)", days_needed, fee),
                ));
            }
        }

        // Tarifa semanal: semanas completas más un cargo semanal extra
        // si queda una semana parcial
        if total_days >= cfg.weekly_threshold_days {
            let weeks_needed = ((total_days / 7.0).ceil() as i64).max(1);
            let remaining_days = total_days - (weeks_needed - 1) as f64 * 7.0;
            let (fee, description) = if weeks_needed == 1 {
                (cfg.weekly_rate, format!("1 week @ ${}", cfg.weekly_rate))
            } else {
                let fee = (weeks_needed - 1) as f64 * cfg.weekly_rate
                    + if remaining_days > 0.0 { cfg.weekly_rate } else { 0.0 };
                (
                    fee,
                    format!("{} weeks @ ${}/wk", weeks_needed, cfg.weekly_rate),
                )
            };
            options.push((PricingTier::Weekly, fee, description));
        }

        // Tarifa mensual por bloques de 30 días
        if total_days >= cfg.monthly_threshold_days {
            let months_needed = ((total_days / 30.0).ceil() as i64).max(1);
            let fee = months_needed as f64 * cfg.monthly_rate;
            options.push((
                PricingTier::Monthly,
                fee,
                format!("{} month(s) @ ${}/mo", months_needed, cfg.monthly_rate),
            ));
        }

        let best = options
            .into_iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .expect("at least the hourly rate is always eligible");

        log::info!(
            "Best rate for {:.2}h: {} = ${:.2}",
            total_hours,
            best.0,
            best.1
        );

        best
    }

    /// Estimar el coste de una duración dada, para previsualización.
    pub fn estimate_cost(
        &self,
        hours: Option<f64>,
        days: Option<f64>,
    ) -> AppResult<CostBreakdown> {
        let total_minutes = if let Some(d) = days {
            d * 24.0 * 60.0
        } else if let Some(h) = hours {
            h * 60.0
        } else {
            return Err(validation_error(
                "duration",
                "provide hours or days to estimate a cost",
            ));
        };

        if !total_minutes.is_finite() || total_minutes < 0.0 {
            return Err(validation_error("duration", "duration must be non-negative"));
        }

        let start = Utc::now();
        let end = start + Duration::milliseconds((total_minutes * 60_000.0) as i64);
        self.compute_cost(start, end)
    }

    /// Información de tarifas para mostrar al usuario
    pub fn pricing_info(&self) -> PricingInfo {
        let cfg = &self.config;
        PricingInfo {
            unlock_fee: cfg.unlock_fee,
            hourly_rate: cfg.hourly_rate,
            min_charge_minutes: cfg.min_charge_minutes,
            daily_rate: cfg.daily_rate,
            multiday_rates: cfg.multiday_rates.clone(),
            weekly_rate: cfg.weekly_rate,
            monthly_rate: cfg.monthly_rate,
            grace_period_minutes: cfg.grace_period_minutes,
            max_duration_days: cfg.max_rental_duration_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn engine() -> PricingEngine {
        PricingEngine::new(Arc::new(PricingConfig::default()))
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn cost_for_minutes(minutes: i64) -> CostBreakdown {
        let s = start();
        engine()
            .compute_cost(s, s + Duration::minutes(minutes))
            .unwrap()
    }

    fn money(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn one_minute_is_grace_period() {
        let cost = cost_for_minutes(1);
        assert_eq!(cost.pricing_tier, PricingTier::GracePeriod);
        assert_eq!(cost.total_cost, Decimal::ZERO);
        assert_eq!(cost.unlock_fee, Decimal::ZERO);
    }

    #[test]
    fn grace_period_boundary_is_inclusive() {
        let cost = cost_for_minutes(2);
        assert_eq!(cost.pricing_tier, PricingTier::GracePeriod);
        assert_eq!(cost.total_cost, Decimal::ZERO);
    }

    #[test]
    fn twenty_minutes_bills_two_hourly_increments() {
        let cost = cost_for_minutes(20);
        assert_eq!(cost.pricing_tier, PricingTier::Hourly);
        // ceil(20 / 15) = 2 incrementos, 30 min a $3.50/h
        assert_eq!(cost.rental_fee, money("1.75"));
        assert_eq!(cost.total_cost, money("2.75"));
    }

    #[test]
    fn short_ride_pays_minimum_increment() {
        let cost = cost_for_minutes(5);
        assert_eq!(cost.pricing_tier, PricingTier::Hourly);
        // 15 minutos mínimos a $3.50/h
        assert_eq!(cost.rental_fee, money("0.88"));
        assert_eq!(cost.total_cost, money("1.88"));
    }

    #[test]
    fn one_hour_prefers_hourly_over_daily() {
        let cost = cost_for_minutes(60);
        assert_eq!(cost.pricing_tier, PricingTier::Hourly);
        assert_eq!(cost.rental_fee, money("3.50"));
    }

    #[test]
    fn full_day_uses_daily_rate() {
        let cost = cost_for_minutes(24 * 60);
        assert_eq!(cost.pricing_tier, PricingTier::Daily);
        assert_eq!(cost.rental_fee, money("25.00"));
        assert_eq!(cost.total_cost, money("26.00"));
    }

    #[test]
    fn three_days_uses_discount_table_not_triple_daily() {
        let cost = cost_for_minutes(3 * 24 * 60);
        assert_eq!(cost.pricing_tier, PricingTier::MultiDay);
        // Entrada de la tabla para 3 días, no 3 x $25
        assert_eq!(cost.rental_fee, money("63.00"));
    }

    #[test]
    fn ten_days_uses_weekly_rate() {
        let cost = cost_for_minutes(10 * 24 * 60);
        assert_eq!(cost.pricing_tier, PricingTier::Weekly);
        // 1 semana completa + 1 cargo por semana parcial
        assert_eq!(cost.rental_fee, money("198.00"));
    }

    #[test]
    fn exactly_one_week_is_a_single_weekly_charge() {
        let cost = cost_for_minutes(7 * 24 * 60);
        assert_eq!(cost.pricing_tier, PricingTier::Weekly);
        assert_eq!(cost.rental_fee, money("99.00"));
    }

    #[test]
    fn twenty_two_days_prefers_monthly() {
        let cost = cost_for_minutes(22 * 24 * 60);
        assert_eq!(cost.pricing_tier, PricingTier::Monthly);
        assert_eq!(cost.rental_fee, money("299.00"));
    }

    #[test]
    fn negative_duration_is_a_validation_error() {
        let s = start();
        let result = engine().compute_cost(s, s - Duration::minutes(5));
        assert!(result.is_err());
    }

    #[test]
    fn total_includes_unlock_fee_beyond_grace() {
        let unlock = money("1.00");
        for minutes in [3, 20, 60, 300, 1440, 4320, 14400] {
            let cost = cost_for_minutes(minutes);
            assert!(
                cost.total_cost >= unlock,
                "{} min: total {} below unlock fee",
                minutes,
                cost.total_cost
            );
            assert_eq!(cost.total_cost, (cost.unlock_fee + cost.rental_fee).round_dp(2));
        }
    }

    #[test]
    fn selected_tier_is_minimal_across_eligible_tiers() {
        // Barrido de duraciones incluyendo los bordes de banda exactos
        let cfg = PricingConfig::default();
        let engine = engine();
        let durations_min: Vec<i64> = vec![
            3, 15, 16, 59, 60, 61, 420, 1439, 1440, 1441, 2880, 4320, 5760, 7200, 8640,
            10080, 10081, 12960, 14400, 17280, 20160, 28800, 43200, 44640,
        ];

        for minutes in durations_min {
            let cost = cost_for_minutes(minutes);
            let total_minutes = minutes as f64;
            let total_hours = total_minutes / 60.0;
            let total_days = total_hours / 24.0;

            // Recalcular cada tarifa elegible a mano
            let mut eligible: Vec<f64> = Vec::new();
            let billable = total_minutes.max(cfg.min_charge_minutes as f64);
            let increments =
                ((billable as i64) + cfg.min_charge_minutes - 1) / cfg.min_charge_minutes;
            eligible
                .push(increments as f64 * cfg.min_charge_minutes as f64 / 60.0 * cfg.hourly_rate);

            if total_hours >= 1.0 {
                let days_needed = (total_days.ceil() as i64).max(1);
                if days_needed == 1 {
                    eligible.push(cfg.daily_rate);
                } else if let Some(rate) = cfg.multiday_rates.get(&days_needed) {
                    eligible.push(*rate);
                } else if days_needed < 7 {
                    eligible.push(
                        cfg.daily_rate * days_needed as f64 * cfg.multiday_discount_factor,
                    );
                }
            }
            if total_days >= cfg.weekly_threshold_days {
                let weeks = ((total_days / 7.0).ceil() as i64).max(1);
                let remaining = total_days - (weeks - 1) as f64 * 7.0;
                eligible.push(if weeks == 1 {
                    cfg.weekly_rate
                } else {
                    (weeks - 1) as f64 * cfg.weekly_rate
                        + if remaining > 0.0 { cfg.weekly_rate } else { 0.0 }
                });
            }
            if total_days >= cfg.monthly_threshold_days {
                let months = ((total_days / 30.0).ceil() as i64).max(1);
                eligible.push(months as f64 * cfg.monthly_rate);
            }

            let minimum = eligible.iter().cloned().fold(f64::INFINITY, f64::min);
            assert_eq!(
                cost.rental_fee,
                to_money(minimum),
                "{} min: expected minimal fee {}, got {} ({})",
                minutes,
                minimum,
                cost.rental_fee,
                cost.description
            );
        }
    }

    #[test]
    fn estimate_requires_a_duration() {
        assert!(engine().estimate_cost(None, None).is_err());
    }

    #[test]
    fn estimate_matches_compute_for_days() {
        let estimate = engine().estimate_cost(None, Some(3.0)).unwrap();
        assert_eq!(estimate.pricing_tier, PricingTier::MultiDay);
        assert_eq!(estimate.rental_fee, money("63.00"));
    }

    #[test]
    fn pricing_info_exposes_the_tunables() {
        let info = engine().pricing_info();
        assert_eq!(info.unlock_fee, 1.00);
        assert_eq!(info.multiday_rates.get(&3), Some(&63.00));
        assert_eq!(info.max_duration_days, 30);
    }
}
