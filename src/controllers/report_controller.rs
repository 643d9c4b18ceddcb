//! Controlador de informes de administración
//!
//! Histórico de alquileres filtrable y resumen de ingresos por ventanas
//! temporales. Los totales se calculan sobre los alquileres completados;
//! el escaneo lineal es suficiente al tamaño de flota contemplado.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::dto::rental_dto::RentalView;
use crate::dto::report_dto::{
    RentalReportQuery, RentalReportResponse, RevenueReportResponse, RevenueWindow,
};
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::rental::{Rental, STATUS_ACTIVE, STATUS_COMPLETED};
use crate::repositories::{RentalFilter, RentalStore};
use crate::utils::errors::{validation_error, AppResult};

pub struct ReportController {
    rentals: Arc<dyn RentalStore>,
}

impl ReportController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(state.rentals.clone())
    }

    pub fn with_stores(rentals: Arc<dyn RentalStore>) -> Self {
        Self { rentals }
    }

    /// Histórico de alquileres con filtros opcionales
    pub async fn rentals_report(
        &self,
        admin: &AuthenticatedUser,
        query: RentalReportQuery,
    ) -> AppResult<RentalReportResponse> {
        require_admin(admin)?;

        let status = match query.status.as_deref() {
            None | Some("all") => None,
            Some(STATUS_ACTIVE) => Some(STATUS_ACTIVE.to_string()),
            Some(STATUS_COMPLETED) => Some(STATUS_COMPLETED.to_string()),
            Some(_) => {
                return Err(validation_error(
                    "status",
                    "Status must be 'active', 'completed' or 'all'",
                ))
            }
        };

        let days = query.days.unwrap_or(30);
        let since = if days > 0 {
            Some(Utc::now() - Duration::days(days))
        } else {
            None
        };

        let filter = RentalFilter {
            status,
            since,
            user_id: query.user_id,
            scooter_id: query.scooter_id,
        };
        let rentals = self.rentals.find_filtered(&filter).await?;

        log::info!("Retrieved {} rentals for report", rentals.len());

        Ok(RentalReportResponse {
            count: rentals.len(),
            rentals: rentals.into_iter().map(RentalView::from).collect(),
        })
    }

    /// Resumen de ingresos por ventanas temporales
    pub async fn revenue_report(
        &self,
        admin: &AuthenticatedUser,
    ) -> AppResult<RevenueReportResponse> {
        require_admin(admin)?;

        let filter = RentalFilter {
            status: Some(STATUS_COMPLETED.to_string()),
            ..Default::default()
        };
        let completed = self.rentals.find_filtered(&filter).await?;

        let now = Utc::now();
        let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let week_start =
            today_start - Duration::days(now.date_naive().weekday().num_days_from_monday() as i64);
        let month_start = today_start - Duration::days(now.date_naive().day0() as i64);

        Ok(RevenueReportResponse {
            all_time: revenue_window(&completed, None),
            today: revenue_window(&completed, Some(today_start)),
            this_week: revenue_window(&completed, Some(week_start)),
            this_month: revenue_window(&completed, Some(month_start)),
        })
    }
}

fn revenue_window(completed: &[Rental], cutoff: Option<DateTime<Utc>>) -> RevenueWindow {
    let in_window: Vec<&Rental> = completed
        .iter()
        .filter(|r| match cutoff {
            Some(cutoff) => r.end_time.map_or(false, |end| end >= cutoff),
            None => true,
        })
        .collect();

    let mut total_revenue = Decimal::ZERO;
    let mut total_unlock_fees = Decimal::ZERO;
    let mut total_rental_fees = Decimal::ZERO;

    for rental in &in_window {
        if let Some(cost) = rental.cost.as_ref() {
            total_revenue += cost.0.total_cost;
            total_unlock_fees += cost.0.unlock_fee;
            total_rental_fees += cost.0.rental_fee;
        }
    }

    let total_rentals = in_window.len();
    let avg_rental = if total_rentals > 0 {
        (total_revenue / Decimal::from(total_rentals as i64)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    RevenueWindow {
        total_revenue,
        total_rentals,
        avg_rental,
        total_unlock_fees,
        total_rental_fees,
    }
}
