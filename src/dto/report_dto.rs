//! DTOs de informes de administración

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::rental_dto::RentalView;

/// Filtros del informe de alquileres
#[derive(Debug, Deserialize)]
pub struct RentalReportQuery {
    /// 'active', 'completed' o 'all'
    pub status: Option<String>,
    /// Ventana hacia atrás en días, 0 para todo el histórico
    pub days: Option<i64>,
    pub user_id: Option<Uuid>,
    pub scooter_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RentalReportResponse {
    pub count: usize,
    pub rentals: Vec<RentalView>,
}

/// Totales de ingresos de una ventana temporal
#[derive(Debug, Serialize)]
pub struct RevenueWindow {
    pub total_revenue: Decimal,
    pub total_rentals: usize,
    pub avg_rental: Decimal,
    pub total_unlock_fees: Decimal,
    pub total_rental_fees: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RevenueReportResponse {
    pub all_time: RevenueWindow,
    pub today: RevenueWindow,
    pub this_week: RevenueWindow,
    pub this_month: RevenueWindow,
}
