//! DTOs del ciclo de alquiler

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::pricing::{CostBreakdown, PricingTier};
use crate::models::rental::Rental;
use crate::services::geo::LatLng;
use crate::services::payment_service::Receipt;
use crate::services::pricing_service::PricingInfo;

/// Request para iniciar una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct StartReservationRequest {
    #[validate(length(min = 1, max = 100))]
    pub scooter_id: String,
}

/// Request para terminar una reserva en unas coordenadas finales.
///
/// Las coordenadas se comprueban en el controlador junto al resto de
/// precondiciones.
#[derive(Debug, Deserialize, Validate)]
pub struct EndReservationRequest {
    #[validate(length(min = 1, max = 100))]
    pub scooter_id: String,

    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct StartReservationResponse {
    pub rental_id: Uuid,
    pub scooter_id: String,
    pub start_time: DateTime<Utc>,
    pub pricing: PricingInfo,
}

#[derive(Debug, Serialize)]
pub struct DurationView {
    pub minutes: f64,
    pub hours: f64,
    pub days: f64,
}

#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub authorization_code: String,
    pub status: String,
    pub card: String,
    pub is_simulation: bool,
}

#[derive(Debug, Serialize)]
pub struct CostView {
    pub unlock_fee: Decimal,
    pub rental_fee: Decimal,
    pub total: Decimal,
    pub pricing_tier: PricingTier,
    pub description: String,
}

/// Vista de recibo devuelta al terminar una reserva
#[derive(Debug, Serialize)]
pub struct EndReservationResponse {
    pub rental_id: Uuid,
    pub scooter_id: String,
    pub transaction: Option<TransactionView>,
    /// Fallo blando de liquidación, presente cuando no hubo cobro
    pub settlement_error: Option<String>,
    pub duration: DurationView,
    pub distance_traveled_m: f64,
    pub cost: CostView,
    pub receipt: Receipt,
}

/// Vista de un alquiler para históricos e informes
#[derive(Debug, Serialize)]
pub struct RentalView {
    pub id: Uuid,
    pub scooter_id: String,
    pub user_email: String,
    pub start_time: DateTime<Utc>,
    pub start_location: LatLng,
    pub end_time: Option<DateTime<Utc>>,
    pub end_location: Option<LatLng>,
    pub status: String,
    pub distance_traveled_m: Option<f64>,
    pub cost: Option<CostBreakdown>,
}

impl From<Rental> for RentalView {
    fn from(rental: Rental) -> Self {
        let end_location = match (rental.end_lat, rental.end_lng) {
            (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
            _ => None,
        };

        Self {
            id: rental.id,
            scooter_id: rental.scooter_id,
            user_email: rental.user_email,
            start_time: rental.start_time,
            start_location: LatLng {
                lat: rental.start_lat,
                lng: rental.start_lng,
            },
            end_time: rental.end_time,
            end_location,
            status: rental.status,
            distance_traveled_m: rental.distance_traveled_m,
            cost: rental.cost.map(|c| c.0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActiveRentalResponse {
    pub has_active_rental: bool,
    pub rental: Option<RentalView>,
    pub current_cost_estimate: Option<CostBreakdown>,
}

#[derive(Debug, Serialize)]
pub struct RentalHistorySummary {
    pub total_rentals: usize,
    pub total_spent: Decimal,
    pub has_active_rental: bool,
}

#[derive(Debug, Serialize)]
pub struct RentalHistoryResponse {
    pub rentals: Vec<RentalView>,
    pub summary: RentalHistorySummary,
}

/// Parámetros de la previsualización de coste
#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub hours: Option<f64>,
    pub days: Option<f64>,
}
