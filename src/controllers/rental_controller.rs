//! Controlador del ciclo de reserva
//!
//! Máquina de estados de scooters y alquileres. El scooter cicla
//! Available -> Reserved -> Available; el alquiler va de Active a
//! Completed y no vuelve. Los dos puntos de sincronización son las
//! actualizaciones condicionales del store: el claim sobre el flag de
//! reserva y la escritura de cierre guardada por "sigue activo".

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::dto::rental_dto::{
    ActiveRentalResponse, CostView, DurationView, EndReservationResponse, RentalHistoryResponse,
    RentalHistorySummary, RentalView, StartReservationResponse, TransactionView,
};
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::payment::ChargeTransaction;
use crate::models::rental::{Rental, RentalCompletion, STATUS_COMPLETED};
use crate::repositories::{RentalStore, ScooterStore, UserStore};
use crate::services::geo::{self, LatLng};
use crate::services::payment_service::{self, ReceiptRentalData};
use crate::services::PricingEngine;
use crate::utils::errors::{
    active_rental_exists_error, already_completed_error, already_reserved_error,
    no_active_reservation_error, not_found_error, validation_error_from, AppError, AppResult,
};
use crate::utils::validation::{validate_coordinates, validate_scooter_id};

pub struct RentalController {
    scooters: Arc<dyn ScooterStore>,
    rentals: Arc<dyn RentalStore>,
    users: Arc<dyn UserStore>,
    pricing: PricingEngine,
}

impl RentalController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(
            state.scooters.clone(),
            state.rentals.clone(),
            state.users.clone(),
            state.pricing.clone(),
        )
    }

    pub fn with_stores(
        scooters: Arc<dyn ScooterStore>,
        rentals: Arc<dyn RentalStore>,
        users: Arc<dyn UserStore>,
        pricing: Arc<PricingConfig>,
    ) -> Self {
        Self {
            scooters,
            rentals,
            users,
            pricing: PricingEngine::new(pricing),
        }
    }

    /// Iniciar una reserva reclamando el scooter en exclusiva.
    pub async fn start_reservation(
        &self,
        user: &AuthenticatedUser,
        scooter_id: &str,
    ) -> AppResult<StartReservationResponse> {
        let scooter_id = validate_scooter_id(scooter_id)
            .map_err(|e| validation_error_from("scooter_id", e))?;

        // Un solo alquiler activo por usuario. La ventana entre esta
        // comprobación y el claim es estrecha y la cierra el guard del
        // scooter, que es el crítico para no duplicar reservas.
        if let Some(active) = self.rentals.find_active_by_user(user.user_id).await? {
            log::warn!(
                "User {} already has active rental: {}",
                user.email,
                active.scooter_id
            );
            return Err(active_rental_exists_error(&active.scooter_id));
        }

        let scooter = self
            .scooters
            .find_by_id(&scooter_id)
            .await?
            .ok_or_else(|| not_found_error("Scooter", &scooter_id))?;

        let rental_id = Uuid::new_v4();
        let start_time = Utc::now();

        // Actualización condicional única: si dos peticiones compiten,
        // exactamente una observa true
        if !self.scooters.claim(&scooter_id, rental_id).await? {
            log::warn!("Reservation failed: Scooter {} is already reserved", scooter_id);
            return Err(already_reserved_error(&scooter_id));
        }

        let rental = Rental::started(rental_id, &scooter, user.user_id, &user.email, start_time);
        self.rentals.insert(&rental).await?;

        log::info!(
            "🛴 Scooter {} reservado por {} (rental: {})",
            scooter_id,
            user.email,
            rental_id
        );

        Ok(StartReservationResponse {
            rental_id,
            scooter_id,
            start_time,
            pricing: self.pricing.pricing_info(),
        })
    }

    /// Terminar una reserva: calcular coste, liquidar y liberar el scooter.
    pub async fn end_reservation(
        &self,
        user: &AuthenticatedUser,
        scooter_id: &str,
        end_lat: f64,
        end_lng: f64,
    ) -> AppResult<EndReservationResponse> {
        let scooter_id = validate_scooter_id(scooter_id)
            .map_err(|e| validation_error_from("scooter_id", e))?;
        validate_coordinates(end_lat, end_lng)
            .map_err(|e| validation_error_from("coordinates", e))?;

        self.scooters
            .find_by_id(&scooter_id)
            .await?
            .ok_or_else(|| not_found_error("Scooter", &scooter_id))?;

        let rental = self
            .rentals
            .find_active_by_scooter(&scooter_id)
            .await?
            .ok_or_else(|| no_active_reservation_error(&scooter_id))?;

        if rental.user_id != user.user_id && !user.is_admin() {
            log::warn!(
                "User {} tried to end rental owned by {}",
                user.email,
                rental.user_email
            );
            return Err(AppError::Forbidden(
                "You can only end your own rentals".to_string(),
            ));
        }

        let end_time = Utc::now();

        // Una duración negativa es un error de datos y se devuelve como
        // tal antes de tocar nada
        let cost = self.pricing.compute_cost(rental.start_time, end_time)?;

        // Distancia recorrida, solo informativa, no se factura
        let distance_m =
            geo::distance_m(rental.start_lat, rental.start_lng, end_lat, end_lng);

        let renter = self.users.find_by_id(rental.user_id).await?;
        let payment_method = renter
            .as_ref()
            .and_then(|u| u.payment_method.as_ref().map(|m| m.0.clone()));

        let settlement = payment_service::simulate_charge(
            cost.total_cost,
            payment_method.as_ref(),
            &format!("Scooter Rental - {}", scooter_id),
        );
        let (transaction, settlement_error) = match settlement {
            Ok(txn) => (Some(txn), None),
            Err(e) => {
                log::warn!("💳 Settlement failed for rental {}: {}", rental.id, e);
                (None, Some(e.to_string()))
            }
        };

        // Escritura de cierre guardada: si otra devolución concurrente ya
        // completó este alquiler, aquí se detecta y no se liquida de nuevo
        let completion = RentalCompletion {
            end_time,
            end_lat,
            end_lng,
            cost: cost.clone(),
            transaction: transaction.clone(),
            distance_traveled_m: distance_m,
        };
        let completed = self
            .rentals
            .complete(rental.id, &completion)
            .await?
            .ok_or_else(|| already_completed_error(rental.id))?;

        // El estado físico de la flota se actualiza aunque la liquidación
        // haya fallado por falta de método de pago
        self.scooters.release(&scooter_id, end_lat, end_lng).await?;

        log::info!(
            "🛴 Reserva terminada para scooter {} por {}, coste: ${}, txn: {:?}",
            scooter_id,
            user.email,
            cost.total_cost,
            transaction.as_ref().map(|t| t.transaction_id.as_str())
        );

        let receipt_data = ReceiptRentalData {
            rental_id: completed.id,
            scooter_id: completed.scooter_id.clone(),
            start_time: completed.start_time,
            end_time,
            start_location: LatLng {
                lat: completed.start_lat,
                lng: completed.start_lng,
            },
            end_location: LatLng {
                lat: end_lat,
                lng: end_lng,
            },
            distance_traveled_m: distance_m,
        };
        let receipt = payment_service::generate_receipt(
            &receipt_data,
            &cost,
            transaction.as_ref(),
            renter.as_ref(),
        );

        Ok(EndReservationResponse {
            rental_id: completed.id,
            scooter_id: completed.scooter_id.clone(),
            transaction: transaction.as_ref().map(transaction_view),
            settlement_error,
            duration: DurationView {
                minutes: cost.duration_minutes,
                hours: cost.duration_hours,
                days: cost.duration_days,
            },
            distance_traveled_m: distance_m.round(),
            cost: CostView {
                unlock_fee: cost.unlock_fee,
                rental_fee: cost.rental_fee,
                total: cost.total_cost,
                pricing_tier: cost.pricing_tier,
                description: cost.description.clone(),
            },
            receipt,
        })
    }

    /// Liberación forzada por un administrador.
    ///
    /// Completa el alquiler activo por el camino normal usando la
    /// ubicación actual del scooter, así los invariantes scooter/alquiler
    /// se conservan.
    pub async fn force_release(
        &self,
        admin: &AuthenticatedUser,
        scooter_id: &str,
    ) -> AppResult<EndReservationResponse> {
        require_admin(admin)?;

        let scooter = self
            .scooters
            .find_by_id(scooter_id)
            .await?
            .ok_or_else(|| not_found_error("Scooter", scooter_id))?;

        log::warn!(
            "⚠️ Scooter {} liberado a la fuerza por admin {}",
            scooter_id,
            admin.email
        );
        self.end_reservation(admin, scooter_id, scooter.lat, scooter.lng)
            .await
    }

    /// Alquiler activo del usuario, con estimación de coste en curso.
    pub async fn active_rental(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<ActiveRentalResponse> {
        match self.rentals.find_active_by_user(user.user_id).await? {
            Some(rental) => {
                let estimate = self.pricing.compute_cost(rental.start_time, Utc::now())?;
                Ok(ActiveRentalResponse {
                    has_active_rental: true,
                    rental: Some(rental.into()),
                    current_cost_estimate: Some(estimate),
                })
            }
            None => Ok(ActiveRentalResponse {
                has_active_rental: false,
                rental: None,
                current_cost_estimate: None,
            }),
        }
    }

    /// Histórico de alquileres del usuario, más recientes primero.
    pub async fn rental_history(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<RentalHistoryResponse> {
        let rentals = self.rentals.find_by_user(user.user_id, 50).await?;

        let total_spent = rentals
            .iter()
            .filter(|r| r.status == STATUS_COMPLETED)
            .filter_map(|r| r.cost.as_ref().map(|c| c.0.total_cost))
            .sum();
        let total_rentals = rentals
            .iter()
            .filter(|r| r.status == STATUS_COMPLETED)
            .count();
        let has_active_rental = rentals.iter().any(|r| r.is_active());

        Ok(RentalHistoryResponse {
            rentals: rentals.into_iter().map(RentalView::from).collect(),
            summary: RentalHistorySummary {
                total_rentals,
                total_spent,
                has_active_rental,
            },
        })
    }
}

fn transaction_view(txn: &ChargeTransaction) -> TransactionView {
    TransactionView {
        id: txn.transaction_id.clone(),
        authorization_code: txn.authorization_code.clone(),
        status: txn.status.clone(),
        card: format!("{} ****{}", txn.card_type, txn.card_last_four),
        is_simulation: txn.is_simulation,
    }
}
