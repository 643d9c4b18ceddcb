//! Simulador de cobros
//!
//! Simula cargos a tarjeta y genera recibos. Es una SIMULACIÓN: no conecta
//! con ningún procesador real. Con un instrumento presente el cargo siempre
//! se aprueba; la única forma de fallo es la ausencia de método de pago.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::payment::{ChargeTransaction, PaymentMethod};
use crate::models::pricing::{CostBreakdown, PricingTier};
use crate::models::user::User;
use crate::services::geo::LatLng;

/// Fallo blando de liquidación. Se registra junto al alquiler completado,
/// nunca impide la liberación física del scooter.
#[derive(Error, Debug, PartialEq)]
pub enum SettlementError {
    #[error("No payment method on file")]
    NoPaymentMethod,
}

/// Generar un identificador único de transacción
fn generate_transaction_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let random_part = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("TXN-{}-{}", timestamp, random_part)
}

/// Generar un código de autorización simulado
fn generate_authorization_code() -> String {
    format!("AUTH{}", rand::thread_rng().gen_range(100_000..=999_999))
}

/// Simular un cargo a la tarjeta del usuario.
///
/// Copia del instrumento solo la marca y los últimos cuatro dígitos; el
/// número completo no está disponible en este punto.
pub fn simulate_charge(
    amount: Decimal,
    payment_method: Option<&PaymentMethod>,
    description: &str,
) -> Result<ChargeTransaction, SettlementError> {
    log::info!("[PAYMENT SIM] Processing charge of ${}", amount.round_dp(2));

    let method = payment_method.ok_or_else(|| {
        log::warn!("[PAYMENT SIM] No payment method on file");
        SettlementError::NoPaymentMethod
    })?;

    let transaction = ChargeTransaction {
        transaction_id: generate_transaction_id(),
        authorization_code: generate_authorization_code(),
        amount: amount.round_dp(2),
        currency: "USD".to_string(),
        description: description.to_string(),
        card_type: method.card_type.clone(),
        card_last_four: method.card_last_four.clone(),
        cardholder_name: method.cardholder_name.clone(),
        status: "APPROVED".to_string(),
        processed_at: Utc::now(),
        is_simulation: true,
    };

    log::info!(
        "[PAYMENT SIM] Charge approved: {} for ${}",
        transaction.transaction_id,
        transaction.amount
    );

    Ok(transaction)
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptRental {
    pub scooter_id: String,
    pub rental_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_display: String,
    pub start_location: LatLng,
    pub end_location: LatLng,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptCharges {
    pub unlock_fee: Decimal,
    pub rental_fee: Decimal,
    pub pricing_tier: PricingTier,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptPayment {
    pub method: String,
    pub transaction_id: String,
    pub authorization_code: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptMerchant {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptFooter {
    pub message: String,
    pub support: String,
    pub is_simulation: bool,
    pub simulation_disclaimer: String,
}

/// Recibo auditable de un alquiler completado
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub receipt_number: String,
    pub date: String,
    pub time: String,
    pub customer: ReceiptCustomer,
    pub rental: ReceiptRental,
    pub charges: ReceiptCharges,
    pub payment: Option<ReceiptPayment>,
    pub merchant: ReceiptMerchant,
    pub footer: ReceiptFooter,
}

/// Datos mínimos del alquiler para construir el recibo
pub struct ReceiptRentalData {
    pub rental_id: Uuid,
    pub scooter_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_location: LatLng,
    pub end_location: LatLng,
    pub distance_traveled_m: f64,
}

/// Generar el recibo detallado de un alquiler completado.
pub fn generate_receipt(
    rental: &ReceiptRentalData,
    cost: &CostBreakdown,
    transaction: Option<&ChargeTransaction>,
    user: Option<&User>,
) -> Receipt {
    let now = Utc::now();
    let receipt_number = format!(
        "RCP-{}-{}",
        now.format("%Y%m%d"),
        Uuid::new_v4().simple().to_string()[..6].to_uppercase()
    );

    Receipt {
        receipt_number,
        date: now.format("%B %d, %Y").to_string(),
        time: now.format("%I:%M %p").to_string(),
        customer: ReceiptCustomer {
            name: user.map(|u| u.name.clone()).unwrap_or_else(|| "Customer".to_string()),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
        },
        rental: ReceiptRental {
            scooter_id: rental.scooter_id.clone(),
            rental_id: rental.rental_id,
            start_time: rental.start_time,
            end_time: rental.end_time,
            duration_display: format_duration(cost.duration_minutes),
            start_location: rental.start_location,
            end_location: rental.end_location,
            distance_km: (rental.distance_traveled_m / 10.0).round() / 100.0,
        },
        charges: ReceiptCharges {
            unlock_fee: cost.unlock_fee,
            rental_fee: cost.rental_fee,
            pricing_tier: cost.pricing_tier,
            total: cost.total_cost,
        },
        payment: transaction.map(|txn| ReceiptPayment {
            method: format!("{} ****{}", txn.card_type, txn.card_last_four),
            transaction_id: txn.transaction_id.clone(),
            authorization_code: txn.authorization_code.clone(),
            status: txn.status.clone(),
        }),
        merchant: ReceiptMerchant {
            name: "Scooter Rental Co.".to_string(),
            address: "123 Main Street, City, ST 12345".to_string(),
            phone: "1-800-SCOOTER".to_string(),
            website: "www.scooterrentals.example.com".to_string(),
        },
        footer: ReceiptFooter {
            message: "Thank you for riding with us!".to_string(),
            support: "Questions? Contact support@scooterrentals.example.com".to_string(),
            is_simulation: true,
            simulation_disclaimer: "*** THIS IS A SIMULATED RECEIPT FOR DEMONSTRATION PURPOSES ***"
                .to_string(),
        },
    }
}

/// Formatear una duración en texto legible para el recibo
pub fn format_duration(minutes: f64) -> String {
    if minutes < 60.0 {
        format!("{} minutes", minutes as i64)
    } else if minutes < 1440.0 {
        let hours = (minutes / 60.0) as i64;
        let mins = (minutes % 60.0) as i64;
        if mins > 0 {
            format!("{} hr {} min", hours, mins)
        } else {
            format!("{} hour{}", hours, if hours > 1 { "s" } else { "" })
        }
    } else {
        let days = (minutes / 1440.0) as i64;
        let hours = ((minutes % 1440.0) / 60.0) as i64;
        if hours > 0 {
            format!("{} day{} {} hr", days, if days > 1 { "s" } else { "" }, hours)
        } else {
            format!("{} day{}", days, if days > 1 { "s" } else { "" })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{User, ROLE_RENTER};

    fn test_method() -> PaymentMethod {
        PaymentMethod {
            card_number_masked: "**** **** **** 4242".to_string(),
            card_last_four: "4242".to_string(),
            card_type: "Visa".to_string(),
            expiry: "12/30".to_string(),
            cardholder_name: "JANE DOE".to_string(),
            added_at: Utc::now(),
            token: "sim_tok_4242_20240601000000".to_string(),
        }
    }

    fn money(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn charge_without_method_fails_softly() {
        let result = simulate_charge(money("2.75"), None, "Scooter Rental - S1");
        assert_eq!(result.unwrap_err(), SettlementError::NoPaymentMethod);
    }

    #[test]
    fn charge_with_method_always_approves() {
        let method = test_method();
        let txn = simulate_charge(money("2.75"), Some(&method), "Scooter Rental - S1").unwrap();

        assert_eq!(txn.status, "APPROVED");
        assert_eq!(txn.amount, money("2.75"));
        assert_eq!(txn.currency, "USD");
        assert_eq!(txn.card_type, "Visa");
        assert_eq!(txn.card_last_four, "4242");
        assert!(txn.is_simulation);
        assert!(txn.transaction_id.starts_with("TXN-"));
        assert!(txn.authorization_code.starts_with("AUTH"));
        assert_eq!(txn.authorization_code.len(), "AUTH".len() + 6);
    }

    #[test]
    fn transaction_ids_are_unique() {
        let method = test_method();
        let a = simulate_charge(money("1.00"), Some(&method), "test").unwrap();
        let b = simulate_charge(money("1.00"), Some(&method), "test").unwrap();
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[test]
    fn receipt_masks_the_card_and_flags_simulation() {
        let method = test_method();
        let txn = simulate_charge(money("2.75"), Some(&method), "Scooter Rental - S1").unwrap();
        let user = User::new(
            "jane@example.com".to_string(),
            "Jane Doe".to_string(),
            "hash".to_string(),
            ROLE_RENTER,
        );
        let cost = CostBreakdown {
            duration_minutes: 20.0,
            duration_hours: 0.33,
            duration_days: 0.01,
            pricing_tier: PricingTier::Hourly,
            unlock_fee: money("1.00"),
            rental_fee: money("1.75"),
            total_cost: money("2.75"),
            description: "30 min @ $3.5/hr".to_string(),
        };
        let data = ReceiptRentalData {
            rental_id: Uuid::new_v4(),
            scooter_id: "S1".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            start_location: LatLng { lat: 41.0, lng: 2.0 },
            end_location: LatLng { lat: 41.01, lng: 2.01 },
            distance_traveled_m: 1234.5,
        };

        let receipt = generate_receipt(&data, &cost, Some(&txn), Some(&user));
        let payment = receipt.payment.expect("payment section present");
        assert_eq!(payment.method, "Visa ****4242");
        assert!(receipt.footer.is_simulation);
        assert_eq!(receipt.charges.total, money("2.75"));
        assert_eq!(receipt.rental.distance_km, 1.23);
        assert!(receipt.receipt_number.starts_with("RCP-"));
    }

    #[test]
    fn receipt_without_transaction_has_no_payment_section() {
        let cost = CostBreakdown {
            duration_minutes: 20.0,
            duration_hours: 0.33,
            duration_days: 0.01,
            pricing_tier: PricingTier::Hourly,
            unlock_fee: money("1.00"),
            rental_fee: money("1.75"),
            total_cost: money("2.75"),
            description: "30 min @ $3.5/hr".to_string(),
        };
        let data = ReceiptRentalData {
            rental_id: Uuid::new_v4(),
            scooter_id: "S1".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            start_location: LatLng { lat: 41.0, lng: 2.0 },
            end_location: LatLng { lat: 41.0, lng: 2.0 },
            distance_traveled_m: 0.0,
        };

        let receipt = generate_receipt(&data, &cost, None, None);
        assert!(receipt.payment.is_none());
        assert_eq!(receipt.customer.name, "Customer");
    }

    #[test]
    fn format_duration_is_human_readable() {
        assert_eq!(format_duration(45.0), "45 minutes");
        assert_eq!(format_duration(60.0), "1 hour");
        assert_eq!(format_duration(90.0), "1 hr 30 min");
        assert_eq!(format_duration(120.0), "2 hours");
        assert_eq!(format_duration(1440.0), "1 day");
        assert_eq!(format_duration(1500.0), "1 day 1 hr");
        assert_eq!(format_duration(2880.0), "2 days");
    }
}
