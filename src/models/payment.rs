//! Modelos de pago
//!
//! Instrumento de pago enmascarado y transacción simulada.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Método de pago almacenado en el perfil del usuario.
///
/// Solo se guarda la forma enmascarada: marca, últimos cuatro dígitos,
/// expiración y titular. El PAN completo no está disponible en ningún
/// punto posterior al alta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    pub card_number_masked: String,
    pub card_last_four: String,
    pub card_type: String,
    pub expiry: String,
    pub cardholder_name: String,
    pub added_at: DateTime<Utc>,
    /// Token simulado, no contiene datos reales de tarjeta
    pub token: String,
}

/// Transacción producida por el simulador de cobros. Inmutable una vez creada.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChargeTransaction {
    pub transaction_id: String,
    pub authorization_code: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub card_type: String,
    pub card_last_four: String,
    pub cardholder_name: String,
    pub status: String,
    pub processed_at: DateTime<Utc>,
    pub is_simulation: bool,
}
