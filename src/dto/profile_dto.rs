//! DTOs del perfil de usuario y su método de pago

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::payment::PaymentMethod;
use crate::models::user::User;

/// Alta o sustitución del método de pago.
///
/// El número completo solo vive en esta request: tras la validación se
/// persiste únicamente la forma enmascarada.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentMethodRequest {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
}

/// Vista enmascarada del método de pago
#[derive(Debug, Serialize)]
pub struct PaymentMethodView {
    pub card_number_masked: String,
    pub card_type: String,
    pub expiry: String,
    pub cardholder_name: String,
}

impl From<&PaymentMethod> for PaymentMethodView {
    fn from(method: &PaymentMethod) -> Self {
        Self {
            card_number_masked: method.card_number_masked.clone(),
            card_type: method.card_type.clone(),
            expiry: method.expiry.clone(),
            cardholder_name: method.cardholder_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub payment_method: Option<PaymentMethodView>,
    pub member_since: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            payment_method: user.payment_method.as_ref().map(|m| (&m.0).into()),
            member_since: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodResponse {
    pub has_payment_method: bool,
    pub payment_method: Option<PaymentMethodView>,
}
