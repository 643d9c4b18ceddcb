//! Controlador de perfil y método de pago
//!
//! El número de tarjeta se valida aquí y se descarta: al store solo llega
//! la forma enmascarada con los últimos cuatro dígitos.

use std::sync::Arc;

use chrono::Utc;

use crate::dto::profile_dto::{
    PaymentMethodResponse, PaymentMethodView, ProfileResponse, UpdatePaymentMethodRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::payment::PaymentMethod;
use crate::repositories::UserStore;
use crate::utils::errors::{validation_error, validation_error_from, AppError, AppResult};
use crate::utils::validation::{
    detect_card_type, mask_card_number, validate_card_expiry, validate_card_number, validate_cvv,
};

pub struct ProfileController {
    users: Arc<dyn UserStore>,
}

impl ProfileController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(state.users.clone())
    }

    pub fn with_stores(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Perfil del usuario, con el método de pago enmascarado
    pub async fn get_profile(&self, user: &AuthenticatedUser) -> AppResult<ProfileResponse> {
        let user = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Alta o sustitución del método de pago
    pub async fn update_payment_method(
        &self,
        user: &AuthenticatedUser,
        request: UpdatePaymentMethodRequest,
    ) -> AppResult<PaymentMethodView> {
        let clean_card = validate_card_number(&request.card_number)
            .map_err(|e| validation_error_from("card_number", e))?;
        let expiry = validate_card_expiry(&request.expiry)
            .map_err(|e| validation_error_from("expiry", e))?;
        validate_cvv(&request.cvv).map_err(|e| validation_error_from("cvv", e))?;

        let cardholder_name = request.cardholder_name.trim();
        if cardholder_name.len() < 2 {
            return Err(validation_error(
                "cardholder_name",
                "Cardholder name is required",
            ));
        }

        let card_type = detect_card_type(&clean_card);
        let last_four = clean_card[clean_card.len() - 4..].to_string();
        let now = Utc::now();

        // Se persiste solo la forma enmascarada, nunca el PAN
        let method = PaymentMethod {
            card_number_masked: mask_card_number(&clean_card),
            card_last_four: last_four.clone(),
            card_type: card_type.clone(),
            expiry,
            cardholder_name: cardholder_name.to_uppercase(),
            added_at: now,
            token: format!("sim_tok_{}_{}", last_four, now.format("%Y%m%d%H%M%S")),
        };

        let updated = self
            .users
            .set_payment_method(user.user_id, Some(&method))
            .await?;
        if !updated {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        log::info!(
            "💳 User {} added payment method: {} ****{}",
            user.email,
            card_type,
            last_four
        );

        Ok((&method).into())
    }

    /// Método de pago actual, enmascarado
    pub async fn get_payment_method(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<PaymentMethodResponse> {
        let user = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let payment_method = user.payment_method.as_ref().map(|m| (&m.0).into());
        Ok(PaymentMethodResponse {
            has_payment_method: payment_method.is_some(),
            payment_method,
        })
    }

    /// Quitar el método de pago
    pub async fn remove_payment_method(&self, user: &AuthenticatedUser) -> AppResult<()> {
        let updated = self.users.set_payment_method(user.user_id, None).await?;
        if !updated {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        log::info!("💳 User {} removed payment method", user.email);
        Ok(())
    }
}
