//! Modelo de User
//!
//! Usuarios del sistema con rol `renter` o `admin`. El método de pago se
//! guarda ya enmascarado: el número completo de tarjeta nunca se persiste.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::payment::PaymentMethod;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_RENTER: &str = "renter";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub payment_method: Option<Json<PaymentMethod>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, name: String, password_hash: String, role: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            role: role.to_string(),
            payment_method: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}
