//! Repositorios de acceso a datos
//!
//! Los stores se definen como traits inyectables para que los controladores
//! no dependan de un handle global de base de datos y los tests puedan usar
//! dobles en memoria. Las actualizaciones condicionales (claim y completion)
//! son una sola sentencia guardada: la atomicidad la aporta el propio store,
//! no locks en proceso.

pub mod rental_repository;
pub mod scooter_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::payment::PaymentMethod;
use crate::models::rental::{Rental, RentalCompletion};
use crate::models::scooter::Scooter;
use crate::models::user::User;
use crate::utils::errors::AppResult;

pub use rental_repository::PgRentalStore;
pub use scooter_repository::PgScooterStore;
pub use user_repository::PgUserStore;

/// Store de scooters
#[async_trait]
pub trait ScooterStore: Send + Sync {
    async fn insert(&self, scooter: &Scooter) -> AppResult<()>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Scooter>>;

    async fn find_available(&self) -> AppResult<Vec<Scooter>>;

    async fn find_all(&self) -> AppResult<Vec<Scooter>>;

    /// Reclamar el scooter solo si no está reservado.
    ///
    /// Actualización condicional única: si dos peticiones compiten por el
    /// mismo scooter exactamente una observa `true`.
    async fn claim(&self, id: &str, rental_id: Uuid) -> AppResult<bool>;

    /// Liberar el scooter y moverlo a su nueva ubicación.
    async fn release(&self, id: &str, lat: f64, lng: f64) -> AppResult<()>;

    /// Reubicar un scooter. Devuelve false si no existe.
    async fn update_location(&self, id: &str, lat: f64, lng: f64) -> AppResult<bool>;

    /// Borrar el scooter solo si no está reservado.
    async fn delete_if_available(&self, id: &str) -> AppResult<bool>;
}

/// Filtros para informes de alquileres
#[derive(Debug, Default, Clone)]
pub struct RentalFilter {
    pub status: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub user_id: Option<Uuid>,
    pub scooter_id: Option<String>,
}

/// Store de alquileres
#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn insert(&self, rental: &Rental) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rental>>;

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<Rental>>;

    async fn find_active_by_scooter(&self, scooter_id: &str) -> AppResult<Option<Rental>>;

    /// Completar el alquiler solo si sigue activo.
    ///
    /// Devuelve el registro completado, o None si otra petición ganó la
    /// carrera y el alquiler ya no estaba activo.
    async fn complete(&self, id: Uuid, completion: &RentalCompletion)
        -> AppResult<Option<Rental>>;

    /// Alquileres de un usuario, más recientes primero.
    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Rental>>;

    /// Alquileres filtrados para informes, más recientes primero.
    async fn find_filtered(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>>;
}

/// Store de usuarios y perfiles de pago
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_all(&self) -> AppResult<Vec<User>>;

    async fn update_role(&self, id: Uuid, role: &str) -> AppResult<bool>;

    /// Guardar o borrar el instrumento de pago enmascarado.
    async fn set_payment_method(
        &self,
        id: Uuid,
        method: Option<&PaymentMethod>,
    ) -> AppResult<bool>;

    async fn admin_exists(&self) -> AppResult<bool>;
}
