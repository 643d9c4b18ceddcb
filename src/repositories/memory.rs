//! Dobles de prueba en memoria para los stores
//!
//! Replican el contrato de atomicidad de los repositorios reales: las
//! actualizaciones condicionales se resuelven dentro del lock de escritura,
//! así que bajo concurrencia exactamente una petición observa el guard.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::payment::PaymentMethod;
use crate::models::rental::{Rental, RentalCompletion, STATUS_ACTIVE, STATUS_COMPLETED};
use crate::models::scooter::Scooter;
use crate::models::user::User;
use crate::repositories::{RentalFilter, RentalStore, ScooterStore, UserStore};
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct MemoryScooterStore {
    scooters: RwLock<HashMap<String, Scooter>>,
}

impl MemoryScooterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScooterStore for MemoryScooterStore {
    async fn insert(&self, scooter: &Scooter) -> AppResult<()> {
        self.scooters
            .write()
            .await
            .insert(scooter.id.clone(), scooter.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Scooter>> {
        Ok(self.scooters.read().await.get(id).cloned())
    }

    async fn find_available(&self) -> AppResult<Vec<Scooter>> {
        let mut scooters: Vec<Scooter> = self
            .scooters
            .read()
            .await
            .values()
            .filter(|s| !s.is_reserved)
            .cloned()
            .collect();
        scooters.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(scooters)
    }

    async fn find_all(&self) -> AppResult<Vec<Scooter>> {
        let mut scooters: Vec<Scooter> = self.scooters.read().await.values().cloned().collect();
        scooters.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(scooters)
    }

    async fn claim(&self, id: &str, rental_id: Uuid) -> AppResult<bool> {
        let mut scooters = self.scooters.write().await;
        match scooters.get_mut(id) {
            Some(scooter) if !scooter.is_reserved => {
                scooter.is_reserved = true;
                scooter.current_rental_id = Some(rental_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, id: &str, lat: f64, lng: f64) -> AppResult<()> {
        if let Some(scooter) = self.scooters.write().await.get_mut(id) {
            scooter.is_reserved = false;
            scooter.current_rental_id = None;
            scooter.lat = lat;
            scooter.lng = lng;
        }
        Ok(())
    }

    async fn update_location(&self, id: &str, lat: f64, lng: f64) -> AppResult<bool> {
        match self.scooters.write().await.get_mut(id) {
            Some(scooter) => {
                scooter.lat = lat;
                scooter.lng = lng;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_if_available(&self, id: &str) -> AppResult<bool> {
        let mut scooters = self.scooters.write().await;
        match scooters.get(id) {
            Some(scooter) if !scooter.is_reserved => {
                scooters.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryRentalStore {
    rentals: RwLock<HashMap<Uuid, Rental>>,
}

impl MemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RentalStore for MemoryRentalStore {
    async fn insert(&self, rental: &Rental) -> AppResult<()> {
        self.rentals.write().await.insert(rental.id, rental.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rental>> {
        Ok(self.rentals.read().await.get(&id).cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Option<Rental>> {
        Ok(self
            .rentals
            .read()
            .await
            .values()
            .find(|r| r.user_id == user_id && r.status == STATUS_ACTIVE)
            .cloned())
    }

    async fn find_active_by_scooter(&self, scooter_id: &str) -> AppResult<Option<Rental>> {
        Ok(self
            .rentals
            .read()
            .await
            .values()
            .find(|r| r.scooter_id == scooter_id && r.status == STATUS_ACTIVE)
            .cloned())
    }

    async fn complete(
        &self,
        id: Uuid,
        completion: &RentalCompletion,
    ) -> AppResult<Option<Rental>> {
        let mut rentals = self.rentals.write().await;
        match rentals.get_mut(&id) {
            Some(rental) if rental.status == STATUS_ACTIVE => {
                rental.end_time = Some(completion.end_time);
                rental.end_lat = Some(completion.end_lat);
                rental.end_lng = Some(completion.end_lng);
                rental.status = STATUS_COMPLETED.to_string();
                rental.distance_traveled_m = Some(completion.distance_traveled_m);
                rental.cost = Some(Json(completion.cost.clone()));
                rental.transaction = completion.transaction.clone().map(Json);
                rental.completed_at = Some(completion.end_time);
                Ok(Some(rental.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Rental>> {
        let mut rentals: Vec<Rental> = self
            .rentals
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rentals.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        rentals.truncate(limit as usize);
        Ok(rentals)
    }

    async fn find_filtered(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        let mut rentals: Vec<Rental> = self
            .rentals
            .read()
            .await
            .values()
            .filter(|r| filter.status.as_deref().map_or(true, |s| r.status == s))
            .filter(|r| filter.since.map_or(true, |cutoff| r.start_time >= cutoff))
            .filter(|r| filter.user_id.map_or(true, |u| r.user_id == u))
            .filter(|r| {
                filter
                    .scooter_id
                    .as_deref()
                    .map_or(true, |s| r.scooter_id == s)
            })
            .cloned()
            .collect();
        rentals.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(rentals)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> AppResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn update_role(&self, id: Uuid, role: &str) -> AppResult<bool> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.role = role.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_payment_method(
        &self,
        id: Uuid,
        method: Option<&PaymentMethod>,
    ) -> AppResult<bool> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.payment_method = method.cloned().map(Json);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn admin_exists(&self) -> AppResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.is_admin() && u.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pricing::{CostBreakdown, PricingTier};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn completion() -> RentalCompletion {
        RentalCompletion {
            end_time: Utc::now(),
            end_lat: 41.01,
            end_lng: 2.01,
            cost: CostBreakdown {
                duration_minutes: 20.0,
                duration_hours: 0.33,
                duration_days: 0.01,
                pricing_tier: PricingTier::Hourly,
                unlock_fee: Decimal::ONE,
                rental_fee: Decimal::ONE,
                total_cost: Decimal::TWO,
                description: "test".to_string(),
            },
            transaction: None,
            distance_traveled_m: 100.0,
        }
    }

    #[tokio::test]
    async fn claim_guard_rejects_reserved_and_missing_scooters() {
        let store = MemoryScooterStore::new();
        store.insert(&Scooter::new("S1", 41.0, 2.0)).await.unwrap();

        assert!(store.claim("S1", Uuid::new_v4()).await.unwrap());
        assert!(!store.claim("S1", Uuid::new_v4()).await.unwrap());
        assert!(!store.claim("missing", Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn complete_guard_fires_only_once() {
        let store = MemoryRentalStore::new();
        let scooter = Scooter::new("S1", 41.0, 2.0);
        let rental = Rental::started(
            Uuid::new_v4(),
            &scooter,
            Uuid::new_v4(),
            "rider@example.com",
            Utc::now(),
        );
        store.insert(&rental).await.unwrap();

        let first = store.complete(rental.id, &completion()).await.unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().status, STATUS_COMPLETED);

        // Una segunda devolución concurrente observa el guard y no liquida
        let second = store.complete(rental.id, &completion()).await.unwrap();
        assert!(second.is_none());
    }
}
