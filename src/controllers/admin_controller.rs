//! Controlador de administración de flota y usuarios
//!
//! Operaciones solo para admins: alta, reubicación y baja de scooters,
//! listado de usuarios y cambios de rol.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::{UserAdminView, UserListResponse};
use crate::dto::scooter_dto::{
    CreateScooterRequest, FleetOverviewResponse, FleetStats, ScooterResponse,
    UpdateScooterRequest,
};
use crate::middleware::auth::{require_admin, AuthenticatedUser};
use crate::models::scooter::Scooter;
use crate::models::user::{ROLE_ADMIN, ROLE_RENTER};
use crate::repositories::{ScooterStore, UserStore};
use crate::utils::errors::{
    conflict_error, not_found_error, validation_error, validation_error_from, AppError, AppResult,
};
use crate::utils::validation::validate_coordinates;

pub struct AdminController {
    scooters: Arc<dyn ScooterStore>,
    users: Arc<dyn UserStore>,
}

impl AdminController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(state.scooters.clone(), state.users.clone())
    }

    pub fn with_stores(scooters: Arc<dyn ScooterStore>, users: Arc<dyn UserStore>) -> Self {
        Self { scooters, users }
    }

    /// Flota completa con estadísticas
    pub async fn fleet_overview(
        &self,
        admin: &AuthenticatedUser,
    ) -> AppResult<FleetOverviewResponse> {
        require_admin(admin)?;

        let scooters = self.scooters.find_all().await?;
        let total = scooters.len();
        let available = scooters.iter().filter(|s| !s.is_reserved).count();

        Ok(FleetOverviewResponse {
            stats: FleetStats {
                total,
                available,
                reserved: total - available,
            },
            scooters: scooters.into_iter().map(ScooterResponse::from).collect(),
        })
    }

    /// Dar de alta un scooter nuevo
    pub async fn add_scooter(
        &self,
        admin: &AuthenticatedUser,
        request: CreateScooterRequest,
    ) -> AppResult<ScooterResponse> {
        require_admin(admin)?;
        request.validate()?;
        validate_coordinates(request.lat, request.lng)
            .map_err(|e| validation_error_from("coordinates", e))?;

        let scooter_id = request.id.trim().to_string();
        if self.scooters.find_by_id(&scooter_id).await?.is_some() {
            return Err(conflict_error("Scooter", "id", &scooter_id));
        }

        let scooter = Scooter::new(scooter_id, request.lat, request.lng);
        self.scooters.insert(&scooter).await?;

        log::info!(
            "🛴 New scooter added: {} at ({}, {}) by {}",
            scooter.id,
            scooter.lat,
            scooter.lng,
            admin.email
        );

        Ok(scooter.into())
    }

    /// Reubicar un scooter
    pub async fn update_scooter(
        &self,
        admin: &AuthenticatedUser,
        scooter_id: &str,
        request: UpdateScooterRequest,
    ) -> AppResult<ScooterResponse> {
        require_admin(admin)?;
        validate_coordinates(request.lat, request.lng)
            .map_err(|e| validation_error_from("coordinates", e))?;

        let updated = self
            .scooters
            .update_location(scooter_id, request.lat, request.lng)
            .await?;
        if !updated {
            return Err(not_found_error("Scooter", scooter_id));
        }

        log::info!("🛴 Scooter {} updated by {}", scooter_id, admin.email);

        let scooter = self
            .scooters
            .find_by_id(scooter_id)
            .await?
            .ok_or_else(|| not_found_error("Scooter", scooter_id))?;
        Ok(scooter.into())
    }

    /// Dar de baja un scooter. Nunca se borra uno reservado.
    pub async fn delete_scooter(
        &self,
        admin: &AuthenticatedUser,
        scooter_id: &str,
    ) -> AppResult<()> {
        require_admin(admin)?;

        let scooter = self
            .scooters
            .find_by_id(scooter_id)
            .await?
            .ok_or_else(|| not_found_error("Scooter", scooter_id))?;

        if scooter.is_reserved {
            return Err(AppError::Conflict {
                code: "SCOOTER_RESERVED",
                message: "Cannot delete a reserved scooter".to_string(),
            });
        }

        // Guard repetido en el store por si el claim gana la carrera
        if !self.scooters.delete_if_available(scooter_id).await? {
            return Err(AppError::Conflict {
                code: "SCOOTER_RESERVED",
                message: "Cannot delete a reserved scooter".to_string(),
            });
        }

        log::info!("🛴 Scooter {} deleted by {}", scooter_id, admin.email);
        Ok(())
    }

    /// Listado de usuarios
    pub async fn list_users(&self, admin: &AuthenticatedUser) -> AppResult<UserListResponse> {
        require_admin(admin)?;

        let users = self.users.find_all().await?;
        Ok(UserListResponse {
            count: users.len(),
            users: users.into_iter().map(UserAdminView::from).collect(),
        })
    }

    /// Cambiar el rol de un usuario. Un admin no puede degradarse a sí mismo.
    pub async fn update_user_role(
        &self,
        admin: &AuthenticatedUser,
        user_id: Uuid,
        role: &str,
    ) -> AppResult<()> {
        require_admin(admin)?;

        if role != ROLE_ADMIN && role != ROLE_RENTER {
            return Err(validation_error("role", "Role must be 'admin' or 'renter'"));
        }

        if user_id == admin.user_id && role != ROLE_ADMIN {
            return Err(validation_error("role", "Cannot demote yourself"));
        }

        let updated = self.users.update_role(user_id, role).await?;
        if !updated {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        log::info!(
            "👤 User {} role updated to {} by {}",
            user_id,
            role,
            admin.email
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::repositories::memory::{MemoryScooterStore, MemoryUserStore};

    struct Fixture {
        scooters: Arc<dyn ScooterStore>,
        users: Arc<dyn UserStore>,
        admin: AuthenticatedUser,
        renter: AuthenticatedUser,
    }

    impl Fixture {
        async fn new() -> Self {
            let scooters: Arc<dyn ScooterStore> = Arc::new(MemoryScooterStore::new());
            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());

            let admin_user = User::new(
                "admin@scooter.com".to_string(),
                "Admin".to_string(),
                "hash".to_string(),
                ROLE_ADMIN,
            );
            let renter_user = User::new(
                "rider@example.com".to_string(),
                "Rider".to_string(),
                "hash".to_string(),
                ROLE_RENTER,
            );
            users.insert(&admin_user).await.unwrap();
            users.insert(&renter_user).await.unwrap();

            Self {
                scooters,
                users,
                admin: AuthenticatedUser {
                    user_id: admin_user.id,
                    email: admin_user.email,
                    role: ROLE_ADMIN.to_string(),
                },
                renter: AuthenticatedUser {
                    user_id: renter_user.id,
                    email: renter_user.email,
                    role: ROLE_RENTER.to_string(),
                },
            }
        }

        fn controller(&self) -> AdminController {
            AdminController::with_stores(self.scooters.clone(), self.users.clone())
        }
    }

    fn create_request(id: &str) -> CreateScooterRequest {
        CreateScooterRequest {
            id: id.to_string(),
            lat: 41.3851,
            lng: 2.1734,
        }
    }

    #[tokio::test]
    async fn admin_endpoints_reject_renters() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        assert!(controller.fleet_overview(&fixture.renter).await.is_err());
        assert!(controller
            .add_scooter(&fixture.renter, create_request("S1"))
            .await
            .is_err());
        assert!(controller.list_users(&fixture.renter).await.is_err());
    }

    #[tokio::test]
    async fn add_and_overview_track_fleet_stats() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        controller
            .add_scooter(&fixture.admin, create_request("S1"))
            .await
            .unwrap();
        controller
            .add_scooter(&fixture.admin, create_request("S2"))
            .await
            .unwrap();
        assert!(fixture.scooters.claim("S2", Uuid::new_v4()).await.unwrap());

        let overview = controller.fleet_overview(&fixture.admin).await.unwrap();
        assert_eq!(overview.stats.total, 2);
        assert_eq!(overview.stats.available, 1);
        assert_eq!(overview.stats.reserved, 1);
    }

    #[tokio::test]
    async fn add_scooter_rejects_bad_coordinates() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        let mut request = create_request("S1");
        request.lat = 95.0;
        let error = controller
            .add_scooter(&fixture.admin, request)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_scooter_id_conflicts() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        controller
            .add_scooter(&fixture.admin, create_request("S1"))
            .await
            .unwrap();
        let error = controller
            .add_scooter(&fixture.admin, create_request("S1"))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn reserved_scooters_cannot_be_deleted() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        controller
            .add_scooter(&fixture.admin, create_request("S1"))
            .await
            .unwrap();
        assert!(fixture.scooters.claim("S1", Uuid::new_v4()).await.unwrap());

        let error = controller
            .delete_scooter(&fixture.admin, "S1")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Conflict { .. }));

        // Liberado sí se puede borrar
        fixture.scooters.release("S1", 41.0, 2.0).await.unwrap();
        controller.delete_scooter(&fixture.admin, "S1").await.unwrap();
        assert!(fixture.scooters.find_by_id("S1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn role_updates_are_guarded() {
        let fixture = Fixture::new().await;
        let controller = fixture.controller();

        // Rol inválido
        assert!(controller
            .update_user_role(&fixture.admin, fixture.renter.user_id, "superuser")
            .await
            .is_err());

        // Un admin no puede degradarse a sí mismo
        assert!(controller
            .update_user_role(&fixture.admin, fixture.admin.user_id, ROLE_RENTER)
            .await
            .is_err());

        // Promoción válida
        controller
            .update_user_role(&fixture.admin, fixture.renter.user_id, ROLE_ADMIN)
            .await
            .unwrap();
        let promoted = fixture
            .users
            .find_by_id(fixture.renter.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(promoted.is_admin());
    }
}
