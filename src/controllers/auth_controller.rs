//! Controlador de autenticación
//!
//! Registro, login y consulta del usuario autenticado. Las contraseñas se
//! guardan con bcrypt y la sesión se materializa como JWT.

use std::sync::Arc;

use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserView};
use crate::middleware::auth::{generate_jwt_token, AuthenticatedUser};
use crate::models::user::{User, ROLE_ADMIN, ROLE_RENTER};
use crate::repositories::UserStore;
use crate::utils::errors::{conflict_error, AppError, AppResult};

pub struct AuthController {
    users: Arc<dyn UserStore>,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(state: &crate::state::AppState) -> Self {
        Self::with_stores(state.users.clone(), state.config.clone())
    }

    pub fn with_stores(users: Arc<dyn UserStore>, config: EnvironmentConfig) -> Self {
        Self { users, config }
    }

    /// Registrar una cuenta nueva con rol renter
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let name = request.name.trim().to_string();

        if self.users.find_by_email(&email).await?.is_some() {
            log::warn!("Registration failed: Email {} already exists", email);
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error generando hash: {}", e)))?;

        let user = User::new(email, name, password_hash, ROLE_RENTER);
        self.users.insert(&user).await?;

        log::info!("👤 Nuevo usuario registrado: {} (id: {})", user.email, user.id);

        let token = generate_jwt_token(&user, &self.config)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Login con email y contraseña
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verificando hash: {}", e)))?;
        if !valid {
            log::warn!("Login failed for email: {}", email);
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_active {
            log::warn!("Login attempt for deactivated account: {}", email);
            return Err(AppError::Unauthorized("Account is deactivated".to_string()));
        }

        log::info!("👤 Usuario logueado: {} (role: {})", user.email, user.role);

        let token = generate_jwt_token(&user, &self.config)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Datos del usuario autenticado
    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<UserView> {
        let user = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Crear el admin por defecto si no existe ninguno.
    ///
    /// Se llama una vez al arrancar el servidor.
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        if self.users.admin_exists().await? {
            log::info!("Admin user already exists");
            return Ok(());
        }

        let password_hash = bcrypt::hash(&self.config.default_admin_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error generando hash: {}", e)))?;

        let admin = User::new(
            self.config.default_admin_email.clone(),
            self.config.default_admin_name.clone(),
            password_hash,
            ROLE_ADMIN,
        );
        self.users.insert(&admin).await?;

        log::info!("👤 Default admin user created: {}", admin.email);
        log::warn!("IMPORTANT: Change the default admin password in production!");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryUserStore;

    fn fixture() -> (Arc<dyn UserStore>, AuthController) {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let mut config = EnvironmentConfig::from_env();
        config.jwt_secret = "test-secret".to_string();
        let controller = AuthController::with_stores(users.clone(), config);
        (users, controller)
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
            name: "Test User".to_string(),
        }
    }

    #[tokio::test]
    async fn register_creates_renter_and_returns_token() {
        let (users, controller) = fixture();

        let response = controller
            .register(register_request("Rider@Example.com"))
            .await
            .unwrap();

        // Email normalizado a minúsculas
        assert_eq!(response.user.email, "rider@example.com");
        assert_eq!(response.user.role, ROLE_RENTER);
        assert!(!response.token.is_empty());

        let stored = users
            .find_by_email("rider@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret123");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (_, controller) = fixture();

        controller
            .register(register_request("rider@example.com"))
            .await
            .unwrap();
        let error = controller
            .register(register_request("rider@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let (_, controller) = fixture();

        let error = controller
            .register(RegisterRequest {
                email: "not-an-email".to_string(),
                password: "secret123".to_string(),
                name: "Test".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));

        let error = controller
            .register(RegisterRequest {
                email: "rider@example.com".to_string(),
                password: "short".to_string(),
                name: "Test".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_verifies_password() {
        let (_, controller) = fixture();
        controller
            .register(register_request("rider@example.com"))
            .await
            .unwrap();

        let ok = controller
            .login(LoginRequest {
                email: "rider@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await;
        assert!(ok.is_ok());

        let bad = controller
            .login(LoginRequest {
                email: "rider@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(bad, AppError::Unauthorized(_)));

        let unknown = controller
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn default_admin_is_seeded_once() {
        let (users, controller) = fixture();

        controller.ensure_default_admin().await.unwrap();
        controller.ensure_default_admin().await.unwrap();

        let all = users.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_admin());
    }
}
