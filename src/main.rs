mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use controllers::AuthController;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use middleware::rate_limit::RateLimitState;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🛴 Scooter Fleet - API de alquiler de scooters");
    info!("==============================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Estado compartido y rate limiting
    let app_state = AppState::new(pool, config.clone());
    let rate_limit_state = RateLimitState::new(&config);

    // Crear el admin por defecto si hace falta
    if let Err(e) = AuthController::new(&app_state).ensure_default_admin().await {
        error!("❌ Error creando admin por defecto: {}", e);
    }

    // CORS: permisivo en desarrollo, orígenes explícitos si se configuran
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    // Crear router de la API
    let app = Router::new()
        .route("/health", get(health_check))
        .nest(
            "/auth",
            routes::auth_routes::create_auth_router(app_state.clone(), rate_limit_state),
        )
        .nest("/scooters", routes::scooter_routes::create_scooter_router())
        .nest(
            "/rentals",
            routes::rental_routes::create_rental_router(app_state.clone()),
        )
        .nest(
            "/profile",
            routes::profile_routes::create_profile_router(app_state.clone()),
        )
        .nest(
            "/admin",
            routes::admin_routes::create_admin_router(app_state.clone()),
        )
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /auth/register - Registrar usuario");
    info!("   POST /auth/login - Login");
    info!("   GET  /auth/me - Usuario actual");
    info!("🛴 Scooters:");
    info!("   GET  /scooters/available - Scooters libres");
    info!("   GET  /scooters/search - Búsqueda por radio");
    info!("   GET  /scooters/pricing - Tarifas");
    info!("   GET  /scooters/pricing/estimate - Estimar coste");
    info!("🎫 Rentals:");
    info!("   POST /rentals/start - Iniciar reserva");
    info!("   POST /rentals/end - Terminar reserva");
    info!("   GET  /rentals/active - Alquiler activo");
    info!("   GET  /rentals/history - Histórico");
    info!("👤 Profile:");
    info!("   GET  /profile - Perfil");
    info!("   PUT  /profile/payment-method - Guardar método de pago");
    info!("   GET  /profile/payment-method - Método de pago");
    info!("   DELETE /profile/payment-method - Quitar método de pago");
    info!("🛠 Admin:");
    info!("   GET  /admin/scooters - Flota completa");
    info!("   POST /admin/scooters - Alta de scooter");
    info!("   PUT  /admin/scooters/:id - Reubicar scooter");
    info!("   DELETE /admin/scooters/:id - Baja de scooter");
    info!("   PUT  /admin/scooters/:id/release - Liberación forzada");
    info!("   GET  /admin/users - Listado de usuarios");
    info!("   PUT  /admin/users/:id/role - Cambiar rol");
    info!("   GET  /admin/reports/rentals - Informe de alquileres");
    info!("   GET  /admin/reports/revenue - Informe de ingresos");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "scooter-fleet",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
