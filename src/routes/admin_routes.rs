use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::{AdminController, RentalController, ReportController};
use crate::dto::api::ApiResponse;
use crate::dto::auth_dto::{UpdateRoleRequest, UserListResponse};
use crate::dto::rental_dto::EndReservationResponse;
use crate::dto::report_dto::{RentalReportQuery, RentalReportResponse, RevenueReportResponse};
use crate::dto::scooter_dto::{
    CreateScooterRequest, FleetOverviewResponse, ScooterResponse, UpdateScooterRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/scooters", get(fleet_overview))
        .route("/scooters", post(add_scooter))
        .route("/scooters/:id", put(update_scooter))
        .route("/scooters/:id", delete(delete_scooter))
        .route("/scooters/:id/release", put(force_release_scooter))
        .route("/users", get(list_users))
        .route("/users/:id/role", put(update_user_role))
        .route("/reports/rentals", get(rentals_report))
        .route("/reports/revenue", get(revenue_report))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn fleet_overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<FleetOverviewResponse>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.fleet_overview(&user).await?;
    Ok(Json(response))
}

async fn add_scooter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateScooterRequest>,
) -> Result<Json<ApiResponse<ScooterResponse>>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.add_scooter(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Scooter added successfully".to_string(),
    )))
}

async fn update_scooter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateScooterRequest>,
) -> Result<Json<ApiResponse<ScooterResponse>>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.update_scooter(&user, &id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        format!("Scooter {} updated successfully", id),
    )))
}

async fn delete_scooter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(&state);
    controller.delete_scooter(&user, &id).await?;
    Ok(Json(ApiResponse::message_only(format!(
        "Scooter {} deleted successfully",
        id
    ))))
}

/// Liberación forzada: completa el alquiler activo por el camino normal
async fn force_release_scooter(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EndReservationResponse>>, AppError> {
    let controller = RentalController::new(&state);
    let response = controller.force_release(&user, &id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        format!("Scooter {} has been released", id),
    )))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<UserListResponse>, AppError> {
    let controller = AdminController::new(&state);
    let response = controller.list_users(&user).await?;
    Ok(Json(response))
}

async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AdminController::new(&state);
    controller.update_user_role(&user, id, &request.role).await?;
    Ok(Json(ApiResponse::message_only(format!(
        "User role updated to {}",
        request.role
    ))))
}

async fn rentals_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<RentalReportQuery>,
) -> Result<Json<RentalReportResponse>, AppError> {
    let controller = ReportController::new(&state);
    let response = controller.rentals_report(&user, query).await?;
    Ok(Json(response))
}

async fn revenue_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<RevenueReportResponse>, AppError> {
    let controller = ReportController::new(&state);
    let response = controller.revenue_report(&user).await?;
    Ok(Json(response))
}
