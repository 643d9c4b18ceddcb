use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::RentalController;
use crate::dto::api::ApiResponse;
use crate::dto::rental_dto::{
    ActiveRentalResponse, EndReservationRequest, EndReservationResponse, RentalHistoryResponse,
    StartReservationRequest, StartReservationResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/start", post(start_reservation))
        .route("/end", post(end_reservation))
        .route("/active", get(get_active_rental))
        .route("/history", get(get_rental_history))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn start_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<StartReservationRequest>,
) -> Result<Json<ApiResponse<StartReservationResponse>>, AppError> {
    request.validate()?;

    let controller = RentalController::new(&state);
    let response = controller
        .start_reservation(&user, &request.scooter_id)
        .await?;

    let message = format!(
        "Scooter {} was reserved successfully. Unlock fee: ${:.2}",
        response.scooter_id, response.pricing.unlock_fee
    );
    Ok(Json(ApiResponse::success_with_message(response, message)))
}

async fn end_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<EndReservationRequest>,
) -> Result<Json<ApiResponse<EndReservationResponse>>, AppError> {
    request.validate()?;

    let controller = RentalController::new(&state);
    let response = controller
        .end_reservation(&user, &request.scooter_id, request.lat, request.lng)
        .await?;

    let message = format!("Rental completed! Total charge: ${}", response.cost.total);
    Ok(Json(ApiResponse::success_with_message(response, message)))
}

async fn get_active_rental(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ActiveRentalResponse>, AppError> {
    let controller = RentalController::new(&state);
    let response = controller.active_rental(&user).await?;
    Ok(Json(response))
}

async fn get_rental_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<RentalHistoryResponse>, AppError> {
    let controller = RentalController::new(&state);
    let response = controller.rental_history(&user).await?;
    Ok(Json(response))
}
