use axum::{
    extract::State,
    middleware,
    routing::{delete, get, put},
    Extension, Json, Router,
};

use crate::controllers::ProfileController;
use crate::dto::api::ApiResponse;
use crate::dto::profile_dto::{
    PaymentMethodResponse, PaymentMethodView, ProfileResponse, UpdatePaymentMethodRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_profile_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/payment-method", get(get_payment_method))
        .route("/payment-method", put(update_payment_method))
        .route("/payment-method", delete(remove_payment_method))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.get_profile(&user).await?;
    Ok(Json(response))
}

async fn update_payment_method(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdatePaymentMethodRequest>,
) -> Result<Json<ApiResponse<PaymentMethodView>>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.update_payment_method(&user, request).await?;
    let message = format!(
        "{} ending in {} added successfully",
        response.card_type,
        &response.card_number_masked[response.card_number_masked.len() - 4..]
    );
    Ok(Json(ApiResponse::success_with_message(response, message)))
}

async fn get_payment_method(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PaymentMethodResponse>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.get_payment_method(&user).await?;
    Ok(Json(response))
}

async fn remove_payment_method(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ProfileController::new(&state);
    controller.remove_payment_method(&user).await?;
    Ok(Json(ApiResponse::message_only(
        "Payment method removed".to_string(),
    )))
}
