use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::controllers::SearchController;
use crate::dto::rental_dto::EstimateQuery;
use crate::dto::scooter_dto::{ScooterResponse, ScooterSearchResult, SearchQuery};
use crate::services::PricingEngine;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_scooter_router() -> Router<AppState> {
    Router::new()
        .route("/available", get(view_all_available))
        .route("/search", get(search))
        .route("/pricing", get(get_pricing))
        .route("/pricing/estimate", get(estimate_cost))
}

/// Scooters libres en toda la flota
async fn view_all_available(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScooterResponse>>, AppError> {
    let controller = SearchController::new(&state);
    let response = controller.list_available().await?;
    Ok(Json(response))
}

/// Búsqueda por radio alrededor de un punto
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ScooterSearchResult>>, AppError> {
    let controller = SearchController::new(&state);
    let response = controller
        .search(params.lat, params.lng, params.radius)
        .await?;
    Ok(Json(response))
}

/// Tarifas vigentes
async fn get_pricing(State(state): State<AppState>) -> Json<serde_json::Value> {
    let engine = PricingEngine::new(state.pricing.clone());
    let pricing = engine.pricing_info();

    Json(json!({
        "pricing": pricing,
        "summary": {
            "unlock_fee": format!("${:.2}", pricing.unlock_fee),
            "hourly": format!("${:.2}/hr", pricing.hourly_rate),
            "daily": format!("${:.2}/day", pricing.daily_rate),
            "weekly": format!("${:.2}/week", pricing.weekly_rate),
            "monthly": format!("${:.2}/month", pricing.monthly_rate),
        }
    }))
}

/// Previsualización de coste para una duración dada
async fn estimate_cost(
    State(state): State<AppState>,
    Query(params): Query<EstimateQuery>,
) -> Result<Json<crate::models::pricing::CostBreakdown>, AppError> {
    let engine = PricingEngine::new(state.pricing.clone());
    let estimate = engine.estimate_cost(params.hours, params.days)?;
    Ok(Json(estimate))
}
