//! Food bank endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use domain::models::{DonationView, FoodBankView};
use persistence::repositories::{DonationRepository, FoodBankRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Fetch a food bank profile.
///
/// GET /api/v1/food-banks/:food_bank_id
pub async fn get_food_bank(
    State(state): State<AppState>,
    Path(food_bank_id): Path<i64>,
) -> Result<Json<FoodBankView>, ApiError> {
    let repo = FoodBankRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(food_bank_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food bank not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// List every donation a food bank has ever held, reserved or completed.
///
/// GET /api/v1/food-banks/:food_bank_id/donations
///
/// A pure projection: an unknown food bank yields an empty list rather than
/// an error.
pub async fn list_food_bank_donations(
    State(state): State<AppState>,
    Path(food_bank_id): Path<i64>,
) -> Result<Json<Vec<DonationView>>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    let entities = repo.list_by_food_bank(food_bank_id).await?;
    Ok(Json(entities.into_iter().map(DonationView::from).collect()))
}
