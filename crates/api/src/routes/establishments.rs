//! Establishment endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use domain::models::{DonationView, EstablishmentView};
use persistence::repositories::{DonationRepository, EstablishmentRepository};

use crate::app::AppState;
use crate::error::ApiError;

/// Fetch an establishment profile.
///
/// GET /api/v1/establishments/:establishment_id
pub async fn get_establishment(
    State(state): State<AppState>,
    Path(establishment_id): Path<i64>,
) -> Result<Json<EstablishmentView>, ApiError> {
    let repo = EstablishmentRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(establishment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Establishment not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// List every donation an establishment has published, in any status.
///
/// GET /api/v1/establishments/:establishment_id/donations
///
/// A pure projection: an unknown establishment yields an empty list rather
/// than an error.
pub async fn list_establishment_donations(
    State(state): State<AppState>,
    Path(establishment_id): Path<i64>,
) -> Result<Json<Vec<DonationView>>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    let entities = repo.list_by_establishment(establishment_id).await?;
    Ok(Json(entities.into_iter().map(DonationView::from).collect()))
}
