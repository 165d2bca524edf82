//! Donation endpoint handlers.
//!
//! Lifecycle transitions check the pure rules first for a precise error,
//! then run the storage transaction whose compare-and-set update is the
//! authoritative guard against racing callers.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::donation::{
    CreateDonationRequest, DonationStatusQuery, ReservedDonationsQuery, UpdateDonationRequest,
};
use domain::models::{AssignmentView, DonationStatus, DonationView};
use domain::services::{can_cancel, can_pick_up, can_reserve, TransitionError};
use persistence::repositories::{
    AssignmentRepository, CancelOutcome, DeleteOutcome, DonationRepository,
    EstablishmentRepository, FoodBankRepository, PickupOutcome, ReserveOutcome,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_donation_picked_up, record_donation_published, record_donation_reserved,
    record_reservation_cancelled,
};

/// Map a refused transition to its API error.
fn transition_error(err: TransitionError) -> ApiError {
    match err {
        TransitionError::AlreadyReserved => {
            ApiError::Conflict("Donation is already reserved".to_string())
        }
        TransitionError::NotReserved => ApiError::NotFound("Assignment not found".to_string()),
        TransitionError::ReservedByOther => {
            ApiError::Conflict("Reservation is held by another food bank".to_string())
        }
        TransitionError::AlreadyCompleted => {
            ApiError::Conflict("Donation has already been picked up".to_string())
        }
        TransitionError::AssignmentExists => {
            ApiError::Conflict("Donation has a reservation and cannot be deleted".to_string())
        }
    }
}

/// Publish a new donation.
///
/// POST /api/v1/donations
pub async fn create_donation(
    State(state): State<AppState>,
    Json(request): Json<CreateDonationRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<DonationView>), ApiError> {
    request.validate()?;

    let establishment_repo = EstablishmentRepository::new(state.pool.clone());
    establishment_repo
        .find_by_id(request.establishment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Establishment not found".to_string()))?;

    let donation_repo = DonationRepository::new(state.pool.clone());
    let entity = donation_repo
        .create(
            request.establishment_id,
            &request.product_name,
            request.description.as_deref(),
            request.quantity,
            &request.unit,
            request.expiration_date,
            request.photo_url.as_deref(),
        )
        .await?;

    let view: DonationView = entity.into();
    record_donation_published();
    info!(
        donation_id = view.id,
        establishment_id = view.establishment_id,
        "Donation published"
    );

    let location = format!("/api/v1/donations/{}", view.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(view)))
}

/// List donations in a given status.
///
/// GET /api/v1/donations?status=AVAILABLE
///
/// The status parameter is required; its value is parsed case-insensitively.
pub async fn list_donations(
    State(state): State<AppState>,
    Query(query): Query<DonationStatusQuery>,
) -> Result<Json<Vec<DonationView>>, ApiError> {
    let status_str = query
        .status
        .ok_or_else(|| ApiError::Validation("status query parameter is required".to_string()))?;
    let status: DonationStatus = status_str
        .parse()
        .map_err(|e: domain::models::donation::ParseDonationStatusError| {
            ApiError::Validation(e.to_string())
        })?;

    let repo = DonationRepository::new(state.pool.clone());
    let entities = repo.list_by_status(status.into()).await?;
    Ok(Json(entities.into_iter().map(DonationView::from).collect()))
}

/// List the donations currently reserved by a food bank.
///
/// GET /api/v1/donations/reserved?food_bank_id=N
pub async fn list_reserved_donations(
    State(state): State<AppState>,
    Query(query): Query<ReservedDonationsQuery>,
) -> Result<Json<Vec<DonationView>>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    let entities = repo.list_reserved_by_food_bank(query.food_bank_id).await?;
    Ok(Json(entities.into_iter().map(DonationView::from).collect()))
}

/// Fetch a single donation.
///
/// GET /api/v1/donations/:donation_id
pub async fn get_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<i64>,
) -> Result<Json<DonationView>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    let entity = repo
        .find_details(donation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;
    Ok(Json(entity.into()))
}

/// Partially update a donation's editable fields.
///
/// PUT /api/v1/donations/:donation_id
///
/// Status never changes here; reserve, cancel and pickup are the only
/// operations that move it. An empty body reads back the current state.
pub async fn update_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<i64>,
    Json(request): Json<UpdateDonationRequest>,
) -> Result<Json<DonationView>, ApiError> {
    request.validate()?;

    let repo = DonationRepository::new(state.pool.clone());
    if request.is_empty() {
        let entity = repo
            .find_details(donation_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;
        return Ok(Json(entity.into()));
    }

    let entity = repo
        .update_fields(
            donation_id,
            request.product_name.as_deref(),
            request.description.as_deref(),
            request.quantity,
            request.unit.as_deref(),
            request.expiration_date,
            request.photo_url.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;

    info!(donation_id, "Donation updated");
    Ok(Json(entity.into()))
}

/// Delete a donation no assignment references, returning its last view.
///
/// DELETE /api/v1/donations/:donation_id
pub async fn delete_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<i64>,
) -> Result<Json<DonationView>, ApiError> {
    let repo = DonationRepository::new(state.pool.clone());
    match repo.delete(donation_id).await? {
        DeleteOutcome::Deleted(entity) => {
            info!(donation_id, "Donation deleted");
            Ok(Json(entity.into()))
        }
        DeleteOutcome::NotFound => Err(ApiError::NotFound("Donation not found".to_string())),
        DeleteOutcome::AssignmentExists => Err(transition_error(TransitionError::AssignmentExists)),
    }
}

/// Reserve an available donation for a food bank.
///
/// POST /api/v1/donations/:donation_id/reserve/:food_bank_id
pub async fn reserve_donation(
    State(state): State<AppState>,
    Path((donation_id, food_bank_id)): Path<(i64, i64)>,
) -> Result<Json<DonationView>, ApiError> {
    let donation_repo = DonationRepository::new(state.pool.clone());
    let details = donation_repo
        .find_details(donation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;

    let status: DonationStatus = details.status.into();
    can_reserve(status, details.assignment_id.is_some()).map_err(transition_error)?;

    let food_bank_repo = FoodBankRepository::new(state.pool.clone());
    food_bank_repo
        .find_by_id(food_bank_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food bank not found".to_string()))?;

    match donation_repo.reserve(donation_id, food_bank_id).await? {
        ReserveOutcome::Reserved(entity) => {
            record_donation_reserved();
            info!(donation_id, food_bank_id, "Donation reserved");
            Ok(Json(entity.into()))
        }
        ReserveOutcome::DonationNotFound => {
            Err(ApiError::NotFound("Donation not found".to_string()))
        }
        ReserveOutcome::AlreadyReserved => {
            Err(transition_error(TransitionError::AlreadyReserved))
        }
    }
}

/// Cancel a reservation, returning the donation to the available pool.
///
/// POST /api/v1/donations/:donation_id/cancel/:food_bank_id
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path((donation_id, food_bank_id)): Path<(i64, i64)>,
) -> Result<Json<DonationView>, ApiError> {
    let donation_repo = DonationRepository::new(state.pool.clone());
    donation_repo
        .find_details(donation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;

    let assignment_repo = AssignmentRepository::new(state.pool.clone());
    let assignment = assignment_repo
        .find_by_donation_id(donation_id)
        .await?
        .map(AssignmentView::from);
    can_cancel(assignment.as_ref(), food_bank_id).map_err(transition_error)?;

    match donation_repo
        .cancel_reservation(donation_id, food_bank_id)
        .await?
    {
        CancelOutcome::Cancelled(entity) => {
            record_reservation_cancelled();
            info!(donation_id, food_bank_id, "Reservation cancelled");
            Ok(Json(entity.into()))
        }
        CancelOutcome::DonationNotFound => {
            Err(ApiError::NotFound("Donation not found".to_string()))
        }
        CancelOutcome::NoAssignment => Err(transition_error(TransitionError::NotReserved)),
        CancelOutcome::HeldByOther => Err(transition_error(TransitionError::ReservedByOther)),
        CancelOutcome::AlreadyPickedUp => {
            Err(transition_error(TransitionError::AlreadyCompleted))
        }
    }
}

/// Record the pickup of a reserved donation, completing its lifecycle.
///
/// POST /api/v1/donations/:donation_id/pickup
pub async fn pick_up_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<i64>,
) -> Result<Json<DonationView>, ApiError> {
    let donation_repo = DonationRepository::new(state.pool.clone());
    donation_repo
        .find_details(donation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;

    let assignment_repo = AssignmentRepository::new(state.pool.clone());
    let assignment = assignment_repo
        .find_by_donation_id(donation_id)
        .await?
        .map(AssignmentView::from);
    can_pick_up(assignment.as_ref()).map_err(transition_error)?;

    match donation_repo.mark_picked_up(donation_id).await? {
        PickupOutcome::PickedUp(entity) => {
            record_donation_picked_up();
            info!(donation_id, "Donation picked up");
            Ok(Json(entity.into()))
        }
        PickupOutcome::DonationNotFound => {
            Err(ApiError::NotFound("Donation not found".to_string()))
        }
        PickupOutcome::NoAssignment => Err(transition_error(TransitionError::NotReserved)),
        PickupOutcome::AlreadyPickedUp => {
            Err(transition_error(TransitionError::AlreadyCompleted))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_missing_assignment_is_not_found() {
        match transition_error(TransitionError::NotReserved) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Assignment not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_transition_error_conflicts() {
        for err in [
            TransitionError::AlreadyReserved,
            TransitionError::ReservedByOther,
            TransitionError::AlreadyCompleted,
            TransitionError::AssignmentExists,
        ] {
            assert!(
                matches!(transition_error(err), ApiError::Conflict(_)),
                "{err:?} should map to a conflict"
            );
        }
    }

    #[test]
    fn test_transition_error_ownership_message() {
        match transition_error(TransitionError::ReservedByOther) {
            ApiError::Conflict(msg) => {
                assert_eq!(msg, "Reservation is held by another food bank");
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }
}
