//! Donation lifecycle rules.
//!
//! The transition table for a donation:
//!
//! ```text
//!             reserve(food_bank)
//!  AVAILABLE ──────────────────► RESERVED ──────────► COMPLETED (terminal)
//!       ▲                           │       pick_up
//!       └───────────────────────────┘
//!             cancel(food_bank)
//! ```
//!
//! These checks are pure and run against an in-memory snapshot of the
//! donation and its assignment. Handlers use them to fail fast with a precise
//! error; the authoritative guard against racing writers is the
//! compare-and-set update inside the storage transaction, which re-checks the
//! same conditions.

use thiserror::Error;

use crate::models::{AssignmentView, DonationStatus};

/// Why a requested transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("donation is already reserved")]
    AlreadyReserved,
    #[error("donation has no reservation")]
    NotReserved,
    #[error("reservation is held by another food bank")]
    ReservedByOther,
    #[error("donation has already been picked up")]
    AlreadyCompleted,
    #[error("a reservation record still references this donation")]
    AssignmentExists,
}

/// A donation can be reserved only while it is AVAILABLE and unassigned.
pub fn can_reserve(status: DonationStatus, has_assignment: bool) -> Result<(), TransitionError> {
    if status == DonationStatus::Available && !has_assignment {
        Ok(())
    } else {
        Err(TransitionError::AlreadyReserved)
    }
}

/// A reservation can be cancelled by the food bank holding it, until pickup.
///
/// Check order matters for error reporting: a missing assignment is reported
/// before ownership, ownership before the terminal-state conflict.
pub fn can_cancel(
    assignment: Option<&AssignmentView>,
    food_bank_id: i64,
) -> Result<(), TransitionError> {
    let assignment = assignment.ok_or(TransitionError::NotReserved)?;
    if assignment.food_bank_id != food_bank_id {
        return Err(TransitionError::ReservedByOther);
    }
    if !assignment.is_live() {
        return Err(TransitionError::AlreadyCompleted);
    }
    Ok(())
}

/// A reserved donation can be picked up exactly once.
pub fn can_pick_up(assignment: Option<&AssignmentView>) -> Result<(), TransitionError> {
    let assignment = assignment.ok_or(TransitionError::NotReserved)?;
    if !assignment.is_live() {
        return Err(TransitionError::AlreadyCompleted);
    }
    Ok(())
}

/// A donation can be deleted only while no assignment references it, so a
/// promised or completed donation never vanishes.
pub fn can_delete(has_assignment: bool) -> Result<(), TransitionError> {
    if has_assignment {
        return Err(TransitionError::AssignmentExists);
    }
    Ok(())
}

/// The structural invariant: RESERVED and COMPLETED donations carry exactly
/// one assignment, AVAILABLE donations carry none.
pub fn is_consistent(status: DonationStatus, has_assignment: bool) -> bool {
    match status {
        DonationStatus::Available => !has_assignment,
        DonationStatus::Reserved | DonationStatus::Completed => has_assignment,
    }
}
