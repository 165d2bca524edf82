//! Assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AssignmentView;
use sqlx::FromRow;

/// Database row mapping for the donation_assignments table.
///
/// The table carries a UNIQUE constraint on donation_id; a donation can never
/// hold two assignments no matter how requests interleave.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: i64,
    pub donation_id: i64,
    pub food_bank_id: i64,
    pub accepted_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
}

impl From<AssignmentEntity> for AssignmentView {
    fn from(row: AssignmentEntity) -> Self {
        AssignmentView {
            id: row.id,
            donation_id: row.donation_id,
            food_bank_id: row.food_bank_id,
            accepted_at: row.accepted_at,
            picked_up_at: row.picked_up_at,
        }
    }
}
