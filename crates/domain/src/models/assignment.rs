//! Assignment domain model binding a donation to a food bank.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A reservation record. At most one exists per donation; it is deleted on
/// cancellation and kept permanently once the pickup timestamp is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentView {
    pub id: i64,
    pub donation_id: i64,
    pub food_bank_id: i64,
    pub accepted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<DateTime<Utc>>,
}

impl AssignmentView {
    /// True while the reservation can still be cancelled.
    pub fn is_live(&self) -> bool {
        self.picked_up_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_is_live_until_picked_up() {
        let mut assignment = AssignmentView {
            id: 1,
            donation_id: 10,
            food_bank_id: 7,
            accepted_at: Utc::now(),
            picked_up_at: None,
        };
        assert!(assignment.is_live());

        assignment.picked_up_at = Some(Utc::now());
        assert!(!assignment.is_live());
    }

    #[test]
    fn test_assignment_serializes_without_pickup_when_live() {
        let assignment = AssignmentView {
            id: 1,
            donation_id: 10,
            food_bank_id: 7,
            accepted_at: Utc::now(),
            picked_up_at: None,
        };
        let json = serde_json::to_value(&assignment).unwrap();
        assert!(json.get("picked_up_at").is_none());
        assert_eq!(json["food_bank_id"], 7);
    }
}
