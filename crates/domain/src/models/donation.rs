//! Donation domain models for the donation lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Status of a donation in its lifecycle.
///
/// `Available` donations can be reserved by a food bank, `Reserved` donations
/// carry exactly one assignment, and `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    Available,
    Reserved,
    Completed,
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationStatus::Available => write!(f, "AVAILABLE"),
            DonationStatus::Reserved => write!(f, "RESERVED"),
            DonationStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Error returned when a status string does not name a known status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized donation status: {0}")]
pub struct ParseDonationStatusError(pub String);

impl std::str::FromStr for DonationStatus {
    type Err = ParseDonationStatusError;

    /// Parses a status string case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(DonationStatus::Available),
            "RESERVED" => Ok(DonationStatus::Reserved),
            "COMPLETED" => Ok(DonationStatus::Completed),
            _ => Err(ParseDonationStatusError(s.trim().to_string())),
        }
    }
}

/// Request to publish a new donation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateDonationRequest {
    pub establishment_id: i64,

    #[validate(length(min = 1, max = 255, message = "Product name must be 1-255 characters"))]
    pub product_name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_quantity"))]
    pub quantity: i32,

    #[validate(length(min = 1, max = 50, message = "Unit must be 1-50 characters"))]
    pub unit: String,

    #[validate(custom(function = "shared::validation::validate_expiration_date"))]
    pub expiration_date: DateTime<Utc>,

    #[validate(length(max = 2048, message = "Photo URL must be at most 2048 characters"))]
    pub photo_url: Option<String>,
}

/// Request to modify an existing donation. Absent fields are left unchanged.
///
/// Status is deliberately not part of this payload. Status changes go through
/// the reserve / cancel / pickup operations so the assignment bookkeeping
/// always moves with them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateDonationRequest {
    #[validate(length(min = 1, max = 255, message = "Product name must be 1-255 characters"))]
    pub product_name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "crate::models::donation::validate_optional_quantity"))]
    pub quantity: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "Unit must be 1-50 characters"))]
    pub unit: Option<String>,

    #[validate(custom(function = "crate::models::donation::validate_optional_expiration"))]
    pub expiration_date: Option<DateTime<Utc>>,

    #[validate(length(max = 2048, message = "Photo URL must be at most 2048 characters"))]
    pub photo_url: Option<String>,
}

impl UpdateDonationRequest {
    /// True when no field is present, in which case there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.expiration_date.is_none()
            && self.photo_url.is_none()
    }
}

/// Validates optional quantity.
pub fn validate_optional_quantity(quantity: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_quantity(quantity)
}

/// Validates optional expiration date.
pub fn validate_optional_expiration(
    expiration: &DateTime<Utc>,
) -> Result<(), validator::ValidationError> {
    shared::validation::validate_expiration_date(expiration)
}

/// Full donation view returned by every read and by state transitions.
///
/// The counter-party fields (establishment name, assignment id, food bank id
/// and name) are resolved at read time; the assignment fields are present
/// exactly when the donation is reserved or completed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationView {
    pub id: i64,
    pub establishment_id: i64,
    pub establishment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_bank_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_bank: Option<String>,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing donations by status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DonationStatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Query parameters for listing the donations a food bank has reserved.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservedDonationsQuery {
    pub food_bank_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn valid_create_request() -> CreateDonationRequest {
        CreateDonationRequest {
            establishment_id: 1,
            product_name: Word().fake(),
            description: Some("Day-old loaves".to_string()),
            quantity: 12,
            unit: "loaves".to_string(),
            expiration_date: Utc::now() + chrono::Duration::days(2),
            photo_url: None,
        }
    }

    #[test]
    fn test_donation_status_display() {
        assert_eq!(DonationStatus::Available.to_string(), "AVAILABLE");
        assert_eq!(DonationStatus::Reserved.to_string(), "RESERVED");
        assert_eq!(DonationStatus::Completed.to_string(), "COMPLETED");
    }

    #[test]
    fn test_donation_status_parse_exact() {
        assert_eq!(
            "AVAILABLE".parse::<DonationStatus>().unwrap(),
            DonationStatus::Available
        );
        assert_eq!(
            "RESERVED".parse::<DonationStatus>().unwrap(),
            DonationStatus::Reserved
        );
        assert_eq!(
            "COMPLETED".parse::<DonationStatus>().unwrap(),
            DonationStatus::Completed
        );
    }

    #[test]
    fn test_donation_status_parse_normalizes_case_and_whitespace() {
        assert_eq!(
            "available".parse::<DonationStatus>().unwrap(),
            DonationStatus::Available
        );
        assert_eq!(
            "  Reserved ".parse::<DonationStatus>().unwrap(),
            DonationStatus::Reserved
        );
        assert_eq!(
            "completed\n".parse::<DonationStatus>().unwrap(),
            DonationStatus::Completed
        );
    }

    #[test]
    fn test_donation_status_parse_rejects_unknown() {
        let err = "PENDING".parse::<DonationStatus>().unwrap_err();
        assert_eq!(err, ParseDonationStatusError("PENDING".to_string()));
        assert!("".parse::<DonationStatus>().is_err());
        assert!("AVAILABLE NOW".parse::<DonationStatus>().is_err());
    }

    #[test]
    fn test_donation_status_serde() {
        assert_eq!(
            serde_json::to_string(&DonationStatus::Available).unwrap(),
            r#""AVAILABLE""#
        );
        let status: DonationStatus = serde_json::from_str(r#""COMPLETED""#).unwrap();
        assert_eq!(status, DonationStatus::Completed);
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_create_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_non_positive_quantity() {
        let mut req = valid_create_request();
        req.quantity = 0;
        assert!(req.validate().is_err());
        req.quantity = -3;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_past_expiration() {
        let mut req = valid_create_request();
        req.expiration_date = Utc::now() - chrono::Duration::days(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_product_name() {
        let mut req = valid_create_request();
        req.product_name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{
            "establishment_id": 1,
            "product_name": "Bread",
            "quantity": 10,
            "unit": "loaves",
            "expiration_date": "2030-01-01T12:00:00Z"
        }"#;
        let req: CreateDonationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.establishment_id, 1);
        assert_eq!(req.product_name, "Bread");
        assert!(req.description.is_none());
        assert!(req.photo_url.is_none());
    }

    #[test]
    fn test_update_request_empty() {
        let req: UpdateDonationRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_partial() {
        let json = r#"{"quantity": 5, "unit": "crates"}"#;
        let req: UpdateDonationRequest = serde_json::from_str(json).unwrap();
        assert!(!req.is_empty());
        assert_eq!(req.quantity, Some(5));
        assert_eq!(req.unit, Some("crates".to_string()));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_bad_values() {
        let req = UpdateDonationRequest {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateDonationRequest {
            expiration_date: Some(Utc::now() - chrono::Duration::days(2)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_donation_view_serializes_without_absent_fields() {
        let view = DonationView {
            id: 1,
            establishment_id: 1,
            establishment: "Corner Bakery".to_string(),
            assignment_id: None,
            food_bank_id: None,
            food_bank: None,
            product_name: "Bread".to_string(),
            description: None,
            quantity: 10,
            unit: "loaves".to_string(),
            expiration_date: Utc::now() + chrono::Duration::days(1),
            photo_url: None,
            status: DonationStatus::Available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "AVAILABLE");
        assert!(json.get("assignment_id").is_none());
        assert!(json.get("food_bank").is_none());
    }
}
