//! Food bank profile model.
//!
//! Registration and profile editing happen in an external system; this
//! service only reads the identity record.

use serde::Serialize;

/// Public profile of a receiving food bank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FoodBankView {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
