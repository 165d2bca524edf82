//! Food bank entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FoodBankView;
use sqlx::FromRow;

/// Database row mapping for the food_banks table.
#[derive(Debug, Clone, FromRow)]
pub struct FoodBankEntity {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FoodBankEntity> for FoodBankView {
    fn from(row: FoodBankEntity) -> Self {
        FoodBankView {
            id: row.id,
            name: row.name,
            address: row.address,
            contact_phone: row.contact_phone,
            opening_hours: row.opening_hours,
            description: row.description,
        }
    }
}
