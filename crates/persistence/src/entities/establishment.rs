//! Establishment entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::EstablishmentView;
use sqlx::FromRow;

/// Database row mapping for the establishments table.
#[derive(Debug, Clone, FromRow)]
pub struct EstablishmentEntity {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
    pub opening_hours: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EstablishmentEntity> for EstablishmentView {
    fn from(row: EstablishmentEntity) -> Self {
        EstablishmentView {
            id: row.id,
            name: row.name,
            address: row.address,
            contact_phone: row.contact_phone,
            opening_hours: row.opening_hours,
            description: row.description,
        }
    }
}
