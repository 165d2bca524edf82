//! Donation entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{DonationStatus, DonationView};
use sqlx::FromRow;

/// Database enum for donation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "donation_status", rename_all = "lowercase")]
pub enum DonationStatusDb {
    Available,
    Reserved,
    Completed,
}

impl From<DonationStatusDb> for DonationStatus {
    fn from(status: DonationStatusDb) -> Self {
        match status {
            DonationStatusDb::Available => DonationStatus::Available,
            DonationStatusDb::Reserved => DonationStatus::Reserved,
            DonationStatusDb::Completed => DonationStatus::Completed,
        }
    }
}

impl From<DonationStatus> for DonationStatusDb {
    fn from(status: DonationStatus) -> Self {
        match status {
            DonationStatus::Available => DonationStatusDb::Available,
            DonationStatus::Reserved => DonationStatusDb::Reserved,
            DonationStatus::Completed => DonationStatusDb::Completed,
        }
    }
}

/// Database row mapping for the donations table.
#[derive(Debug, Clone, FromRow)]
pub struct DonationEntity {
    pub id: i64,
    pub establishment_id: i64,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: DateTime<Utc>,
    pub photo_url: Option<String>,
    pub status: DonationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Donation row joined with its establishment and, when present, its
/// assignment and the receiving food bank. This is the row shape behind
/// every donation read.
#[derive(Debug, Clone, FromRow)]
pub struct DonationDetailsEntity {
    pub id: i64,
    pub establishment_id: i64,
    pub establishment_name: String,
    pub assignment_id: Option<i64>,
    pub food_bank_id: Option<i64>,
    pub food_bank_name: Option<String>,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub expiration_date: DateTime<Utc>,
    pub photo_url: Option<String>,
    pub status: DonationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DonationDetailsEntity> for DonationView {
    fn from(row: DonationDetailsEntity) -> Self {
        let status: DonationStatus = row.status.into();
        if !domain::services::is_consistent(status, row.assignment_id.is_some()) {
            // Should be unreachable: every transition moves status and
            // assignment in one transaction
            tracing::warn!(
                donation_id = row.id,
                %status,
                "donation row violates the status/assignment invariant"
            );
        }
        DonationView {
            id: row.id,
            establishment_id: row.establishment_id,
            establishment: row.establishment_name,
            assignment_id: row.assignment_id,
            food_bank_id: row.food_bank_id,
            food_bank: row.food_bank_name,
            product_name: row.product_name,
            description: row.description,
            quantity: row.quantity,
            unit: row.unit,
            expiration_date: row.expiration_date,
            photo_url: row.photo_url,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
