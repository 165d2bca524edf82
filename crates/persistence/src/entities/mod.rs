//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod assignment;
pub mod donation;
pub mod establishment;
pub mod food_bank;

pub use assignment::AssignmentEntity;
pub use donation::{DonationDetailsEntity, DonationEntity, DonationStatusDb};
pub use establishment::EstablishmentEntity;
pub use food_bank::FoodBankEntity;
