//! Domain models for FoodBridge.

pub mod assignment;
pub mod donation;
pub mod establishment;
pub mod food_bank;

pub use assignment::AssignmentView;
pub use donation::{DonationStatus, DonationView};
pub use establishment::EstablishmentView;
pub use food_bank::FoodBankView;
