//! Repository implementations for database operations.

pub mod assignment;
pub mod donation;
pub mod establishment;
pub mod food_bank;

pub use assignment::AssignmentRepository;
pub use donation::{
    CancelOutcome, DeleteOutcome, DonationRepository, PickupOutcome, ReserveOutcome,
};
pub use establishment::EstablishmentRepository;
pub use food_bank::FoodBankRepository;
