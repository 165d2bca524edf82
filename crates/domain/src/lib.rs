//! Donation domain types and lifecycle rules, shared by the persistence
//! and api crates.

pub mod models;
pub mod services;
