//! HTTP route handlers.

pub mod donations;
pub mod establishments;
pub mod food_banks;
pub mod health;
