//! PostgreSQL persistence for FoodBridge: pool construction, row entities,
//! and the repositories the HTTP layer drives.

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
