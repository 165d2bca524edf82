//! Domain services for FoodBridge.
//!
//! Services contain business logic that operates on domain models.

pub mod lifecycle;

pub use lifecycle::{
    can_cancel, can_delete, can_pick_up, can_reserve, is_consistent, TransitionError,
};
