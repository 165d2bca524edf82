//! Cross-crate helpers: the field validators used by the donation
//! request types.

pub mod validation;
