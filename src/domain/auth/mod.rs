//! Authentication and authorization domain types

pub mod guard;
pub mod token;

pub use guard::{is_admin, is_self, permits, Gate};
pub use token::{TokenPurpose, TokenSlot};
