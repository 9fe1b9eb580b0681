//! Authorization guard: pure predicates over an explicit acting identity
//!
//! The acting user is always passed in; nothing here reads ambient request
//! state, so every policy decision is testable in isolation.

use crate::domain::user::{User, UserId};

/// Identity equality by primary key.
pub fn is_self(actor: &User, target: UserId) -> bool {
    actor.id() == target
}

/// Reads the admin flag.
pub fn is_admin(actor: &User) -> bool {
    actor.is_admin()
}

/// A gated action on a target resource.
///
/// Micropost creation/destruction is not gated here: ownership is enforced
/// by scoping the post lookup to the actor, so a foreign post is simply
/// not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Editing or updating a profile requires acting on oneself.
    EditProfile { target: UserId },
    /// Destroying a user requires the admin flag.
    DestroyUser,
}

/// Whether `actor` may pass `gate`. A false answer is a control-flow
/// decision for the caller (route to the safe default), never an error.
pub fn permits(actor: &User, gate: Gate) -> bool {
    match gate {
        Gate::EditProfile { target } => is_self(actor, target),
        Gate::DestroyUser => is_admin(actor),
    }
}
