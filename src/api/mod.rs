//! API layer - axum handlers and shared request plumbing

pub mod account_activations;
pub mod health;
pub mod microposts;
pub mod middleware;
pub mod password_resets;
pub mod router;
pub mod sessions;
pub mod state;
pub mod types;
pub mod users;

pub use router::create_router;
pub use state::AppState;
