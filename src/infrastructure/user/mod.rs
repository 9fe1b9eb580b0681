//! User infrastructure: repositories and service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{RegisterRequest, UpdateProfileRequest, UserService};
