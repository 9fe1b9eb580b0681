//! Micropost infrastructure: repositories and service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresMicropostRepository;
pub use repository::InMemoryMicropostRepository;
pub use service::{CreateMicropostRequest, MicropostService};
