//! Infrastructure layer - credential store, repositories, services

pub mod auth;
pub mod micropost;
pub mod notification;
pub mod user;

pub use auth::{generate_token, Argon2Hasher, HasherCost, SecretHasher};
pub use micropost::{
    CreateMicropostRequest, InMemoryMicropostRepository, MicropostService,
    PostgresMicropostRepository,
};
pub use notification::{NotificationSender, TracingNotificationSender};
pub use user::{
    InMemoryUserRepository, PostgresUserRepository, RegisterRequest, UpdateProfileRequest,
    UserService,
};
