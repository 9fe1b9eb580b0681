//! Domain layer - entities, validation, repository traits, pure policy

pub mod auth;
pub mod error;
pub mod feed;
pub mod micropost;
pub mod user;

pub use auth::{Gate, TokenPurpose, TokenSlot};
pub use error::DomainError;
pub use feed::FeedQuery;
pub use micropost::{
    ImageAttachment, Micropost, MicropostId, MicropostRepository, NewMicropost,
};
pub use user::{NewUser, User, UserId, UserRepository};
