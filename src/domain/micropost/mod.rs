//! Micropost domain: entity, validation, repository trait

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{ImageAttachment, Micropost, MicropostId, NewMicropost};
pub use repository::MicropostRepository;
pub use validation::{
    validate_content, validate_image, validate_micropost, MicropostValidationError,
};
