//! User domain: entity, validation, repository trait

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_password, validate_phone_number,
    validate_registration, UserValidationError,
};
