//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email is not a valid address")]
    InvalidEmailFormat,

    #[error("Phone number cannot be empty")]
    EmptyPhoneNumber,

    #[error("Phone number must start with 0 followed by 9 or 10 digits")]
    InvalidPhoneNumberFormat,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password confirmation does not match")]
    PasswordConfirmationMismatch,
}

const MAX_NAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 6;

// local@domain.tld, case-insensitive
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-.]+\.[a-z]+$").expect("email regex must compile")
});

static PHONE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0\d{9,10}$").expect("phone regex must compile"));

/// Validate a display name
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
pub fn validate_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 255 characters
/// - Must look like local@domain.tld (case-insensitive)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmailFormat);
    }

    Ok(())
}

/// Validate a phone number: a leading 0 followed by 9 or 10 digits.
pub fn validate_phone_number(phone_number: &str) -> Result<(), UserValidationError> {
    if phone_number.trim().is_empty() {
        return Err(UserValidationError::EmptyPhoneNumber);
    }

    if !PHONE_NUMBER_REGEX.is_match(phone_number) {
        return Err(UserValidationError::InvalidPhoneNumberFormat);
    }

    Ok(())
}

/// Validate a password: minimum 6 characters.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate the whole registration payload, collecting every field-level
/// failure instead of stopping at the first.
pub fn validate_registration(
    name: &str,
    email: &str,
    phone_number: &str,
    password: &str,
    password_confirmation: &str,
) -> Result<(), Vec<UserValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_name(name) {
        errors.push(e);
    }
    if let Err(e) = validate_email(email) {
        errors.push(e);
    }
    if let Err(e) = validate_phone_number(phone_number) {
        errors.push(e);
    }
    if let Err(e) = validate_password(password) {
        errors.push(e);
    }
    if password != password_confirmation {
        errors.push(UserValidationError::PasswordConfirmationMismatch);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
