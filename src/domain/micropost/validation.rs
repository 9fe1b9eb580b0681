//! Micropost validation utilities

use thiserror::Error;

use super::entity::ImageAttachment;

/// Errors that can occur during micropost validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MicropostValidationError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Content exceeds maximum length of {0} characters")]
    ContentTooLong(usize),

    #[error("Image should be less than {0} MB")]
    ImageTooLarge(u64),
}

const MAX_CONTENT_LENGTH: usize = 140;
const MAX_IMAGE_MEGABYTES: u64 = 5;
const MAX_IMAGE_BYTES: u64 = MAX_IMAGE_MEGABYTES * 1024 * 1024;

/// Validate micropost content: non-empty, at most 140 characters.
pub fn validate_content(content: &str) -> Result<(), MicropostValidationError> {
    if content.trim().is_empty() {
        return Err(MicropostValidationError::EmptyContent);
    }

    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(MicropostValidationError::ContentTooLong(MAX_CONTENT_LENGTH));
    }

    Ok(())
}

/// Validate an attached image, if any: at most 5 MB.
pub fn validate_image(image: Option<&ImageAttachment>) -> Result<(), MicropostValidationError> {
    if let Some(image) = image {
        if image.byte_size > MAX_IMAGE_BYTES {
            return Err(MicropostValidationError::ImageTooLarge(MAX_IMAGE_MEGABYTES));
        }
    }

    Ok(())
}

/// Validate the whole micropost payload, collecting field-level failures.
pub fn validate_micropost(
    content: &str,
    image: Option<&ImageAttachment>,
) -> Result<(), Vec<MicropostValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_content(content) {
        errors.push(e);
    }
    if let Err(e) = validate_image(image) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of_size(byte_size: u64) -> ImageAttachment {
        ImageAttachment {
            filename: "pic.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            byte_size,
        }
    }

    #[test]
    fn test_content_at_limit_accepted() {
        let content = "a".repeat(140);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn test_content_over_limit_rejected() {
        let content = "a".repeat(141);
        assert_eq!(
            validate_content(&content),
            Err(MicropostValidationError::ContentTooLong(140))
        );
    }

    #[test]
    fn test_empty_content_rejected() {
        assert_eq!(
            validate_content(""),
            Err(MicropostValidationError::EmptyContent)
        );
        assert_eq!(
            validate_content("   "),
            Err(MicropostValidationError::EmptyContent)
        );
    }

    #[test]
    fn test_content_length_counts_characters_not_bytes() {
        // 140 multi-byte characters is still 140 characters
        let content = "あ".repeat(140);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn test_image_at_limit_accepted() {
        assert!(validate_image(Some(&image_of_size(5 * 1024 * 1024))).is_ok());
        assert!(validate_image(None).is_ok());
    }

    #[test]
    fn test_image_over_limit_rejected() {
        assert_eq!(
            validate_image(Some(&image_of_size(5 * 1024 * 1024 + 1))),
            Err(MicropostValidationError::ImageTooLarge(5))
        );
    }

    #[test]
    fn test_validate_micropost_collects_errors() {
        let content = "a".repeat(141);
        let image = image_of_size(6 * 1024 * 1024);

        let errors = validate_micropost(&content, Some(&image)).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
