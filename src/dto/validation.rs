//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::error::ServiceError;

/// Validates that a viewer or manage identifier can be placed in a URL path or query.
///
/// # Examples
///
/// ```ignore
/// validate_public_id("AbC-123_x") // Ok
/// validate_public_id("")          // Err - empty
/// validate_public_id("a/b")       // Err - path separator
/// ```
pub fn validate_public_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > 128 {
        let mut err = ValidationError::new("public_id_length");
        err.message = Some(
            format!(
                "Identifier must be between 1 and 128 characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("public_id_format");
        err.message =
            Some("Identifier may only contain ASCII letters, digits, '-' and '_'".into());
        return Err(err);
    }

    Ok(())
}

/// [`validate_public_id`] for identifiers that reach a service call; `what` names the
/// identifier in the error.
pub fn ensure_public_id(what: &str, id: &str) -> Result<(), ServiceError> {
    validate_public_id(id)
        .map_err(|err| ServiceError::InvalidInput(format!("invalid {what} identifier: {err}")))
}
