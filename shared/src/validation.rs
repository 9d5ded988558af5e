//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

use validator::ValidationErrors;

/// Minimum accepted password length, applied at registration and on password change
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum accepted password size in bytes. bcrypt ignores everything past
/// the 72nd byte, so longer inputs would collide on their prefix.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| format!("Email pattern error: {}", e))?;
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password length: at least six characters, at most 72 bytes
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}

/// Reject values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty").user_message());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "email" => "Email",
        "password" | "new_password" => "Password",
        "first_name" => "First Name",
        "last_name" => "Last Name",
        "phone" => "Phone",
        "member_id" => "Member",
        "amount" => "Amount",
        "period" => "Period",
        "title" => "Title",
        "budget" => "Budget",
        "label" => "Label",
        "event_id" => "Event",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Flatten `validator` derive errors into one user-facing sentence.
///
/// Fields are sorted so the message is stable across runs.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field: &str = &field;
            errs.iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    ValidationError::new(field, &message).user_message()
                })
                .collect::<Vec<_>>()
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@x.com")]
    #[case("first.last@association.sn")]
    #[case("tresorier+dahira@example.org")]
    fn test_valid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign.com")]
    #[case("spaces in@x.com")]
    #[case("missing@tld")]
    fn test_invalid_emails(#[case] email: &str) {
        assert!(validate_email(email).is_err());
    }

    #[test]
    fn test_password_minimum_is_six() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("secret1").is_ok());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Six characters, more than six bytes
        assert!(validate_password("éééééé").is_ok());
        assert!(validate_password("ééééé").is_err());
    }

    #[test]
    fn test_password_maximum_is_counted_in_bytes() {
        assert!(validate_password(&"a".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(validate_password(&"a".repeat(MAX_PASSWORD_BYTES + 1)).is_err());

        // 37 two-byte characters: under 72 characters, over 72 bytes
        let accented = "é".repeat(37);
        assert_eq!(accented.len(), 74);
        assert!(validate_password(&accented).is_err());
        assert!(validate_password(&"é".repeat(36)).is_ok());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("title", "Magal").is_ok());
        let err = validate_not_blank("title", "   ").unwrap_err();
        assert_eq!(err, "Title: must not be empty");
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("first_name", "must not be empty");
        assert_eq!(err.field, "first_name");
        assert_eq!(err.display_label, "First Name");
        assert_eq!(err.user_message(), "First Name: must not be empty");
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("member_id"), "Member");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_password_length_valid(len in MIN_PASSWORD_LENGTH..=MAX_PASSWORD_BYTES) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_ok());
        }

        #[test]
        fn prop_password_too_short(len in 0usize..MIN_PASSWORD_LENGTH) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_err());
        }

        #[test]
        fn prop_password_over_byte_limit_rejected(password in "\\PC{6,80}") {
            prop_assert_eq!(
                validate_password(&password).is_ok(),
                password.len() <= MAX_PASSWORD_BYTES
            );
        }
    }
}
