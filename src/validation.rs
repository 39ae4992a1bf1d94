//! Character rules for user-entered names, labels and emails.
use crate::error::{KronosError, Result};

/// Letters, digits and whitespace.
pub fn is_plain_text(input: &str) -> bool {
    input.chars().all(|c| c.is_alphanumeric() || c.is_whitespace())
}

pub fn is_letters(input: &str) -> bool {
    input.chars().all(char::is_alphabetic)
}

/// Letters, digits, `@` and `.`.
pub fn is_valid_email(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_alphanumeric() || c == '@' || c == '.')
}

/// Rejects blank input and input outside `rule`, naming `field` in the error.
pub fn require(field: &str, input: &str, rule: fn(&str) -> bool, hint: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(KronosError::Validation(format!("{field} is required.")));
    }
    if !rule(input) {
        return Err(KronosError::Validation(format!(
            "Invalid {}: use only {hint}.",
            field.to_lowercase()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_allows_letters_digits_and_spaces() {
        assert!(is_plain_text("Website v2"));
        assert!(!is_plain_text("Website-v2"));
        assert!(!is_plain_text("R&D"));
    }

    #[test]
    fn letters_reject_digits_and_spaces() {
        assert!(is_letters("Acme"));
        assert!(!is_letters("Acme 2"));
        assert!(!is_letters("Acme Corp"));
    }

    #[test]
    fn email_allows_at_and_dot_only() {
        assert!(is_valid_email("jo.smith@example.com"));
        assert!(!is_valid_email("jo+tag@example.com"));
        assert!(!is_valid_email("jo smith@example.com"));
    }

    #[test]
    fn require_reports_blank_and_bad_input() {
        let err = require("Client", " ", is_letters, "letters").unwrap_err();
        assert_eq!(err.to_string(), "Client is required.");
        let err = require("Client", "Acme2", is_letters, "letters").unwrap_err();
        assert_eq!(err.to_string(), "Invalid client: use only letters.");
        assert!(require("Client", "Acme", is_letters, "letters").is_ok());
    }
}
