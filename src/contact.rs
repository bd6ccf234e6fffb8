//! Contact form validation.
//!
//! Raw form input is trimmed and checked field by field. Every failing field is
//! reported at once so a form can show all errors together. A `ContactMessage`
//! only exists once every check has passed.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Minimum number of characters in a contact message.
pub const DEFAULT_MIN_MESSAGE_LENGTH: usize = 10;

// local-part@domain.tld, no whitespace, exactly one @
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Form field a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("Name is required")]
    NameRequired,

    #[error("Valid email is required")]
    EmailInvalid,

    #[error("Message is required")]
    MessageRequired,

    #[error("Message must be at least {min} characters")]
    MessageTooShort { min: usize },
}

impl ValidationFailure {
    /// The field this failure belongs to.
    pub fn field(&self) -> Field {
        match self {
            ValidationFailure::NameRequired => Field::Name,
            ValidationFailure::EmailInvalid => Field::Email,
            ValidationFailure::MessageRequired | ValidationFailure::MessageTooShort { .. } => {
                Field::Message
            }
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::NameRequired => "name_required",
            ValidationFailure::EmailInvalid => "email_invalid",
            ValidationFailure::MessageRequired => "message_required",
            ValidationFailure::MessageTooShort { .. } => "message_too_short",
        }
    }
}

/// All failures found in one submission. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn first(&self) -> &ValidationFailure {
        &self.failures[0]
    }

    pub fn contains(&self, failure: &ValidationFailure) -> bool {
        self.failures.contains(failure)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.failures.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    name: String,
    email: String,
    message: String,
    timestamp: DateTime<Utc>,
}

impl ContactMessage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the message was accepted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Validates raw contact form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageValidator {
    min_message_length: usize,
}

impl MessageValidator {
    pub fn new(min_message_length: usize) -> Self {
        Self { min_message_length }
    }

    pub fn min_message_length(&self) -> usize {
        self.min_message_length
    }

    /// Validate a submission, stamping it with the current time.
    pub fn validate(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessage, ValidationErrors> {
        self.validate_at(name, email, message, Utc::now())
    }

    /// Validate a submission accepted at `timestamp`.
    ///
    /// # Returns
    /// * `Ok(ContactMessage)` with trimmed fields if every check passes
    /// * `Err(ValidationErrors)` listing every failing field, in form order
    pub fn validate_at(
        &self,
        name: &str,
        email: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<ContactMessage, ValidationErrors> {
        let name = name.trim();
        let email = email.trim();
        let message = message.trim();

        let mut failures = Vec::new();

        if name.is_empty() {
            failures.push(ValidationFailure::NameRequired);
        }

        if email.is_empty() || !email_regex().is_match(email) {
            failures.push(ValidationFailure::EmailInvalid);
        }

        if message.is_empty() {
            failures.push(ValidationFailure::MessageRequired);
        } else if message.chars().count() < self.min_message_length {
            failures.push(ValidationFailure::MessageTooShort {
                min: self.min_message_length,
            });
        }

        if !failures.is_empty() {
            return Err(ValidationErrors { failures });
        }

        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            timestamp,
        })
    }
}

impl Default for MessageValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_MESSAGE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    const VALID_MESSAGE: &str = "Hello, I would like to work with you.";

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn validate(name: &str, email: &str, message: &str) -> Result<ContactMessage, ValidationErrors> {
        MessageValidator::default().validate_at(name, email, message, fixed_time())
    }

    // ==================== Acceptance Tests ====================

    #[test]
    fn test_valid_message() {
        let contact = validate("John Doe", "john@example.com", VALID_MESSAGE).expect("Should be valid");

        assert_eq!(contact.name(), "John Doe");
        assert_eq!(contact.email(), "john@example.com");
        assert_eq!(contact.message(), VALID_MESSAGE);
        assert_eq!(contact.timestamp(), fixed_time());
    }

    #[test]
    fn test_trims_all_fields() {
        let contact = validate("  Ana  ", "  ana@example.com\t", "  A message over ten chars  ")
            .expect("Should be valid");

        assert_eq!(contact.name(), "Ana");
        assert_eq!(contact.email(), "ana@example.com");
        assert_eq!(contact.message(), "A message over ten chars");
    }

    #[test]
    fn test_validate_uses_current_time() {
        let before = Utc::now();
        let contact = MessageValidator::default()
            .validate("Ana", "ana@example.com", VALID_MESSAGE)
            .unwrap();
        let after = Utc::now();

        assert!(contact.timestamp() >= before && contact.timestamp() <= after);
    }

    // ==================== Name Tests ====================

    #[test]
    fn test_empty_name() {
        let errors = validate("", "john@example.com", VALID_MESSAGE).unwrap_err();
        assert_eq!(errors.failures(), &[ValidationFailure::NameRequired]);
    }

    #[test]
    fn test_whitespace_only_name() {
        let errors = validate("   ", "john@example.com", VALID_MESSAGE).unwrap_err();
        assert_eq!(errors.failures(), &[ValidationFailure::NameRequired]);
    }

    // ==================== Email Tests ====================

    #[test]
    fn test_accepts_valid_email_formats() {
        for email in [
            "user@example.com",
            "user.name@example.com",
            "user+tag@example.co.uk",
            "user_name@example-domain.com",
        ] {
            assert!(validate("John", email, VALID_MESSAGE).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_rejects_invalid_email_formats() {
        for email in [
            "",
            "bad",
            "invalid-email",
            "user@.com",
            "user @example.com",
            "user@domain",
            "@example.com",
            "user@",
            "user@@example.com",
            "user@exa mple.com",
        ] {
            let errors = validate("John", email, VALID_MESSAGE).unwrap_err();
            assert_eq!(
                errors.failures(),
                &[ValidationFailure::EmailInvalid],
                "{email:?} should be rejected"
            );
        }
    }

    // ==================== Message Tests ====================

    #[test]
    fn test_empty_message() {
        let errors = validate("John", "john@example.com", "  ").unwrap_err();
        assert_eq!(errors.failures(), &[ValidationFailure::MessageRequired]);
    }

    #[test]
    fn test_message_exactly_minimum_length() {
        assert!(validate("John", "john@example.com", "0123456789").is_ok());
    }

    #[test]
    fn test_message_one_below_minimum_length() {
        let errors = validate("John", "john@example.com", "012345678").unwrap_err();
        assert_eq!(
            errors.failures(),
            &[ValidationFailure::MessageTooShort { min: 10 }]
        );
    }

    #[test]
    fn test_message_length_counts_trimmed_characters() {
        let errors = validate("John", "john@example.com", "   short    ").unwrap_err();
        assert!(errors.contains(&ValidationFailure::MessageTooShort { min: 10 }));
    }

    #[test]
    fn test_message_length_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        assert!(validate("José", "jose@example.com", "ññññññññññ").is_ok());
    }

    #[test]
    fn test_custom_minimum_length() {
        let validator = MessageValidator::new(3);
        assert!(validator.validate_at("Jo", "jo@example.com", "Hey", fixed_time()).is_ok());
        assert_eq!(validator.min_message_length(), 3);
    }

    // ==================== Aggregation Tests ====================

    #[test]
    fn test_collects_all_failures() {
        let errors = validate("", "bad", "short").unwrap_err();

        assert_eq!(
            errors.failures(),
            &[
                ValidationFailure::NameRequired,
                ValidationFailure::EmailInvalid,
                ValidationFailure::MessageTooShort { min: 10 },
            ]
        );
        assert_eq!(errors.first(), &ValidationFailure::NameRequired);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_all_empty_fields() {
        let errors = validate("", "", "").unwrap_err();
        assert_eq!(
            errors.failures(),
            &[
                ValidationFailure::NameRequired,
                ValidationFailure::EmailInvalid,
                ValidationFailure::MessageRequired,
            ]
        );
    }

    // ==================== Failure Metadata Tests ====================

    #[test]
    fn test_failure_messages() {
        assert_eq!(ValidationFailure::NameRequired.to_string(), "Name is required");
        assert_eq!(ValidationFailure::EmailInvalid.to_string(), "Valid email is required");
        assert_eq!(ValidationFailure::MessageRequired.to_string(), "Message is required");
        assert_eq!(
            ValidationFailure::MessageTooShort { min: 10 }.to_string(),
            "Message must be at least 10 characters"
        );
    }

    #[test]
    fn test_failure_fields_and_codes() {
        assert_eq!(ValidationFailure::NameRequired.field(), Field::Name);
        assert_eq!(ValidationFailure::EmailInvalid.field(), Field::Email);
        assert_eq!(ValidationFailure::MessageRequired.field(), Field::Message);
        assert_eq!(ValidationFailure::MessageTooShort { min: 10 }.code(), "message_too_short");
    }

    #[test]
    fn test_errors_display_joins_messages() {
        let errors = validate("", "john@example.com", "").unwrap_err();
        assert_eq!(errors.to_string(), "Name is required; Message is required");
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_contact_message_serializes_rfc3339_timestamp() {
        let contact = validate("John", "john@example.com", VALID_MESSAGE).unwrap();
        let json = serde_json::to_value(&contact).unwrap();

        assert_eq!(json["name"], "John");
        assert_eq!(json["email"], "john@example.com");
        assert_eq!(json["timestamp"], "2026-03-14T09:30:00Z");
    }

    #[test]
    fn test_field_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Field::Email).unwrap(), "\"email\"");
    }

    // ==================== Property Tests ====================

    fn field_rank(field: Field) -> usize {
        match field {
            Field::Name => 0,
            Field::Email => 1,
            Field::Message => 2,
        }
    }

    fn any_email() -> impl Strategy<Value = String> {
        prop_oneof![any::<String>(), "[a-z0-9.]{1,10}@[a-z0-9]{1,10}\\.[a-z]{2,4}"]
    }

    fn any_message() -> impl Strategy<Value = String> {
        prop_oneof![any::<String>(), "\\PC{0,40}"]
    }

    fn padding() -> impl Strategy<Value = String> {
        "[ \t\r\n]{0,4}"
    }

    proptest! {
        #[test]
        fn prop_validate_is_total(
            name in any::<String>(),
            email in any_email(),
            message in any_message(),
        ) {
            match validate(&name, &email, &message) {
                Ok(contact) => {
                    prop_assert_eq!(contact.name(), name.trim());
                    prop_assert_eq!(contact.email(), email.trim());
                    prop_assert_eq!(contact.message(), message.trim());
                    prop_assert!(!contact.name().is_empty());
                    prop_assert!(email_regex().is_match(contact.email()));
                    prop_assert!(contact.message().chars().count() >= DEFAULT_MIN_MESSAGE_LENGTH);
                    prop_assert_eq!(contact.timestamp(), fixed_time());
                }
                Err(errors) => {
                    prop_assert!(errors.len() >= 1);

                    let ranks: Vec<usize> =
                        errors.failures().iter().map(|f| field_rank(f.field())).collect();
                    prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]), "out of order: {:?}", ranks);

                    prop_assert_eq!(
                        errors.contains(&ValidationFailure::NameRequired),
                        name.trim().is_empty()
                    );
                    prop_assert_eq!(
                        errors.contains(&ValidationFailure::EmailInvalid),
                        !email_regex().is_match(email.trim())
                    );
                }
            }
        }

        #[test]
        fn prop_padding_does_not_change_result(
            name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
            email in "[a-z0-9]{1,10}@[a-z0-9]{1,10}\\.[a-z]{2,4}",
            message in "[A-Za-z][A-Za-z ,.]{8,60}[A-Za-z.]",
            pads in prop::collection::vec(padding(), 6),
        ) {
            let contact = validate(
                &format!("{}{}{}", pads[0], name, pads[1]),
                &format!("{}{}{}", pads[2], email, pads[3]),
                &format!("{}{}{}", pads[4], message, pads[5]),
            );

            prop_assert!(contact.is_ok(), "padded input rejected: {:?}", contact);
            let contact = contact.unwrap();
            prop_assert_eq!(contact.name(), name.as_str());
            prop_assert_eq!(contact.email(), email.as_str());
            prop_assert_eq!(contact.message(), message.as_str());
        }
    }
}
