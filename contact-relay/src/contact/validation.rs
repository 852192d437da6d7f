//! Contact form validation.

use regex::Regex;
use serde::Deserialize;

use crate::error::ContactError;

pub const MISSING_FIELDS: &str = "All fields are required";
pub const INVALID_EMAIL: &str = "Invalid email address";
pub const INVALID_BODY: &str = "Invalid request body";

// Each part excludes `@` and whitespace as browsers' `\s` defines it: Unicode
// White_Space plus U+FEFF, minus U+0085.
lazy_static::lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[\x{85}[^\s\x{FEFF}@]]+@[\x{85}[^\s\x{FEFF}@]]+\.[\x{85}[^\s\x{FEFF}@]]+$"
    )
    .unwrap();
}

/// Raw JSON body of `POST /api/contact`.
///
/// Every field is optional here so a missing field is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A contact form that passed validation. Values are kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(self) -> Result<Submission, ContactError> {
        let (name, email, subject, message) =
            match (present(self.name), present(self.email), present(self.subject), present(self.message)) {
                (Some(name), Some(email), Some(subject), Some(message)) => (name, email, subject, message),
                _ => return Err(ContactError::Validation(MISSING_FIELDS)),
            };

        if !is_valid_email(&email) {
            return Err(ContactError::Validation(INVALID_EMAIL));
        }

        Ok(Submission {
            name,
            email,
            subject,
            message,
        })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

/// Permissive syntactic check: `local@domain.tld`, no whitespace, one `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: Some(subject.to_string()),
            message: Some(message.to_string()),
        }
    }

    fn error_of(form: ContactForm) -> &'static str {
        match form.validate() {
            Err(ContactError::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("user+tag@example.co.uk"));
        assert!(is_valid_email("a@b.c"));

        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@x"));
        assert!(!is_valid_email("ann@@x.com"));
        assert!(!is_valid_email("ann smith@x.com"));
        assert!(!is_valid_email("ann@x.com "));
    }

    #[test]
    fn test_email_whitespace_classes() {
        assert!(!is_valid_email("ann\u{FEFF}@x.com"));
        assert!(!is_valid_email("ann@x.\u{FEFF}com"));
        assert!(!is_valid_email("ann\u{A0}@x.com"));
        assert!(!is_valid_email("ann@x\u{2028}.com"));
        assert!(is_valid_email("ann\u{85}@x.com"));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(error_of(ContactForm::default()), MISSING_FIELDS);
        assert_eq!(error_of(form("", "ann@x.com", "Hi", "Hello")), MISSING_FIELDS);
        assert_eq!(error_of(form("Ann", "ann@x.com", "   ", "Hello")), MISSING_FIELDS);

        let mut partial = form("Ann", "ann@x.com", "Hi", "Hello");
        partial.message = None;
        assert_eq!(error_of(partial), MISSING_FIELDS);
    }

    #[test]
    fn test_missing_fields_checked_before_email() {
        assert_eq!(error_of(form("Ann", "not-an-email", "Hi", "")), MISSING_FIELDS);
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(error_of(form("Ann", "ann.x.com", "Hi", "Hello")), INVALID_EMAIL);
    }

    #[test]
    fn test_valid_submission_keeps_whitespace() {
        let submission = form("Ann", "ann@x.com", "Hi", "Hello\nWorld\n").validate().unwrap();
        assert_eq!(submission.message, "Hello\nWorld\n");
        assert_eq!(submission.email, "ann@x.com");
    }

    #[test]
    fn test_deserialize_partial_body() {
        let form: ContactForm = serde_json::from_str(r#"{"name":"Ann","email":null}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("Ann"));
        assert!(form.email.is_none());
        assert!(form.subject.is_none());
    }
}
