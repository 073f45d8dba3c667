//! Field-level validation shared by the settings forms
//!
//! Validation failures stay local to the form that produced them; nothing
//! here ever reaches the network layer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum length for secret-key style fields
pub const MIN_SECRET_KEY_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color regex"));

/// Validation failures keyed by field name.
///
/// Errors accumulate per field; a failure on one field never clears
/// another field's value or error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push((field.to_string(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First error message for a field, for inline rendering next to it
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

/// Require a non-blank value
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required");
    }
}

/// Require a plausible email address (only when non-empty)
pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !EMAIL_RE.is_match(value) {
        errors.add(field, "Enter a valid email address");
    }
}

/// Require an http(s) URL (only when non-empty)
pub fn url(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !value.starts_with("http://") && !value.starts_with("https://") {
        errors.add(field, "URL must start with http:// or https://");
    }
}

/// Require a #rrggbb hex color (only when non-empty)
pub fn hex_color(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !HEX_COLOR_RE.is_match(value) {
        errors.add(field, "Color must be in #rrggbb format");
    }
}

/// Require a minimum length after trimming
pub fn min_len(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.trim().len() < min {
        errors.add(field, format!("Must be at least {min} characters"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "company_name", "   ");
        assert_eq!(
            errors.for_field("company_name"),
            Some("This field is required")
        );
    }

    #[test]
    fn test_email_shape() {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "contact_email", "a@acme.com");
        assert!(errors.is_empty());

        email(&mut errors, "contact_email", "not-an-email");
        assert!(errors.for_field("contact_email").is_some());
    }

    #[test]
    fn test_email_skips_empty_values() {
        // Required-ness is a separate check
        let mut errors = ValidationErrors::new();
        email(&mut errors, "contact_email", "");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_url_prefix() {
        let mut errors = ValidationErrors::new();
        url(&mut errors, "website_url", "https://acme.com");
        url(&mut errors, "website_url", "http://acme.com");
        assert!(errors.is_empty());

        url(&mut errors, "website_url", "acme.com");
        assert!(errors.for_field("website_url").is_some());
    }

    #[test]
    fn test_hex_color_shape() {
        let mut errors = ValidationErrors::new();
        hex_color(&mut errors, "primary_color", "#112233");
        hex_color(&mut errors, "primary_color", "#AABBCC");
        assert!(errors.is_empty());

        hex_color(&mut errors, "primary_color", "112233");
        hex_color(&mut errors, "primary_color", "#12");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_min_len_boundary() {
        let mut errors = ValidationErrors::new();
        min_len(&mut errors, "secret_key", "abcdef", MIN_SECRET_KEY_LEN);
        assert!(errors.is_empty());

        min_len(&mut errors, "secret_key", "abcde", MIN_SECRET_KEY_LEN);
        assert_eq!(
            errors.for_field("secret_key"),
            Some("Must be at least 6 characters")
        );
    }

    #[test]
    fn test_iter_yields_errors_in_insertion_order() {
        // The status bar summarizes the first recorded error
        let mut errors = ValidationErrors::new();
        require(&mut errors, "company_name", "");
        require(&mut errors, "contact_email", "");

        let collected: Vec<_> = errors.iter().collect();
        assert_eq!(collected[0].0, "company_name");
        assert_eq!(collected[1].0, "contact_email");
    }

    #[test]
    fn test_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "company_name", "");
        require(&mut errors, "contact_email", "");
        assert_eq!(errors.len(), 2);
        assert!(errors.for_field("company_name").is_some());
        assert!(errors.for_field("contact_email").is_some());
    }
}
