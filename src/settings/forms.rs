//! The three settings form views: General, Branding, Security
//!
//! Each form is self-contained: it owns its field widgets, performs its own
//! field-level validation, and exposes `try_submit` as an imperative
//! trigger-submission capability for the step controller. A form never
//! produces a payload until every validation passes, and a failure on one
//! field leaves all other fields' values untouched.

use crossterm::event::KeyCode;
use std::path::PathBuf;

use crate::settings::preview;
use crate::settings::types::{BrandingFormData, GeneralFormData, SecurityFormData, ThemeMode};
use crate::settings::validate::{self, ValidationErrors, MIN_SECRET_KEY_LEN};
use crate::ui::form_field::FormField;

/// One named, labeled field within a form
pub struct FormEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub field: FormField,
}

/// Ordered field collection with focus tracking and inline errors
pub struct FieldSet {
    pub entries: Vec<FormEntry>,
    pub focused: usize,
    pub errors: ValidationErrors,
}

impl FieldSet {
    fn new(entries: Vec<FormEntry>) -> Self {
        Self {
            entries,
            focused: 0,
            errors: ValidationErrors::new(),
        }
    }

    pub fn value_of(&self, name: &str) -> String {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.field.value())
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.field.set_value(value);
        }
    }

    /// Boolean state of a toggle field; false for anything else
    pub fn bool_of(&self, name: &str) -> bool {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .is_some_and(|e| e.field.bool_value())
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut FormEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    pub fn focused_entry_mut(&mut self) -> Option<&mut FormEntry> {
        self.entries.get_mut(self.focused)
    }

    pub fn next_field(&mut self) {
        if self.focused < self.entries.len().saturating_sub(1) {
            self.focused += 1;
        }
    }

    pub fn prev_field(&mut self) {
        if self.focused > 0 {
            self.focused -= 1;
        }
    }

    /// Route a key to the focused field, returns true if consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.focused_entry_mut() {
            Some(entry) => entry.field.handle_key(key),
            None => false,
        }
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

// ─── General ────────────────────────────────────────────────────────────────

/// Company, contact and localization inputs
pub struct GeneralForm {
    pub fields: FieldSet,
}

impl Default for GeneralForm {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneralForm {
    pub fn new() -> Self {
        let entries = vec![
            FormEntry {
                name: "company_name",
                label: "Company name",
                field: FormField::text("Acme Inc."),
            },
            FormEntry {
                name: "contact_email",
                label: "Contact email",
                field: FormField::text("billing@acme.com"),
            },
            FormEntry {
                name: "contact_phone",
                label: "Contact phone",
                field: FormField::text("+1 555 0100"),
            },
            FormEntry {
                name: "website_url",
                label: "Website URL",
                field: FormField::text("https://acme.com"),
            },
            FormEntry {
                name: "address",
                label: "Address",
                field: FormField::multiline("Street, city, country"),
            },
            FormEntry {
                name: "locale",
                label: "Locale",
                field: FormField::select(&["en-US", "en-GB", "de-DE", "fr-FR", "es-ES"]),
            },
            FormEntry {
                name: "timezone",
                label: "Timezone",
                field: FormField::text("America/New_York"),
            },
            FormEntry {
                name: "currency",
                label: "Currency",
                field: FormField::select(&["USD", "EUR", "GBP", "CAD"]),
            },
        ];
        Self {
            fields: FieldSet::new(entries),
        }
    }

    /// Populate the form from hydrated or recovered data
    pub fn set_data(&mut self, data: &GeneralFormData) {
        self.fields.set_value("company_name", &data.company_name);
        self.fields.set_value("contact_email", &data.contact_email);
        self.fields.set_value("contact_phone", &data.contact_phone);
        self.fields.set_value("website_url", &data.website_url);
        self.fields.set_value("address", &data.address);
        self.fields.set_value("locale", &data.locale);
        self.fields.set_value("timezone", &data.timezone);
        self.fields.set_value("currency", &data.currency);
    }

    /// Validate and produce the payload, or record inline errors
    pub fn try_submit(&mut self) -> Result<GeneralFormData, ValidationErrors> {
        let data = GeneralFormData {
            company_name: self.fields.value_of("company_name"),
            contact_email: self.fields.value_of("contact_email"),
            contact_phone: self.fields.value_of("contact_phone"),
            website_url: self.fields.value_of("website_url"),
            address: self.fields.value_of("address"),
            locale: self.fields.value_of("locale"),
            timezone: self.fields.value_of("timezone"),
            currency: self.fields.value_of("currency"),
        };

        let mut errors = ValidationErrors::new();
        validate::require(&mut errors, "company_name", &data.company_name);
        validate::require(&mut errors, "contact_email", &data.contact_email);
        validate::email(&mut errors, "contact_email", &data.contact_email);
        validate::url(&mut errors, "website_url", &data.website_url);

        self.fields.errors = errors.clone();
        if errors.is_empty() {
            Ok(data)
        } else {
            Err(errors)
        }
    }
}

// ─── Branding ───────────────────────────────────────────────────────────────

/// Theme, color, font and logo inputs
pub struct BrandingForm {
    pub fields: FieldSet,
}

impl Default for BrandingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BrandingForm {
    pub fn new() -> Self {
        let entries = vec![
            FormEntry {
                name: "theme_mode",
                label: "Default theme",
                field: FormField::select(&["light", "dark"]),
            },
            FormEntry {
                name: "primary_color",
                label: "Primary color",
                field: FormField::text_with_max("#1976d2", 7),
            },
            FormEntry {
                name: "secondary_color",
                label: "Secondary color",
                field: FormField::text_with_max("#424242", 7),
            },
            FormEntry {
                name: "font_family",
                label: "Font family",
                field: FormField::text("Inter"),
            },
            FormEntry {
                name: "light_logo",
                label: "Light logo",
                field: FormField::path("/path/to/logo-light.png"),
            },
            FormEntry {
                name: "dark_logo",
                label: "Dark logo",
                field: FormField::path("/path/to/logo-dark.png"),
            },
            FormEntry {
                name: "favicon",
                label: "Favicon",
                field: FormField::path("/path/to/favicon.ico"),
            },
        ];
        Self {
            fields: FieldSet::new(entries),
        }
    }

    /// Populate the form from hydrated data
    pub fn set_data(&mut self, data: &BrandingFormData) {
        self.fields.set_value("theme_mode", data.theme_mode.as_str());
        self.fields.set_value("primary_color", &data.primary_color);
        self.fields.set_value("secondary_color", &data.secondary_color);
        self.fields.set_value("font_family", &data.font_family);
        for (name, path) in [
            ("light_logo", &data.light_logo),
            ("dark_logo", &data.dark_logo),
            ("favicon", &data.favicon),
        ] {
            if let Some(p) = path {
                self.fields.set_value(name, &p.to_string_lossy());
            }
        }
        self.refresh_previews();
    }

    /// Re-decode previews for every logo field that names an existing file.
    ///
    /// Decoding happens locally from the file header; the preview is
    /// display-only and never part of the submitted payload.
    pub fn refresh_previews(&mut self) {
        for name in ["light_logo", "dark_logo", "favicon"] {
            let value = self.fields.value_of(name);
            let decoded = optional_path(&value).and_then(|p| preview::sniff(&p).ok());
            if let Some(entry) = self.fields.entry_mut(name) {
                entry.field.set_preview(decoded);
            }
        }
    }

    /// Validate and produce the payload, or record inline errors
    pub fn try_submit(&mut self) -> Result<BrandingFormData, ValidationErrors> {
        self.refresh_previews();

        let mut errors = ValidationErrors::new();
        validate::hex_color(&mut errors, "primary_color", &self.fields.value_of("primary_color"));
        validate::hex_color(
            &mut errors,
            "secondary_color",
            &self.fields.value_of("secondary_color"),
        );

        let mut paths: [Option<PathBuf>; 3] = [None, None, None];
        for (slot, name) in ["light_logo", "dark_logo", "favicon"].iter().enumerate() {
            let value = self.fields.value_of(name);
            if let Some(path) = optional_path(&value) {
                match preview::sniff(&path) {
                    Ok(_) => paths[slot] = Some(path),
                    Err(e) => errors.add(name, format!("Not a usable image: {e}")),
                }
            }
        }

        self.fields.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        let [light_logo, dark_logo, favicon] = paths;
        Ok(BrandingFormData {
            theme_mode: ThemeMode::parse(&self.fields.value_of("theme_mode")),
            primary_color: self.fields.value_of("primary_color"),
            secondary_color: self.fields.value_of("secondary_color"),
            font_family: self.fields.value_of("font_family"),
            light_logo,
            dark_logo,
            favicon,
        })
    }
}

// ─── Security ───────────────────────────────────────────────────────────────

/// Secret key and session policy inputs
pub struct SecurityForm {
    pub fields: FieldSet,
}

impl Default for SecurityForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityForm {
    pub fn new() -> Self {
        let entries = vec![
            FormEntry {
                name: "secret_key",
                label: "Secret key",
                field: FormField::text("At least 6 characters"),
            },
            FormEntry {
                name: "session_timeout_minutes",
                label: "Session timeout (minutes)",
                field: FormField::text("30"),
            },
            FormEntry {
                name: "enforce_two_factor",
                label: "Require two-factor",
                field: FormField::toggle("Required", "Optional"),
            },
        ];
        Self {
            fields: FieldSet::new(entries),
        }
    }

    pub fn set_data(&mut self, data: &SecurityFormData) {
        self.fields.set_value("secret_key", &data.secret_key);
        self.fields.set_value(
            "session_timeout_minutes",
            &data.session_timeout_minutes.to_string(),
        );
        self.fields.set_value(
            "enforce_two_factor",
            if data.enforce_two_factor { "true" } else { "false" },
        );
    }

    /// Validate and produce the payload, or record inline errors
    pub fn try_submit(&mut self) -> Result<SecurityFormData, ValidationErrors> {
        let secret_key = self.fields.value_of("secret_key");
        let timeout_raw = self.fields.value_of("session_timeout_minutes");

        let mut errors = ValidationErrors::new();
        validate::require(&mut errors, "secret_key", &secret_key);
        validate::min_len(&mut errors, "secret_key", &secret_key, MIN_SECRET_KEY_LEN);

        let session_timeout_minutes = if timeout_raw.trim().is_empty() {
            0
        } else {
            match timeout_raw.trim().parse::<u32>() {
                Ok(v) => v,
                Err(_) => {
                    errors.add("session_timeout_minutes", "Must be a whole number");
                    0
                }
            }
        };

        self.fields.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SecurityFormData {
            secret_key,
            session_timeout_minutes,
            enforce_two_factor: self.fields.bool_of("enforce_two_factor"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_general(form: &mut GeneralForm) {
        form.fields.set_value("company_name", "Acme");
        form.fields.set_value("contact_email", "a@acme.com");
    }

    #[test]
    fn test_general_requires_company_and_email() {
        let mut form = GeneralForm::new();
        let errors = form.try_submit().unwrap_err();
        assert!(errors.for_field("company_name").is_some());
        assert!(errors.for_field("contact_email").is_some());
        // Inline errors are retained on the form for rendering
        assert!(!form.fields.errors.is_empty());
    }

    #[test]
    fn test_general_submit_with_valid_data() {
        let mut form = GeneralForm::new();
        fill_general(&mut form);
        form.fields.set_value("website_url", "https://acme.com");

        let data = form.try_submit().unwrap();
        assert_eq!(data.company_name, "Acme");
        assert_eq!(data.contact_email, "a@acme.com");
        assert!(form.fields.errors.is_empty());
    }

    #[test]
    fn test_general_rejects_bad_url_but_keeps_other_values() {
        let mut form = GeneralForm::new();
        fill_general(&mut form);
        form.fields.set_value("website_url", "acme.com");

        let errors = form.try_submit().unwrap_err();
        assert!(errors.for_field("website_url").is_some());
        // Other fields keep their values
        assert_eq!(form.fields.value_of("company_name"), "Acme");
        assert_eq!(form.fields.value_of("contact_email"), "a@acme.com");
    }

    #[test]
    fn test_general_round_trips_data() {
        let data = GeneralFormData {
            company_name: "Acme".to_string(),
            contact_email: "a@acme.com".to_string(),
            contact_phone: "+1 555 0100".to_string(),
            website_url: "https://acme.com".to_string(),
            address: "1 Main St".to_string(),
            locale: "de-DE".to_string(),
            timezone: "Europe/Berlin".to_string(),
            currency: "EUR".to_string(),
        };

        let mut form = GeneralForm::new();
        form.set_data(&data);
        assert_eq!(form.try_submit().unwrap(), data);
    }

    #[test]
    fn test_branding_rejects_malformed_color() {
        let mut form = BrandingForm::new();
        form.fields.set_value("primary_color", "blue");
        let errors = form.try_submit().unwrap_err();
        assert!(errors.for_field("primary_color").is_some());
    }

    #[test]
    fn test_branding_submit_defaults() {
        let mut form = BrandingForm::new();
        let data = form.try_submit().unwrap();
        assert_eq!(data.theme_mode, ThemeMode::Light);
        assert_eq!(data.light_logo, None);
    }

    #[test]
    fn test_branding_rejects_missing_logo_file() {
        let mut form = BrandingForm::new();
        form.fields
            .set_value("light_logo", "/nonexistent/logo.png");
        let errors = form.try_submit().unwrap_err();
        assert!(errors.for_field("light_logo").is_some());
    }

    #[test]
    fn test_branding_logo_preview_is_local_only() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Minimal PNG header, 32x32
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&32u32.to_be_bytes());
        bytes.extend_from_slice(&32u32.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        file.write_all(&bytes).unwrap();

        let mut form = BrandingForm::new();
        form.fields
            .set_value("light_logo", &file.path().to_string_lossy());

        let data = form.try_submit().unwrap();
        // Payload carries the file reference, preview stays on the widget
        assert_eq!(data.light_logo.as_deref(), Some(file.path()));
        let entry = form.fields.entry_mut("light_logo").unwrap();
        let preview = entry.field.preview().unwrap();
        assert_eq!((preview.width, preview.height), (32, 32));
    }

    #[test]
    fn test_security_rejects_short_secret_key() {
        let mut form = SecurityForm::new();
        form.fields.set_value("secret_key", "abc12");

        let errors = form.try_submit().unwrap_err();
        assert_eq!(
            errors.for_field("secret_key"),
            Some("Must be at least 6 characters")
        );
    }

    #[test]
    fn test_security_accepts_six_char_secret() {
        let mut form = SecurityForm::new();
        form.fields.set_value("secret_key", "abc123");
        form.fields.set_value("session_timeout_minutes", "45");

        let data = form.try_submit().unwrap();
        assert_eq!(data.secret_key, "abc123");
        assert_eq!(data.session_timeout_minutes, 45);
    }

    #[test]
    fn test_security_toggle_flows_into_payload() {
        let mut form = SecurityForm::new();
        form.fields.set_value("secret_key", "abc123");
        assert!(!form.try_submit().unwrap().enforce_two_factor);

        if let Some(entry) = form.fields.entry_mut("enforce_two_factor") {
            entry.field.handle_key(KeyCode::Char(' '));
        }
        assert!(form.try_submit().unwrap().enforce_two_factor);
    }

    #[test]
    fn test_security_rejects_non_numeric_timeout() {
        let mut form = SecurityForm::new();
        form.fields.set_value("secret_key", "abc123");
        form.fields.set_value("session_timeout_minutes", "soon");

        let errors = form.try_submit().unwrap_err();
        assert!(errors.for_field("session_timeout_minutes").is_some());
    }
}
