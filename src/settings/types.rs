//! Form payload types for the tenant settings page

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::{TenantConfigDocument, DEFAULT_THEME_MODE};

/// Theme mode offered by the branding step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }
}

/// Payload produced by the general settings form.
///
/// Serialized as-is into the recovery record, so field order and names are
/// part of the cached format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralFormData {
    pub company_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub currency: String,
}

/// Payload produced by the branding settings form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingFormData {
    pub theme_mode: ThemeMode,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub font_family: String,
    /// Logo file references; previews are rendered locally and never sent
    #[serde(default)]
    pub light_logo: Option<PathBuf>,
    #[serde(default)]
    pub dark_logo: Option<PathBuf>,
    #[serde(default)]
    pub favicon: Option<PathBuf>,
}

/// Payload produced by the security settings form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityFormData {
    pub secret_key: String,
    #[serde(default)]
    pub session_timeout_minutes: u32,
    #[serde(default)]
    pub enforce_two_factor: bool,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn path_str(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

/// Compose the combined save payload from general and branding data.
///
/// Client-side defaults are applied before the document is handed to the
/// network layer.
pub fn compose_document(
    general: &GeneralFormData,
    branding: &BrandingFormData,
) -> TenantConfigDocument {
    let mut doc = TenantConfigDocument::default();

    doc.company_info.company_name = non_empty(&general.company_name);
    doc.company_info.contact_email = non_empty(&general.contact_email);
    doc.company_info.contact_phone = non_empty(&general.contact_phone);
    doc.company_info.website_url = non_empty(&general.website_url);
    doc.company_info.address = non_empty(&general.address);

    doc.branding_config.default_theme_mode = Some(branding.theme_mode.as_str().to_string());
    doc.branding_config.primary_brand_color = non_empty(&branding.primary_color);
    doc.branding_config.secondary_brand_color = non_empty(&branding.secondary_color);
    doc.branding_config.font_family = non_empty(&branding.font_family);
    doc.branding_config.light_logo = path_str(&branding.light_logo);
    doc.branding_config.dark_logo = path_str(&branding.dark_logo);
    doc.branding_config.favicon = path_str(&branding.favicon);

    doc.localization_config.locale = non_empty(&general.locale);
    doc.localization_config.timezone = non_empty(&general.timezone);
    doc.localization_config.currency = non_empty(&general.currency);

    doc.with_defaults()
}

impl GeneralFormData {
    /// Rebuild general form data from a fetched configuration document
    pub fn from_document(doc: &TenantConfigDocument) -> Self {
        Self {
            company_name: doc.company_info.company_name.clone().unwrap_or_default(),
            contact_email: doc.company_info.contact_email.clone().unwrap_or_default(),
            contact_phone: doc.company_info.contact_phone.clone().unwrap_or_default(),
            website_url: doc.company_info.website_url.clone().unwrap_or_default(),
            address: doc.company_info.address.clone().unwrap_or_default(),
            locale: doc.localization_config.locale.clone().unwrap_or_default(),
            timezone: doc.localization_config.timezone.clone().unwrap_or_default(),
            currency: doc.localization_config.currency.clone().unwrap_or_default(),
        }
    }
}

impl BrandingFormData {
    /// Rebuild branding form data from a fetched configuration document
    pub fn from_document(doc: &TenantConfigDocument) -> Self {
        Self {
            theme_mode: ThemeMode::parse(
                doc.branding_config
                    .default_theme_mode
                    .as_deref()
                    .unwrap_or(DEFAULT_THEME_MODE),
            ),
            primary_color: doc
                .branding_config
                .primary_brand_color
                .clone()
                .unwrap_or_default(),
            secondary_color: doc
                .branding_config
                .secondary_brand_color
                .clone()
                .unwrap_or_default(),
            font_family: doc.branding_config.font_family.clone().unwrap_or_default(),
            light_logo: doc.branding_config.light_logo.as_deref().map(PathBuf::from),
            dark_logo: doc.branding_config.dark_logo.as_deref().map(PathBuf::from),
            favicon: doc.branding_config.favicon.as_deref().map(PathBuf::from),
        }
    }
}
