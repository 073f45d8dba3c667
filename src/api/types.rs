//! Wire types for the tenant configuration document
//!
//! The backend owns the exact wire format; these types mirror the three
//! nested objects the console reads and writes. Every field is optional on
//! the wire, with client-side defaults applied before send.

use serde::{Deserialize, Serialize};

/// Default theme mode applied when branding never set one
pub const DEFAULT_THEME_MODE: &str = "light";

/// Default primary brand color applied when branding never set one
pub const DEFAULT_PRIMARY_COLOR: &str = "#1976d2";

/// The tenant configuration document as persisted by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantConfigDocument {
    #[serde(default)]
    pub company_info: CompanyInfo,
    #[serde(default)]
    pub branding_config: BrandingConfig,
    #[serde(default)]
    pub localization_config: LocalizationConfig,
}

/// Company and contact fields of the configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Theme, color and logo fields of the configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_theme_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_brand_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_brand_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

/// Locale, timezone and currency fields of the configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl TenantConfigDocument {
    /// Apply client-side defaults for fields the backend expects populated
    pub fn with_defaults(mut self) -> Self {
        if self.branding_config.default_theme_mode.is_none() {
            self.branding_config.default_theme_mode = Some(DEFAULT_THEME_MODE.to_string());
        }
        if self.branding_config.primary_brand_color.is_none() {
            self.branding_config.primary_brand_color = Some(DEFAULT_PRIMARY_COLOR.to_string());
        }
        self
    }
}
