//! Client for the remote configuration service

pub mod config_service;
pub mod error;
pub mod types;

pub use config_service::{ConfigurationService, HttpConfigService};
pub use error::ApiError;
pub use types::{
    BrandingConfig, CompanyInfo, LocalizationConfig, TenantConfigDocument, DEFAULT_PRIMARY_COLOR,
    DEFAULT_THEME_MODE,
};
