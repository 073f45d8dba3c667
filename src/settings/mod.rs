//! Tenant settings workflow: forms, validation, step control, recovery

pub mod controller;
pub mod forms;
pub mod preview;
pub mod types;
pub mod validate;

pub use controller::{
    Notice, NoticeLevel, SaveBlocked, SettingsController, SettingsStep, StepSelection,
};
pub use forms::{BrandingForm, FieldSet, FormEntry, GeneralForm, SecurityForm};
pub use types::{
    compose_document, BrandingFormData, GeneralFormData, SecurityFormData, ThemeMode,
};
pub use validate::ValidationErrors;
