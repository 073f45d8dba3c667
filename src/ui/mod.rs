//! TUI widgets and screens

pub mod form_field;
pub mod settings_screen;

pub use form_field::FormField;
