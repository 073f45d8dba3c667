//! tenantctl - terminal admin console for multi-tenant platform settings
//!
//! The library surface exists for the binary and for integration tests;
//! the settings workflow (step controller, forms, draft recovery) is the
//! part worth reusing.

pub mod api;
pub mod app;
pub mod config;
pub mod drafts;
pub mod logging;
pub mod settings;
pub mod ui;
