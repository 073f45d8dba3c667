//! Step controller for the tenant settings page
//!
//! Gates progression through the ordered settings steps and coordinates
//! persistence: general data is cached locally on submit and only reaches
//! the backend as part of a combined save triggered from the branding step.
//! The controller owns the draft cache policy (write-on-submit,
//! read-on-recovery, no automatic expiry); the injected store only persists
//! strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, TenantConfigDocument};
use crate::drafts::{DraftStore, GENERAL_DRAFT_KEY, LAST_SAVED_KEY};
use crate::settings::types::{
    compose_document, BrandingFormData, GeneralFormData, SecurityFormData,
};
use crate::settings::validate::{self, ValidationErrors};

/// Ordered steps of the settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsStep {
    General,
    Branding,
    Security,
}

impl SettingsStep {
    pub fn all() -> [SettingsStep; 3] {
        [
            SettingsStep::General,
            SettingsStep::Branding,
            SettingsStep::Security,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            SettingsStep::General => "General",
            SettingsStep::Branding => "Branding",
            SettingsStep::Security => "Security",
        }
    }
}

/// Outcome of a user tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSelection {
    /// The active step changed
    Switched,
    /// The requested step was already active
    AlreadyActive,
    /// General must be submitted first; the caller should trigger the
    /// general form's submit and the controller will advance on success
    SubmitGeneralFirst,
}

/// Why a branding save could not produce a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveBlocked {
    /// No general data in memory and no recovery record to rebuild it from
    MissingGeneralData,
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient, dismissible message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Record of the last successful combined save, kept for operator
/// debugging; the application never reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastSavedRecord {
    pub saved_at: DateTime<Utc>,
    pub document: TenantConfigDocument,
}

/// Step controller owning the in-memory draft for one settings page view
pub struct SettingsController<S: DraftStore> {
    store: S,
    step: SettingsStep,
    general_data: Option<GeneralFormData>,
    branding_data: Option<BrandingFormData>,
    security_data: Option<SecurityFormData>,
    is_general_complete: bool,
    is_edit_mode: bool,
    save_in_flight: bool,
    notices: Vec<Notice>,
}

impl<S: DraftStore> SettingsController<S> {
    /// Create a controller for a fresh page view; call one of the hydrate
    /// methods before accepting input.
    pub fn new(store: S) -> Self {
        Self {
            store,
            step: SettingsStep::General,
            general_data: None,
            branding_data: None,
            security_data: None,
            is_general_complete: false,
            is_edit_mode: false,
            save_in_flight: false,
            notices: Vec::new(),
        }
    }

    pub fn active_step(&self) -> SettingsStep {
        self.step
    }

    pub fn is_general_complete(&self) -> bool {
        self.is_general_complete
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn is_save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    pub fn general_data(&self) -> Option<&GeneralFormData> {
        self.general_data.as_ref()
    }

    pub fn branding_data(&self) -> Option<&BrandingFormData> {
        self.branding_data.as_ref()
    }

    pub fn security_data(&self) -> Option<&SecurityFormData> {
        self.security_data.as_ref()
    }

    pub fn enter_edit_mode(&mut self) {
        self.is_edit_mode = true;
    }

    // ─── Hydration ──────────────────────────────────────────────────────────

    /// Apply the result of the initial configuration fetch.
    ///
    /// A failed read is downgraded to "no existing configuration": the page
    /// enters edit mode with empty forms and a passive notice, and the fetch
    /// is never retried automatically. The wording distinguishes an absent
    /// document from a transport failure so the operator can tell which one
    /// happened.
    pub fn apply_fetch(&mut self, result: Result<Option<TenantConfigDocument>, ApiError>) {
        match result {
            Ok(Some(doc)) => self.hydrate_document(&doc),
            Ok(None) => self.hydrate_missing(),
            Err(err) => self.hydrate_failed(&err),
        }
    }

    /// Fill the draft from an existing configuration document
    pub fn hydrate_document(&mut self, doc: &TenantConfigDocument) {
        self.general_data = Some(GeneralFormData::from_document(doc));
        self.branding_data = Some(BrandingFormData::from_document(doc));
        self.is_general_complete = true;
        self.is_edit_mode = false;
        tracing::debug!("hydrated settings from existing configuration");
    }

    /// No document exists yet: start a new configuration in edit mode
    pub fn hydrate_missing(&mut self) {
        self.is_edit_mode = true;
        self.push_notice(Notice::info(
            "No configuration yet. Fill in general settings to get started.",
        ));
    }

    /// The fetch failed: start fresh in edit mode with a passive warning
    pub fn hydrate_failed(&mut self, err: &ApiError) {
        tracing::warn!(error = %err, "configuration fetch failed, starting with empty forms");
        self.is_edit_mode = true;
        self.push_notice(Notice::warning(format!(
            "Could not load existing configuration ({err}). Starting with empty forms."
        )));
    }

    // ─── Step navigation ────────────────────────────────────────────────────

    /// Handle an explicit user tab selection.
    ///
    /// Branding and Security are gated on a completed general step;
    /// selecting them early asks the caller to submit the general form
    /// instead, and the active step does not change until that submission
    /// succeeds.
    pub fn select_step(&mut self, step: SettingsStep) -> StepSelection {
        if step == self.step {
            return StepSelection::AlreadyActive;
        }
        match step {
            SettingsStep::General => {
                self.step = SettingsStep::General;
                StepSelection::Switched
            }
            SettingsStep::Branding | SettingsStep::Security => {
                if self.is_general_complete {
                    self.step = step;
                    StepSelection::Switched
                } else {
                    StepSelection::SubmitGeneralFirst
                }
            }
        }
    }

    // ─── Submissions ────────────────────────────────────────────────────────

    /// Accept a validated general payload: cache it, mark the step complete
    /// and advance to branding. No network call happens here; general data
    /// is persisted only as part of a combined save.
    pub fn submit_general(&mut self, data: GeneralFormData) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate::require(&mut errors, "company_name", &data.company_name);
        validate::require(&mut errors, "contact_email", &data.contact_email);
        if !errors.is_empty() {
            return Err(errors);
        }

        self.write_recovery_record(&data);
        self.general_data = Some(data.clone());
        self.is_general_complete = true;
        self.step = SettingsStep::Branding;
        tracing::debug!("general settings submitted, advancing to branding");
        Ok(())
    }

    /// Compose the combined save payload for a branding submission.
    ///
    /// Requires general data; if in-memory state was lost, it is rebuilt
    /// from the recovery record. With neither, no payload is produced (so
    /// no network call can happen), the user is warned and sent back to the
    /// general step.
    pub fn prepare_branding_save(
        &mut self,
        data: BrandingFormData,
    ) -> Result<TenantConfigDocument, SaveBlocked> {
        if self.general_data.is_none() {
            if let Some(recovered) = self.read_recovery_record() {
                tracing::info!("recovered general settings from draft cache");
                self.push_notice(Notice::info(
                    "Recovered unsaved general settings from the draft cache.",
                ));
                self.general_data = Some(recovered);
                self.is_general_complete = true;
            }
        }

        let Some(general) = self.general_data.clone() else {
            self.push_notice(Notice::warning(
                "General settings are missing. Complete the general step before saving branding.",
            ));
            self.step = SettingsStep::General;
            return Err(SaveBlocked::MissingGeneralData);
        };

        self.branding_data = Some(data.clone());
        Ok(compose_document(&general, &data))
    }

    /// Accept a validated security payload. The configuration document has
    /// no security section, so this stays local to the session.
    pub fn submit_security(&mut self, data: SecurityFormData) {
        self.security_data = Some(data);
        self.push_notice(Notice::success("Security settings applied for this session."));
    }

    // ─── Combined save lifecycle ────────────────────────────────────────────

    /// Claim the save gate. At most one write is in flight per page view; a
    /// second submission is rejected, not queued.
    pub fn begin_save(&mut self) -> bool {
        if self.save_in_flight {
            self.push_notice(Notice::warning("A save is already in progress."));
            return false;
        }
        self.save_in_flight = true;
        true
    }

    /// Apply the outcome of the combined write.
    ///
    /// Failure preserves the whole draft and keeps edit mode on so the user
    /// can retry without re-entering anything.
    pub fn finish_save(&mut self, result: Result<(), ApiError>, doc: &TenantConfigDocument) {
        self.save_in_flight = false;
        match result {
            Ok(()) => {
                self.record_last_saved(doc);
                self.is_edit_mode = false;
                self.push_notice(Notice::success("Configuration saved."));
                tracing::info!("combined configuration save succeeded");
            }
            Err(err) => {
                tracing::warn!(error = %err, "combined configuration save failed");
                self.push_notice(Notice::error(format!(
                    "Save failed: {err}. Your changes are kept; try again."
                )));
            }
        }
    }

    // ─── Notices ────────────────────────────────────────────────────────────

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Take all pending notices for display
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Draft cache ────────────────────────────────────────────────────────

    /// Best-effort backup of the submitted general payload. A cache write
    /// failure is surfaced but does not block the step from advancing.
    fn write_recovery_record(&mut self, data: &GeneralFormData) {
        let json = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize recovery record");
                return;
            }
        };
        if let Err(err) = self.store.put(GENERAL_DRAFT_KEY, &json) {
            tracing::warn!(error = %err, "failed to write recovery record");
            self.push_notice(Notice::warning(
                "Could not back up general settings to the draft cache.",
            ));
        }
    }

    /// Read back the recovery record, tolerating a missing or corrupt one
    fn read_recovery_record(&self) -> Option<GeneralFormData> {
        let json = match self.store.get(GENERAL_DRAFT_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read recovery record");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(error = %err, "recovery record is corrupt, ignoring it");
                None
            }
        }
    }

    fn record_last_saved(&mut self, doc: &TenantConfigDocument) {
        let record = LastSavedRecord {
            saved_at: Utc::now(),
            document: doc.clone(),
        };
        match serde_json::to_string(&record) {
            Ok(json) => {
                if let Err(err) = self.store.put(LAST_SAVED_KEY, &json) {
                    tracing::warn!(error = %err, "failed to record last saved configuration");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize last saved configuration");
            }
        }
    }
}
