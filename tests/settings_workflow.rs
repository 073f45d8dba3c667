//! End-to-end tests for the settings save/recovery workflow:
//! forms → step controller → draft cache → configuration service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tenantctl::api::{ApiError, ConfigurationService, TenantConfigDocument};
use tenantctl::drafts::{DraftStore, MemoryDraftStore, GENERAL_DRAFT_KEY};
use tenantctl::settings::controller::{SaveBlocked, SettingsController, SettingsStep};
use tenantctl::settings::forms::{BrandingForm, GeneralForm, SecurityForm};
use tenantctl::settings::types::{BrandingFormData, GeneralFormData, ThemeMode};

/// Scripted stand-in for the remote configuration service
struct FakeConfigService {
    fetch_result: Mutex<Result<Option<TenantConfigDocument>, ApiError>>,
    save_error: Mutex<Option<ApiError>>,
    saved: Mutex<Vec<(String, TenantConfigDocument)>>,
}

impl FakeConfigService {
    fn empty() -> Self {
        Self {
            fetch_result: Mutex::new(Ok(None)),
            save_error: Mutex::new(None),
            saved: Mutex::new(Vec::new()),
        }
    }

    fn failing_saves(err: ApiError) -> Self {
        let service = Self::empty();
        *service.save_error.lock().unwrap() = Some(err);
        service
    }

    fn saved_documents(&self) -> Vec<(String, TenantConfigDocument)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigurationService for FakeConfigService {
    async fn fetch(&self, _tenant: &str) -> Result<Option<TenantConfigDocument>, ApiError> {
        self.fetch_result.lock().unwrap().clone()
    }

    async fn save(&self, tenant: &str, doc: &TenantConfigDocument) -> Result<(), ApiError> {
        if let Some(err) = self.save_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.saved
            .lock()
            .unwrap()
            .push((tenant.to_string(), doc.clone()));
        Ok(())
    }
}

fn valid_general() -> GeneralFormData {
    GeneralFormData {
        company_name: "Acme".to_string(),
        contact_email: "a@acme.com".to_string(),
        website_url: "https://acme.com".to_string(),
        locale: "en-US".to_string(),
        timezone: "America/New_York".to_string(),
        currency: "USD".to_string(),
        ..Default::default()
    }
}

fn dark_branding() -> BrandingFormData {
    BrandingFormData {
        theme_mode: ThemeMode::Dark,
        primary_color: "#112233".to_string(),
        ..Default::default()
    }
}

fn new_controller(
    store: &Arc<MemoryDraftStore>,
) -> SettingsController<Arc<MemoryDraftStore>> {
    let mut controller = SettingsController::new(Arc::clone(store));
    controller.hydrate_missing();
    controller
}

#[tokio::test]
async fn combined_save_reaches_the_service_with_both_payloads() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::empty();
    let mut controller = new_controller(&store);

    controller.submit_general(valid_general()).unwrap();
    assert_eq!(controller.active_step(), SettingsStep::Branding);
    assert!(controller.is_general_complete());

    let doc = controller.prepare_branding_save(dark_branding()).unwrap();
    assert!(controller.begin_save());
    let result = service.save("acme", &doc).await;
    controller.finish_save(result, &doc);

    let saved = service.saved_documents();
    assert_eq!(saved.len(), 1);
    let (tenant, saved_doc) = &saved[0];
    assert_eq!(tenant, "acme");
    assert_eq!(saved_doc.company_info.company_name.as_deref(), Some("Acme"));
    assert_eq!(
        saved_doc.branding_config.primary_brand_color.as_deref(),
        Some("#112233")
    );
    assert_eq!(
        saved_doc.branding_config.default_theme_mode.as_deref(),
        Some("dark")
    );
    assert!(!controller.is_save_in_flight());
    assert!(!controller.is_edit_mode());
}

#[tokio::test]
async fn recovery_record_survives_a_new_session() {
    let store = Arc::new(MemoryDraftStore::new());

    // First session: general submitted, nothing saved remotely
    let mut first = new_controller(&store);
    first.submit_general(valid_general()).unwrap();
    drop(first);

    // Second session: in-memory draft is gone, record is not
    let service = FakeConfigService::empty();
    let mut second = new_controller(&store);
    assert!(second.general_data().is_none());

    let doc = second.prepare_branding_save(dark_branding()).unwrap();
    assert!(second.begin_save());
    let result = service.save("acme", &doc).await;
    second.finish_save(result, &doc);

    // General-derived fields come from the recovery record exactly
    let saved = service.saved_documents();
    assert_eq!(saved.len(), 1);
    let saved_doc = &saved[0].1;
    assert_eq!(saved_doc.company_info.company_name.as_deref(), Some("Acme"));
    assert_eq!(
        saved_doc.company_info.contact_email.as_deref(),
        Some("a@acme.com")
    );
    assert_eq!(saved_doc.company_info.website_url.as_deref(), Some("https://acme.com"));
    assert_eq!(saved_doc.localization_config.locale.as_deref(), Some("en-US"));
    assert_eq!(saved_doc.localization_config.currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn branding_save_without_general_or_record_never_hits_the_network() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::empty();
    let mut controller = new_controller(&store);
    controller.select_step(SettingsStep::General);

    let blocked = controller.prepare_branding_save(dark_branding());
    assert_eq!(blocked.unwrap_err(), SaveBlocked::MissingGeneralData);
    assert_eq!(controller.active_step(), SettingsStep::General);

    // No document was produced, so nothing could have been sent
    assert!(service.saved_documents().is_empty());
}

#[test]
fn identical_general_submissions_produce_identical_records() {
    let store = Arc::new(MemoryDraftStore::new());
    let mut controller = new_controller(&store);

    controller.submit_general(valid_general()).unwrap();
    let first = store.get(GENERAL_DRAFT_KEY).unwrap().unwrap();

    controller.select_step(SettingsStep::General);
    controller.submit_general(valid_general()).unwrap();
    let second = store.get(GENERAL_DRAFT_KEY).unwrap().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_write_preserves_draft_and_edit_mode() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::failing_saves(ApiError::Http {
        status: 500,
        message: "internal error".to_string(),
    });
    let mut controller = new_controller(&store);

    controller.submit_general(valid_general()).unwrap();
    let doc = controller.prepare_branding_save(dark_branding()).unwrap();

    let general_before = controller.general_data().cloned();
    let branding_before = controller.branding_data().cloned();

    assert!(controller.begin_save());
    let result = service.save("acme", &doc).await;
    controller.finish_save(result, &doc);

    assert!(controller.is_edit_mode());
    assert_eq!(controller.general_data().cloned(), general_before);
    assert_eq!(controller.branding_data().cloned(), branding_before);
    assert!(service.saved_documents().is_empty());

    // The gate is free again, so the user can retry without re-entering data
    assert!(!controller.is_save_in_flight());
    assert!(controller.begin_save());
}

#[tokio::test]
async fn timed_out_write_releases_the_save_gate() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::failing_saves(ApiError::Timeout);
    let mut controller = new_controller(&store);

    controller.submit_general(valid_general()).unwrap();
    let doc = controller.prepare_branding_save(dark_branding()).unwrap();

    assert!(controller.begin_save());
    let result = service.save("acme", &doc).await;
    controller.finish_save(result, &doc);

    assert!(!controller.is_save_in_flight());
    assert!(controller.is_edit_mode());
}

#[tokio::test]
async fn hydration_from_an_existing_document_starts_read_only() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::empty();

    let mut doc = TenantConfigDocument::default();
    doc.company_info.company_name = Some("Acme".to_string());
    doc.branding_config.default_theme_mode = Some("dark".to_string());
    *service.fetch_result.lock().unwrap() = Ok(Some(doc));

    let mut controller = SettingsController::new(Arc::clone(&store));
    controller.apply_fetch(service.fetch("acme").await);

    assert!(!controller.is_edit_mode());
    assert!(controller.is_general_complete());
    assert_eq!(
        controller.general_data().map(|g| g.company_name.as_str()),
        Some("Acme")
    );
    assert_eq!(
        controller.branding_data().map(|b| b.theme_mode),
        Some(ThemeMode::Dark)
    );
}

#[tokio::test]
async fn hydration_failure_starts_fresh_and_is_not_retried() {
    let store = Arc::new(MemoryDraftStore::new());
    let service = FakeConfigService::empty();
    *service.fetch_result.lock().unwrap() = Err(ApiError::Network("connection reset".to_string()));

    let mut controller = SettingsController::new(Arc::clone(&store));
    controller.apply_fetch(service.fetch("acme").await);

    assert!(controller.is_edit_mode());
    assert!(!controller.is_general_complete());
    assert!(controller.general_data().is_none());
}

#[test]
fn forms_feed_the_controller_through_try_submit() {
    let store = Arc::new(MemoryDraftStore::new());
    let mut controller = new_controller(&store);

    // The step controller triggers the form's submit capability and
    // branches on the result, exactly like the save dispatcher does.
    let mut general = GeneralForm::new();
    assert!(general.try_submit().is_err());

    general.fields.set_value("company_name", "Acme");
    general.fields.set_value("contact_email", "a@acme.com");
    let data = general.try_submit().unwrap();
    controller.submit_general(data).unwrap();
    assert_eq!(controller.active_step(), SettingsStep::Branding);

    let mut branding = BrandingForm::new();
    branding.fields.set_value("primary_color", "#112233");
    let data = branding.try_submit().unwrap();
    let doc = controller.prepare_branding_save(data).unwrap();
    assert_eq!(
        doc.branding_config.primary_brand_color.as_deref(),
        Some("#112233")
    );
}

#[test]
fn short_secret_key_never_reaches_submission() {
    let mut form = SecurityForm::new();
    form.fields.set_value("secret_key", "12345");

    let errors = form.try_submit().unwrap_err();
    assert_eq!(
        errors.for_field("secret_key"),
        Some("Must be at least 6 characters")
    );

    // Six characters is the boundary
    form.fields.set_value("secret_key", "123456");
    assert!(form.try_submit().is_ok());
}
