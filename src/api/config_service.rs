//! HTTP client for the remote configuration service

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::time::Duration;

use super::error::ApiError;
use super::types::TenantConfigDocument;
use crate::config::ApiConfig;

/// Remote persistence for tenant configuration documents.
///
/// The console only ever reads the whole document and writes the whole
/// document; the backend exposes no partial-update path this UI exercises.
#[async_trait]
pub trait ConfigurationService: Send + Sync {
    /// Fetch the configuration document for a tenant.
    ///
    /// `Ok(None)` means the tenant has no configuration yet, which is an
    /// ordinary state, not a failure.
    async fn fetch(&self, tenant: &str) -> Result<Option<TenantConfigDocument>, ApiError>;

    /// Persist the combined configuration document for a tenant.
    async fn save(&self, tenant: &str, doc: &TenantConfigDocument) -> Result<(), ApiError>;
}

/// reqwest-backed implementation of [`ConfigurationService`]
pub struct HttpConfigService {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpConfigService {
    /// Build a client from the api section of the application config.
    ///
    /// Every request is bounded by the configured timeout so a hung write
    /// cannot leave the save gate held forever.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tenantctl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(api.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let token = std::env::var(&api.token_env).ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::debug!(var = %api.token_env, "no API token in environment");
        }

        Ok(Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn configuration_url(&self, tenant: &str) -> String {
        format!("{}/api/v1/tenants/{}/configuration", self.base_url, tenant)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Map a reqwest transport error to our taxonomy
fn transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Map a non-success response to an [`ApiError`]
async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            ApiError::RateLimited { retry_after_secs }
        }
        _ => {
            let message = response.text().await.unwrap_or_default();
            ApiError::Http {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl ConfigurationService for HttpConfigService {
    async fn fetch(&self, tenant: &str) -> Result<Option<TenantConfigDocument>, ApiError> {
        let url = self.configuration_url(tenant);
        tracing::debug!(%url, "fetching tenant configuration");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            let err = status_error(response).await;
            // Absent document is an ordinary outcome of the read path
            if err.is_not_found() {
                return Ok(None);
            }
            return Err(err);
        }

        let doc = response
            .json::<TenantConfigDocument>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(Some(doc))
    }

    async fn save(&self, tenant: &str, doc: &TenantConfigDocument) -> Result<(), ApiError> {
        let url = self.configuration_url(tenant);
        tracing::debug!(%url, "saving tenant configuration");

        let response = self
            .authorize(self.client.post(&url))
            .json(doc)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}
