//! Shared HTTP plumbing for every endpoint module.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use store::Credential;

use crate::config::ApiConfig;
use crate::error::{error_message, ApiError};

/// Handle to the recipe backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

/// Two handles are equal when they were cloned from the same client.
impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.config, &other.config)
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Start a request, attaching the bearer token when there is one.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        let request = self.http.request(method, self.config.url(path));
        match credential {
            Some(credential) => request.bearer_auth(credential.token()),
            None => request,
        }
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Send and decode a body that may be empty or loosely shaped.
    /// An empty body becomes `Value::Null`.
    pub(crate) async fn send_value(
        &self,
        request: RequestBuilder,
    ) -> Result<serde_json::Value, ApiError> {
        let response = check(request.send().await?).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Send, ignoring any response body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        check(request.send().await?).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    tracing::warn!(%status, "api error: {}", message);
    Err(ApiError::Status { status, message })
}

/// Require a session for endpoints the backend only serves to logged-in users.
pub(crate) fn require(credential: Option<&Credential>) -> Result<&Credential, ApiError> {
    credential.ok_or(ApiError::Status {
        status: reqwest::StatusCode::UNAUTHORIZED,
        message: "must be logged in".to_string(),
    })
}
