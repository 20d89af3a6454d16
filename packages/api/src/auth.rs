//! Email/password authentication against `/auth`.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use store::Credential;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Field names the backend has used for the access token, in lookup order.
const TOKEN_FIELDS: &[&str] = &["accessToken", "token", "jwtToken", "accestoken", "access_token"];

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Registration form.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Registration {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password: String,
}

/// A successful login: the session credential and the raw response body.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub credential: Credential,
    pub raw: Value,
}

fn extract_token(body: &Value) -> Option<Credential> {
    TOKEN_FIELDS
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find_map(Credential::new)
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginBody {
            email: email.trim(),
            password,
        };
        let raw = self
            .send_value(self.request(Method::POST, "/auth/login", None).json(&body))
            .await?;
        let credential = extract_token(&raw).ok_or(ApiError::MissingToken)?;
        tracing::info!("logged in");
        Ok(LoginResponse { credential, raw })
    }

    pub async fn register(&self, form: &Registration) -> Result<Value, ApiError> {
        if form.email.trim().is_empty() || !form.email.contains('@') {
            return Err(ApiError::InvalidInput("invalid email address".to_string()));
        }
        if form.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("name is required".to_string()));
        }
        let form = Registration {
            surname: form
                .surname
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            ..form.clone()
        };
        self.send_value(self.request(Method::POST, "/auth/register", None).json(&form))
            .await
    }
}
