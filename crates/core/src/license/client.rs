//! HTTP client for the licensing API (api.lemonsqueezy.com/v1/licenses)

use super::types::{Activation, LicenseError, REQUEST_TIMEOUT};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.lemonsqueezy.com/v1/licenses";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Activate,
    Deactivate,
    Validate,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Activate => "activate",
            Endpoint::Deactivate => "deactivate",
            Endpoint::Validate => "validate",
        }
    }
}

/// Sends one form-encoded POST and returns the raw response body.
///
/// Only transport failures are errors here; the body is returned whatever
/// the HTTP status, since the API reports rejections in the JSON.
pub trait Transport: Send + Sync {
    fn post(&self, endpoint: Endpoint, form: &[(&str, &str)]) -> Result<String, LicenseError>;
}

/// `reqwest` blocking transport
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LicenseError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LicenseError::NetworkError(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn with_defaults() -> Result<Self, LicenseError> {
        Self::new(DEFAULT_API_URL, REQUEST_TIMEOUT)
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: Endpoint, form: &[(&str, &str)]) -> Result<String, LicenseError> {
        let resp = self
            .client
            .post(self.url(endpoint))
            .header("Accept", "application/json")
            .form(form)
            .send()
            .map_err(|e| LicenseError::NetworkError(e.to_string()))?;

        tracing::debug!(endpoint = endpoint.path(), status = %resp.status(), "licensing API responded");

        resp.text()
            .map_err(|e| LicenseError::NetworkError(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub store_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The fields of an API response this crate acts on. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub activated: Option<bool>,
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub deactivated: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    #[serde(default)]
    pub instance: Option<ResponseInstance>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.activated == Some(true) || self.valid == Some(true) || self.deactivated == Some(true)
    }

    /// Variant from `meta.variant_id`, 0 when absent
    pub fn variant_id(&self) -> i64 {
        self.meta
            .as_ref()
            .and_then(|m| m.variant_id)
            .unwrap_or_default()
    }

    pub fn instance_id(&self) -> String {
        self.instance
            .as_ref()
            .map(|i| i.id.clone())
            .unwrap_or_default()
    }
}

/// Normalizes a raw response body into a successful response or a tagged error.
///
/// - empty body, `null`, `{}` or `[]` → `EmptyResponse`
/// - anything that isn't a response object → `MalformedResponse`
/// - a non-empty `error` always wins over the success flags → `Api`
/// - no `activated`/`valid`/`deactivated` flag set to `true` → `Rejected`
pub fn normalize(body: &str) -> Result<ApiResponse, LicenseError> {
    if body.trim().is_empty() {
        return Err(LicenseError::EmptyResponse);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| LicenseError::MalformedResponse(e.to_string()))?;

    match &value {
        Value::Null => return Err(LicenseError::EmptyResponse),
        Value::Object(map) if map.is_empty() => return Err(LicenseError::EmptyResponse),
        Value::Array(items) if items.is_empty() => return Err(LicenseError::EmptyResponse),
        Value::Object(_) => {}
        other => {
            return Err(LicenseError::MalformedResponse(format!(
                "expected a JSON object, got {other}"
            )))
        }
    }

    let data: ApiResponse = serde_json::from_value(value)
        .map_err(|e| LicenseError::MalformedResponse(e.to_string()))?;

    if let Some(error) = data.error.as_deref().filter(|e| !e.is_empty()) {
        return Err(LicenseError::Api(error.to_string()));
    }

    if !data.is_success() {
        return Err(LicenseError::Rejected);
    }

    Ok(data)
}

/// Typed wrapper over a `Transport`: builds the form bodies and normalizes replies.
#[derive(Clone)]
pub struct LicenseClient {
    transport: Arc<dyn Transport>,
}

impl LicenseClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn activate(&self, key: &str, instance_name: &str) -> Result<Activation, LicenseError> {
        let data = self.call(
            Endpoint::Activate,
            &[("license_key", key), ("instance_name", instance_name)],
        )?;
        Ok(Activation {
            variant_id: data.variant_id(),
            instance_id: data.instance_id(),
        })
    }

    pub fn deactivate(&self, key: &str, instance_id: &str) -> Result<(), LicenseError> {
        self.call(
            Endpoint::Deactivate,
            &[("license_key", key), ("instance_id", instance_id)],
        )?;
        Ok(())
    }

    /// Validates a key. Returns the variant it is licensed for.
    pub fn validate(&self, key: &str) -> Result<i64, LicenseError> {
        let data = self.call(Endpoint::Validate, &[("license_key", key)])?;
        Ok(data.variant_id())
    }

    fn call(&self, endpoint: Endpoint, form: &[(&str, &str)]) -> Result<ApiResponse, LicenseError> {
        let body = self.transport.post(endpoint, form)?;
        normalize(&body)
    }
}
