//! Bearer-authorized JSON requests.
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses are logged with their body and returned as
//! [`AuthError::Api`] without attempting to decode the body as JSON.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::AuthError;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Caller options for [`crate::AuthCoordinator::call_api`].
#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
    pub method: Method,
    /// Extra headers; these override the defaults, including `Authorization`.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post(body: Value) -> Self {
        Self { method: Method::POST, headers: Vec::new(), body: Some(body) }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Default headers for `token`, overlaid with caller headers.
pub(crate) fn merge_headers(token: &str, extra: &[(String, String)]) -> Result<HeaderMap, AuthError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| AuthError::InvalidHeader(format!("{AUTHORIZATION}: {e}")))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| AuthError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value).map_err(|e| AuthError::InvalidHeader(format!("{name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Send `request` to `url` with `token` and decode the JSON response.
pub(crate) async fn send_authorized(
    http: &reqwest::Client,
    url: &str,
    token: &str,
    request: ApiRequest,
) -> Result<Value, AuthError> {
    let headers = merge_headers(token, &request.headers)?;
    let mut builder = http.request(request.method.clone(), url).headers(headers);
    if let Some(body) = &request.body {
        builder = builder.body(body.to_string());
    }

    let response = builder.send().await.map_err(|e| AuthError::Request(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%url, status = status.as_u16(), %body, "API error");
        return Err(AuthError::Api { status: status.as_u16() });
    }

    response.json::<Value>().await.map_err(|e| AuthError::Decode(e.to_string()))
}
