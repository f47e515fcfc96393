//! API Client
//!
//! Centralizes HTTP calls against the InsightAI REST API: resolves a bearer
//! token per call, builds the request from a call description, and normalizes
//! success/failure into the crate's `Result` envelope. Constructed once at
//! application start and passed by reference to consumers.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::auth::{NullTokenProvider, TokenProvider};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::model::{
    AnalysisJob, AnalysisStarted, AuditLog, Dashboard, DashboardDraft, Dataset, DatasetDetail,
    Organization, User, UserDraft,
};

/// Description of a single API call
///
/// Built per call and discarded. Caller-supplied headers are applied after
/// the defaults, so overrides win.
#[derive(Debug)]
pub struct CallOptions {
    /// HTTP method
    pub method: Method,

    /// JSON body, serialized to text when present
    pub body: Option<Value>,

    /// Header overrides, applied last
    pub headers: HeaderMap,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl CallOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn patch(body: Value) -> Self {
        Self {
            method: Method::PATCH,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }
}

/// Authenticated REST client for the InsightAI API
pub struct InsightClient {
    http: reqwest::Client,
    config: ClientConfig,
    auth: Arc<dyn TokenProvider>,
}

impl InsightClient {
    /// Create a client with an explicit configuration and credential provider
    pub fn new(config: ClientConfig, auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            auth,
        }
    }

    /// Create from environment variables, with the stub credential provider
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env(), Arc::new(NullTokenProvider))
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) async fn resolve_token(&self) -> Option<String> {
        self.auth.resolve_token().await
    }

    /// Perform a generic API call and parse the JSON response body
    ///
    /// Success means a status in `[200, 300)`; the parsed body is returned
    /// unwrapped. Any error is logged here, then propagated unchanged.
    /// No retry, no backoff; retry policy belongs to the caller.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: CallOptions,
    ) -> Result<T> {
        let response = self.execute(endpoint, options).await?;
        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body: {e}");
            ClientError::Network(e)
        })?;
        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse response body: {e}");
            ClientError::InvalidResponse(e.to_string())
        })
    }

    /// Perform a call whose success response carries no body (204 etc.)
    pub async fn call_no_content(&self, endpoint: &str, options: CallOptions) -> Result<()> {
        let response = self.execute(endpoint, options).await?;
        response.bytes().await.map_err(|e| {
            error!("Failed to read response body: {e}");
            ClientError::Network(e)
        })?;
        Ok(())
    }

    async fn execute(&self, endpoint: &str, options: CallOptions) -> Result<reqwest::Response> {
        if endpoint.is_empty() {
            error!("API call rejected: empty endpoint path");
            return Err(ClientError::Config("endpoint path is empty".into()));
        }

        let token = self.auth.resolve_token().await;
        let url = request_url(&self.config.base_url, endpoint);
        let headers = build_headers(token.as_deref(), &options.headers)?;

        debug!(method = %options.method, %url, "issuing API request");

        let mut request = self.http.request(options.method, url.as_str()).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_string(body)?);
        }

        let response = request.send().await.map_err(|e| {
            error!("API request failed: {e}");
            ClientError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("Unknown").to_string();
            error!("API request failed: HTTP {} {message}", status.as_u16());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    // Auth endpoints

    pub async fn get_current_user(&self) -> Result<User> {
        self.call("/auth/me", CallOptions::get()).await
    }

    pub async fn get_organizations(&self) -> Result<Vec<Organization>> {
        self.call("/auth/organizations", CallOptions::get()).await
    }

    // Dataset endpoints

    pub async fn get_datasets(&self) -> Result<Vec<Dataset>> {
        self.call("/datasets", CallOptions::get()).await
    }

    pub async fn get_dataset(&self, id: &str) -> Result<DatasetDetail> {
        self.call(&format!("/datasets/{id}"), CallOptions::get())
            .await
    }

    pub async fn delete_dataset(&self, id: &str) -> Result<()> {
        self.call_no_content(&format!("/datasets/{id}"), CallOptions::delete())
            .await
    }

    // Dashboard endpoints

    pub async fn get_dashboards(&self) -> Result<Vec<Dashboard>> {
        self.call("/dashboards", CallOptions::get()).await
    }

    pub async fn get_dashboard(&self, id: &str) -> Result<Dashboard> {
        self.call(&format!("/dashboards/{id}"), CallOptions::get())
            .await
    }

    pub async fn create_dashboard(&self, draft: &DashboardDraft) -> Result<Dashboard> {
        self.call("/dashboards", CallOptions::post(serde_json::to_value(draft)?))
            .await
    }

    pub async fn update_dashboard(&self, id: &str, draft: &DashboardDraft) -> Result<Dashboard> {
        self.call(
            &format!("/dashboards/{id}"),
            CallOptions::patch(serde_json::to_value(draft)?),
        )
        .await
    }

    pub async fn delete_dashboard(&self, id: &str) -> Result<()> {
        self.call_no_content(&format!("/dashboards/{id}"), CallOptions::delete())
            .await
    }

    // Analysis endpoints

    pub async fn create_analysis(&self, dataset_id: &str) -> Result<AnalysisStarted> {
        self.call(
            "/analyses",
            CallOptions::post(serde_json::json!({ "datasetId": dataset_id })),
        )
        .await
    }

    pub async fn get_analysis(&self, id: &str) -> Result<AnalysisJob> {
        self.call(&format!("/analyses/{id}"), CallOptions::get())
            .await
    }

    pub async fn get_history(&self) -> Result<Vec<AnalysisJob>> {
        self.call("/history", CallOptions::get()).await
    }

    // Admin endpoints

    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.call("/admin/users", CallOptions::get()).await
    }

    pub async fn create_user(&self, draft: &UserDraft) -> Result<User> {
        self.call("/admin/users", CallOptions::post(serde_json::to_value(draft)?))
            .await
    }

    pub async fn update_user(&self, id: &str, draft: &UserDraft) -> Result<User> {
        self.call(
            &format!("/admin/users/{id}"),
            CallOptions::patch(serde_json::to_value(draft)?),
        )
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.call_no_content(&format!("/admin/users/{id}"), CallOptions::delete())
            .await
    }

    pub async fn get_audit_logs(&self) -> Result<Vec<AuditLog>> {
        self.call("/admin/audit-logs", CallOptions::get()).await
    }
}

/// Build the request target: base URL prefix when configured, else the
/// literal endpoint (same-origin relative path)
pub(crate) fn request_url(base_url: &str, endpoint: &str) -> String {
    if base_url.is_empty() {
        endpoint.to_string()
    } else {
        format!("{base_url}{endpoint}")
    }
}

/// Merge request headers: JSON content type, bearer token when present,
/// caller overrides last
fn build_headers(token: Option<&str>, overrides: &HeaderMap) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ClientError::Config("auth token contains invalid header characters".into())
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_base_is_literal_endpoint() {
        assert_eq!(request_url("", "/datasets"), "/datasets");
    }

    #[test]
    fn test_url_with_base_is_prefixed() {
        assert_eq!(
            request_url("https://api.x", "/datasets/abc123"),
            "https://api.x/datasets/abc123"
        );
    }

    #[test]
    fn test_headers_without_token() {
        let headers = build_headers(None, &HeaderMap::new()).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let headers = build_headers(Some("tok-123"), &HeaderMap::new()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-123");
    }

    #[test]
    fn test_header_overrides_win() {
        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
        let headers = build_headers(Some("tok-123"), &overrides).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/csv");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-123");
    }

    #[test]
    fn test_token_with_invalid_characters_is_rejected() {
        let result = build_headers(Some("tok\nbad"), &HeaderMap::new());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_endpoint_is_rejected() {
        let client = InsightClient::from_env();
        let result: Result<Value> = client.call("", CallOptions::get()).await;
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_call_options_defaults_to_get() {
        let options = CallOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_delete_options_carry_no_body() {
        let options = CallOptions::delete();
        assert_eq!(options.method, Method::DELETE);
        assert!(options.body.is_none());
    }
}
