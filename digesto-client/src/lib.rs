//! Digesto HTTP Client
//!
//! A type-safe HTTP client for the Digesto document-management API, plus the
//! session storage the console uses between invocations.
//!
//! # Example
//!
//! ```no_run
//! use digesto_client::DigestoClient;
//! use digesto_core::dto::auth::Credentials;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = DigestoClient::new("http://localhost:8080");
//!
//!     let session = client.sign_in(&Credentials {
//!         email: "admin@digesto.gob".to_string(),
//!         password: "secreto123".to_string(),
//!     }).await?;
//!     client.set_token(Some(session.token.clone()));
//!
//!     for document in client.list_documents().await? {
//!         println!("{}", document.label());
//!     }
//!     Ok(())
//! }
//! ```

mod audit;
mod auth;
mod documents;
pub mod error;
mod files;
mod lookups;
pub mod session;
mod users;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client for the Digesto API
///
/// Methods are grouped by area:
/// - Authentication (sign-in)
/// - Documents (browse, search, create, edit, retire)
/// - Files (upload, download)
/// - Users and lookup catalogs
/// - Audit records
#[derive(Debug, Clone)]
pub struct DigestoClient {
    /// Base URL of the API (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token attached to every request when present
    token: Option<String>,
}

impl DigestoClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use digesto_client::DigestoClient;
    ///
    /// let client = DigestoClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
        }
    }

    /// Attach a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of `path` with one extra, percent-encoded path segment
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ClientError::InvalidRequest(format!("invalid URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("base URL cannot have a path".to_string()))?
            .push(segment);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.authorize(self.client.get(url))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.authorize(self.client.post(url))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.authorize(self.client.put(url))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("DELETE {}", url);
        self.authorize(self.client.delete(url))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-success response into a [`ClientError`]
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

        if status.as_u16() == 401 {
            tracing::warn!("API rejected credentials: {}", message);
        }
        Err(ClientError::api_error(status.as_u16(), message))
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        self.check_status(response).await?;
        Ok(())
    }

    /// Handle an API response carrying a raw body
    async fn handle_bytes(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let bytes = self.check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Pull a human-readable message out of an error body
///
/// The API answers errors with `{"message": ...}`, `{"mensaje": ...}` or
/// `{"error": ...}`; anything else is used verbatim.
fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        for key in ["message", "mensaje", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return Some(message.clone());
            }
        }
    }
    Some(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DigestoClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.token(), None);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = DigestoClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_token() {
        let mut client = DigestoClient::with_client("http://localhost:8080", Client::new())
            .with_token("abc");
        assert_eq!(client.token(), Some("abc"));
        client.set_token(None);
        assert_eq!(client.token(), None);
    }

    #[test]
    fn test_url_with_segment_encodes() {
        let client = DigestoClient::new("http://localhost:8080");
        let url = client
            .url_with_segment("/api/v1/archivos", "acta 1/2024.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/archivos/acta%201%2F2024.pdf"
        );
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message": "Número duplicado"}"#).as_deref(),
            Some("Número duplicado")
        );
        assert_eq!(
            extract_error_message(r#"{"error": "Bad credentials"}"#).as_deref(),
            Some("Bad credentials")
        );
        assert_eq!(extract_error_message("plain text").as_deref(), Some("plain text"));
        assert_eq!(extract_error_message("  "), None);
    }
}
