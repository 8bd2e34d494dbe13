//! Sentinel analysis client
//!
//! Typed client for the hosted multimodal model that performs the actual
//! vehicle and driver comparison. The dashboard only shapes the request and
//! parses the JSON answer; every similarity score comes from the model.
//!
//! # Example
//!
//! ```no_run
//! use sentinel_client::{GeminiClient, TrafficAnalyzer};
//! use sentinel_core::domain::snapshot::Snapshot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sentinel_client::ClientError> {
//!     let client = GeminiClient::new("my-api-key");
//!
//!     let entry = vec![Snapshot::from_image(&std::fs::read("in.jpg").unwrap(), "image/jpeg", None)];
//!     let exit = vec![Snapshot::from_image(&std::fs::read("out.jpg").unwrap(), "image/jpeg", None)];
//!
//!     for result in client.analyze(&entry, &exit).await? {
//!         println!("{} -> {}", result.id, result.status);
//!     }
//!     Ok(())
//! }
//! ```

mod analysis;
pub mod error;
pub mod wire;

pub use analysis::{
    ANALYSIS_PROMPT, build_request, parse_results, response_schema, results_from_response,
};
pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::Client;
use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::snapshot::Snapshot;
use serde::de::DeserializeOwned;

/// Public endpoint of the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used for forensic comparison unless configured otherwise
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Anything that can compare entry and exit snapshots
///
/// The server depends on this trait rather than on [`GeminiClient`] so the
/// session logic can run against a fake analyzer.
#[async_trait]
pub trait TrafficAnalyzer: Send + Sync {
    /// Compare both batches and return one record per correlated vehicle pair
    async fn analyze(&self, entry: &[Snapshot], exit: &[Snapshot]) -> Result<Vec<MatchResult>>;
}

/// HTTP client for the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    /// Base URL of the API (e.g., "https://generativelanguage.googleapis.com")
    base_url: String,
    /// API key sent in the `x-goog-api-key` header
    api_key: String,
    /// Model name (e.g., "gemini-3-pro-preview")
    model: String,
    /// HTTP client instance
    client: Client,
}

impl GeminiClient {
    /// Create a client against the public endpoint with the default model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(DEFAULT_BASE_URL, api_key, Client::new())
    }

    /// Create a client with a custom base URL and HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use sentinel_client::GeminiClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(120))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GeminiClient::with_client("http://localhost:9000", "key", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, api_key: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses become [`ClientError::ApiError`], carrying the
    /// API's own error message when the body has one.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                wire::error_message(&error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
