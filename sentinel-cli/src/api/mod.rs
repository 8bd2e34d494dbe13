//! API client module
//!
//! HTTP client for the dashboard server's JSON API.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sentinel_core::domain::log::LogEntry;
use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::session::Checkpoint;
use sentinel_core::domain::snapshot::Snapshot;
use sentinel_core::domain::stats::SystemStats;
use sentinel_core::dto::session::{AnalysisReport, SessionSummary};
use sentinel_core::dto::snapshot::UploadSummary;

/// A local image ready to be sent
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// HTTP client for the dashboard API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the dashboard server
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Upload images to a checkpoint
    ///
    /// # Returns
    /// How many snapshots were staged and the new batch size
    pub async fn upload_snapshots(
        &self,
        checkpoint: Checkpoint,
        files: Vec<ImageFile>,
    ) -> Result<UploadSummary> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(file.mime_type)
                .context("Invalid image mime type")?;
            form = form.part("files", part);
        }

        let url = format!("{}/api/snapshots/{}", self.base_url, checkpoint);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send upload request")?;

        self.handle_response(response).await
    }

    /// List the snapshots staged on a checkpoint
    pub async fn list_snapshots(&self, checkpoint: Checkpoint) -> Result<Vec<Snapshot>> {
        let url = format!("{}/api/snapshots/{}", self.base_url, checkpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list snapshots request")?;

        self.handle_response(response).await
    }

    /// Run the analysis and wait for the report
    pub async fn run_analysis(&self) -> Result<AnalysisReport> {
        let url = format!("{}/api/analysis", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to send analysis request")?;

        self.handle_response(response).await
    }

    pub async fn results(&self) -> Result<Vec<MatchResult>> {
        let url = format!("{}/api/results", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send results request")?;

        self.handle_response(response).await
    }

    pub async fn stats(&self) -> Result<SystemStats> {
        let url = format!("{}/api/stats", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send stats request")?;

        self.handle_response(response).await
    }

    /// Pipeline output, newest first
    pub async fn logs(&self) -> Result<Vec<LogEntry>> {
        let url = format!("{}/api/logs", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send logs request")?;

        self.handle_response(response).await
    }

    pub async fn session(&self) -> Result<SessionSummary> {
        let url = format!("{}/api/session", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send session request")?;

        self.handle_response(response).await
    }

    /// Reset the session
    pub async fn clear(&self) -> Result<()> {
        let url = format!("{}/api/session", self.base_url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send clear request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, error_text);
        }

        Ok(())
    }

    /// Handle API response and deserialize JSON
    ///
    /// Error bodies of the form `{"error": "..."}` are reduced to their message.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Request failed with status {}: {}",
                status,
                error_message(&error_text)
            );
        }

        response
            .json()
            .await
            .context("Failed to parse response JSON")
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"error":"Please upload both Entry and Exit images first."}"#),
            "Please upload both Entry and Exit images first."
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
