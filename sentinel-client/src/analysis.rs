//! Traffic analysis request

use async_trait::async_trait;
use sentinel_core::DataUrl;
use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::snapshot::Snapshot;
use serde_json::json;

use crate::error::{ClientError, Result};
use crate::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::{GeminiClient, TrafficAnalyzer};

/// Instruction sent ahead of the images
pub const ANALYSIS_PROMPT: &str = r#"
Analyze these two sets of images: "Entry" and "Exit".
Your task is to act as a high-precision computer vision pipeline.
1. Identify the vehicles in both sets (Make, Model, Color, Plate).
2. Identify the driver's face in each vehicle.
3. Compare the driver in the Entry image with the driver in the Exit image for the SAME vehicle.
4. If the driver faces do not match, flag as a MISMATCH.
5. Provide a similarity score (0.0 to 1.0) for both the vehicle and the driver.

Each image is preceded by its snapshot id. Use those ids for entrySnapshotId and exitSnapshotId.
Return a JSON array of MatchResults.
"#;

/// Schema the model's JSON answer must follow
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "entrySnapshotId": { "type": "STRING" },
                "exitSnapshotId": { "type": "STRING" },
                "vehicleSimilarity": { "type": "NUMBER" },
                "driverSimilarity": { "type": "NUMBER" },
                "overallScore": { "type": "NUMBER" },
                "isMatch": { "type": "BOOLEAN" },
                "status": { "type": "STRING", "description": "VERIFIED, MISMATCH, or UNKNOWN" },
                "reason": { "type": "STRING" }
            },
            "required": [
                "id",
                "isMatch",
                "status",
                "entrySnapshotId",
                "exitSnapshotId",
                "vehicleSimilarity",
                "driverSimilarity",
                "overallScore"
            ]
        }
    })
}

/// Build the multimodal prompt for both snapshot batches
///
/// Layout: instruction, `Entry Images:`, then an id label and the image for
/// every entry snapshot, then the same for the exit batch.
pub fn build_request(entry: &[Snapshot], exit: &[Snapshot]) -> Result<GenerateContentRequest> {
    let mut parts = Vec::with_capacity(3 + 2 * (entry.len() + exit.len()));
    parts.push(Part::text(ANALYSIS_PROMPT));
    parts.push(Part::text("Entry Images:"));
    push_images(&mut parts, entry)?;
    parts.push(Part::text("Exit Images:"));
    push_images(&mut parts, exit)?;

    Ok(GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    })
}

fn push_images(parts: &mut Vec<Part>, snapshots: &[Snapshot]) -> Result<()> {
    for snapshot in snapshots {
        let url = DataUrl::parse(&snapshot.image_url)?;
        parts.push(Part::text(format!("Snapshot {}:", snapshot.id)));
        parts.push(Part::InlineData(InlineData {
            mime_type: url.mime_type,
            data: url.data,
        }));
    }
    Ok(())
}

/// Parse the model's answer text into match results
///
/// Empty text counts as an empty array. A markdown code fence around the JSON
/// is tolerated.
pub fn parse_results(text: &str) -> Result<Vec<MatchResult>> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<MatchResult> = serde_json::from_str(body)
        .map_err(|e| ClientError::ParseError(format!("Model answer is not a MatchResult array: {}", e)))?;

    Ok(results.into_iter().map(MatchResult::normalized).collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the info string, e.g. "json"
    match inner.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => inner.trim(),
    }
}

impl GeminiClient {
    /// Send both batches to the model and parse its verdicts
    pub async fn analyze_traffic(
        &self,
        entry: &[Snapshot],
        exit: &[Snapshot],
    ) -> Result<Vec<MatchResult>> {
        if self.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let request = build_request(entry, exit)?;
        tracing::info!(
            "Requesting analysis of {} entry and {} exit snapshots from {}",
            entry.len(),
            exit.len(),
            self.model
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let body: GenerateContentResponse = self.handle_response(response).await?;

        results_from_response(&body)
    }
}

/// Match results carried by a model response
///
/// A response without answer text (no candidates, or a candidate stopped
/// before producing content) counts as an empty result set.
pub fn results_from_response(body: &GenerateContentResponse) -> Result<Vec<MatchResult>> {
    let Some(text) = body.text() else {
        let block_reason = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            .unwrap_or("none");
        let finish_reason = body
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        tracing::warn!(
            "Model returned no answer text (block reason: {}, finish reason: {})",
            block_reason,
            finish_reason
        );
        return Ok(Vec::new());
    };

    let results = parse_results(&text)?;
    tracing::debug!("Model returned {} match results", results.len());
    Ok(results)
}

#[async_trait]
impl TrafficAnalyzer for GeminiClient {
    async fn analyze(&self, entry: &[Snapshot], exit: &[Snapshot]) -> Result<Vec<MatchResult>> {
        self.analyze_traffic(entry, exit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::domain::matching::MatchStatus;

    fn snapshot(id: &str, mime: &str) -> Snapshot {
        let mut s = Snapshot::from_image(b"pixels", mime, None);
        s.id = id.to_string();
        s
    }

    #[test]
    fn test_build_request_orders_parts() {
        let entry = vec![snapshot("e1", "image/jpeg")];
        let exit = vec![snapshot("x1", "image/png"), snapshot("x2", "image/jpeg")];

        let request = build_request(&entry, &exit).unwrap();
        let parts = &request.contents[0].parts;

        assert_eq!(parts.len(), 3 + 2 * 3);
        assert_eq!(parts[0], Part::text(ANALYSIS_PROMPT));
        assert_eq!(parts[1], Part::text("Entry Images:"));
        assert_eq!(parts[2], Part::text("Snapshot e1:"));
        assert_eq!(parts[4], Part::text("Exit Images:"));
        assert_eq!(parts[5], Part::text("Snapshot x1:"));
        assert_eq!(
            parts[6],
            Part::InlineData(InlineData {
                mime_type: "image/png".to_string(),
                data: "cGl4ZWxz".to_string(),
            })
        );
    }

    #[test]
    fn test_build_request_asks_for_json() {
        let request = build_request(&[], &[]).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
        let required = value["generationConfig"]["responseSchema"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 8);
        assert!(!required.contains(&json!("reason")));
    }

    #[test]
    fn test_build_request_rejects_non_data_url() {
        let mut bad = snapshot("e1", "image/jpeg");
        bad.image_url = "https://cdn.example.com/e1.jpg".to_string();

        let err = build_request(&[bad], &[]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_parse_results_empty_text() {
        assert!(parse_results("").unwrap().is_empty());
        assert!(parse_results("  []  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_fenced_and_normalized() {
        let text = "```json\n[{\"id\":\"p1\",\"entrySnapshotId\":\"e1\",\"exitSnapshotId\":\"x1\",\
            \"vehicleSimilarity\":1.2,\"driverSimilarity\":0.35,\"overallScore\":0.71,\
            \"isMatch\":false,\"status\":\"mismatch\"}]\n```";

        let results = parse_results(text).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, MatchStatus::Mismatch);
        assert_eq!(results[0].vehicle_similarity, 1.0);
        assert!(results[0].reason.is_none());
    }

    #[test]
    fn test_response_without_text_is_empty_result() {
        let bodies = [
            json!({}),
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
            json!({ "promptFeedback": { "blockReason": "OTHER" } }),
        ];

        for body in bodies {
            let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
            assert!(results_from_response(&response).unwrap().is_empty());
        }
    }

    #[test]
    fn test_response_text_is_parsed() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[]" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert!(results_from_response(&response).unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_rejects_objects() {
        let err = parse_results(r#"{"id":"p1"}"#).unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_analyze_without_key_fails_fast() {
        let client = GeminiClient::new("");
        let err = client
            .analyze(&[snapshot("e1", "image/jpeg")], &[snapshot("x1", "image/jpeg")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
    }
}
