//! Snapshot domain types

use serde::{Deserialize, Serialize};

use crate::data_url::DataUrl;

/// Length of generated snapshot identifiers
pub const SNAPSHOT_ID_LEN: usize = 9;

/// A single uploaded camera capture
///
/// Detections and metadata are part of the shape exchanged with the analysis
/// service but are never filled in locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Image as a `data:` URL
    pub image_url: String,
    pub detections: Vec<DetectionResult>,
    pub metadata: VehicleMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Snapshot {
    /// Build a snapshot from raw image bytes
    pub fn from_image(bytes: &[u8], mime_type: &str, file_name: Option<String>) -> Self {
        Self {
            id: generate_snapshot_id(),
            timestamp: chrono::Utc::now(),
            image_url: DataUrl::encode(mime_type, bytes).to_string(),
            detections: Vec::new(),
            metadata: VehicleMetadata::default(),
            file_name,
        }
    }
}

/// Random short identifier for a snapshot
pub fn generate_snapshot_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(SNAPSHOT_ID_LEN);
    id
}

/// Vehicle attributes attached to a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
}

/// An object detected inside a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: String,
    pub kind: DetectionKind,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    Vehicle,
    Driver,
}

/// Pixel-space rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_image_builds_data_url() {
        let snapshot = Snapshot::from_image(&[0xFF, 0xD8, 0xFF], "image/jpeg", None);

        assert_eq!(snapshot.image_url, "data:image/jpeg;base64,/9j/");
        assert!(snapshot.detections.is_empty());
        assert_eq!(snapshot.metadata, VehicleMetadata::default());
    }

    #[test]
    fn test_generated_ids_are_short_and_distinct() {
        let a = generate_snapshot_id();
        let b = generate_snapshot_id();

        assert_eq!(a.len(), SNAPSHOT_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_metadata_is_omitted() {
        let json = serde_json::to_value(VehicleMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
