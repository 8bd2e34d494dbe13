//! Match result domain types
//!
//! Match results are produced entirely by the external analysis service. The
//! wire names follow the response schema requested from the model, hence the
//! camelCase renaming.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::snapshot::Snapshot;

/// Comparison record for one entry/exit vehicle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: String,
    pub entry_snapshot_id: String,
    pub exit_snapshot_id: String,
    pub vehicle_similarity: f64,
    pub driver_similarity: f64,
    pub overall_score: f64,
    pub is_match: bool,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MatchResult {
    /// Clamp all scores into `[0.0, 1.0]`, mapping non-finite values to zero
    pub fn normalized(mut self) -> Self {
        self.vehicle_similarity = clamp_score(self.vehicle_similarity);
        self.driver_similarity = clamp_score(self.driver_similarity);
        self.overall_score = clamp_score(self.overall_score);
        self.reason = self.reason.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn is_mismatch(&self) -> bool {
        self.status == MatchStatus::Mismatch
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Verdict attached to a match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Verified,
    Mismatch,
    Unknown,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Verified => "VERIFIED",
            MatchStatus::Mismatch => "MISMATCH",
            MatchStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognised is `Unknown`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "VERIFIED" => MatchStatus::Verified,
            "MISMATCH" => MatchStatus::Mismatch,
            _ => MatchStatus::Unknown,
        })
    }
}

impl<'de> Deserialize<'de> for MatchStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(MatchStatus::Unknown))
    }
}

/// Pick the entry and exit snapshots displayed next to a match result
///
/// A snapshot is chosen when its id equals the id returned by the model, or
/// when its image URL contains that id. Otherwise the first snapshot of the
/// batch stands in. Returns `None` only if either batch is empty.
pub fn resolve_pair<'a>(
    result: &MatchResult,
    entry: &'a [Snapshot],
    exit: &'a [Snapshot],
) -> Option<(&'a Snapshot, &'a Snapshot)> {
    let entry_snapshot = find_snapshot(entry, &result.entry_snapshot_id)?;
    let exit_snapshot = find_snapshot(exit, &result.exit_snapshot_id)?;
    Some((entry_snapshot, exit_snapshot))
}

fn find_snapshot<'a>(batch: &'a [Snapshot], id: &str) -> Option<&'a Snapshot> {
    let id = id.trim();
    if !id.is_empty() {
        if let Some(found) = batch.iter().find(|s| s.id == id) {
            return Some(found);
        }
        if let Some(found) = batch.iter().find(|s| s.image_url.contains(id)) {
            return Some(found);
        }
    }
    batch.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> MatchResult {
        MatchResult {
            id: "m-1".to_string(),
            entry_snapshot_id: "a".to_string(),
            exit_snapshot_id: "b".to_string(),
            vehicle_similarity: 0.9,
            driver_similarity: 0.4,
            overall_score: 0.7,
            is_match: false,
            status: MatchStatus::Mismatch,
            reason: None,
        }
    }

    fn snapshot(id: &str) -> Snapshot {
        let mut s = Snapshot::from_image(b"img", "image/jpeg", None);
        s.id = id.to_string();
        s
    }

    #[test]
    fn test_deserialize_model_output() {
        let json = r#"{
            "id": "pair-7",
            "entrySnapshotId": "e1",
            "exitSnapshotId": "x1",
            "vehicleSimilarity": 0.93,
            "driverSimilarity": 0.31,
            "overallScore": 0.68,
            "isMatch": false,
            "status": "MISMATCH",
            "reason": "Different driver"
        }"#;

        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.status, MatchStatus::Mismatch);
        assert_eq!(result.entry_snapshot_id, "e1");
        assert_eq!(result.reason.as_deref(), Some("Different driver"));
    }

    #[test]
    fn test_status_parsing_is_lenient() {
        let status: MatchStatus = serde_json::from_str(r#""verified""#).unwrap();
        assert_eq!(status, MatchStatus::Verified);

        let status: MatchStatus = serde_json::from_str(r#""POSSIBLE_MATCH""#).unwrap();
        assert_eq!(status, MatchStatus::Unknown);

        assert_eq!(
            serde_json::to_string(&MatchStatus::Mismatch).unwrap(),
            r#""MISMATCH""#
        );
    }

    #[test]
    fn test_normalized_clamps_scores() {
        let mut result = sample_result();
        result.vehicle_similarity = 1.7;
        result.driver_similarity = -0.2;
        result.overall_score = f64::NAN;
        result.reason = Some("  ".to_string());

        let result = result.normalized();
        assert_eq!(result.vehicle_similarity, 1.0);
        assert_eq!(result.driver_similarity, 0.0);
        assert_eq!(result.overall_score, 0.0);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_resolve_pair_by_id() {
        let entry = vec![snapshot("z"), snapshot("a")];
        let exit = vec![snapshot("y"), snapshot("b")];

        let (e, x) = resolve_pair(&sample_result(), &entry, &exit).unwrap();
        assert_eq!(e.id, "a");
        assert_eq!(x.id, "b");
    }

    #[test]
    fn test_resolve_pair_falls_back_to_first() {
        let entry = vec![snapshot("z"), snapshot("q")];
        let exit = vec![snapshot("y")];
        let mut result = sample_result();
        result.entry_snapshot_id = "ENTRY_1".to_string();
        result.exit_snapshot_id = String::new();

        let (e, x) = resolve_pair(&result, &entry, &exit).unwrap();
        assert_eq!(e.id, "z");
        assert_eq!(x.id, "y");
    }

    #[test]
    fn test_resolve_pair_needs_both_batches() {
        let entry = vec![snapshot("a")];
        assert!(resolve_pair(&sample_result(), &entry, &[]).is_none());
    }
}
