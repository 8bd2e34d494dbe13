//! Session DTOs

use serde::{Deserialize, Serialize};

use crate::domain::matching::MatchResult;
use crate::domain::session::DetectionStatus;
use crate::domain::stats::SystemStats;

/// Overview of the current session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub status: DetectionStatus,
    pub entry_count: usize,
    pub exit_count: usize,
    pub result_count: usize,
    pub stats: SystemStats,
    /// Wall-clock duration of the last analysis call, if one finished
    pub last_analysis_ms: Option<u64>,
}

/// Response to an analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: DetectionStatus,
    pub results: Vec<MatchResult>,
    pub stats: SystemStats,
}
