//! Snapshot DTOs

use serde::{Deserialize, Serialize};

use crate::domain::session::Checkpoint;

/// Outcome of staging a batch of uploaded files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSummary {
    pub checkpoint: Checkpoint,
    /// Snapshots added by this upload
    pub staged: usize,
    /// Snapshots now held for the checkpoint
    pub total: usize,
}
