//! Session Repository
//!
//! Holds the single operator session behind an async lock.

use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::session::{Checkpoint, DetectionStatus};
use sentinel_core::domain::snapshot::Snapshot;
use sentinel_core::domain::stats::SystemStats;
use sentinel_core::dto::session::SessionSummary;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::repository::activity_log::ActivityLog;

/// Everything the dashboard knows about the current session
#[derive(Debug, Clone)]
pub struct Session {
    pub status: DetectionStatus,
    pub entry: Vec<Snapshot>,
    pub exit: Vec<Snapshot>,
    pub results: Vec<MatchResult>,
    pub log: ActivityLog,
    /// Bumped on every reset so in-flight work can tell it is stale
    pub generation: u64,
    pub last_analysis: Option<Duration>,
}

impl Session {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            status: DetectionStatus::Idle,
            entry: Vec::new(),
            exit: Vec::new(),
            results: Vec::new(),
            log: ActivityLog::new(log_capacity),
            generation: 0,
            last_analysis: None,
        }
    }

    pub fn batch(&self, checkpoint: Checkpoint) -> &[Snapshot] {
        match checkpoint {
            Checkpoint::Entry => &self.entry,
            Checkpoint::Exit => &self.exit,
        }
    }

    pub fn batch_mut(&mut self, checkpoint: Checkpoint) -> &mut Vec<Snapshot> {
        match checkpoint {
            Checkpoint::Entry => &mut self.entry,
            Checkpoint::Exit => &mut self.exit,
        }
    }

    pub fn stats(&self) -> SystemStats {
        SystemStats::aggregate(self.entry.len(), self.exit.len(), &self.results)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            status: self.status,
            entry_count: self.entry.len(),
            exit_count: self.exit.len(),
            result_count: self.results.len(),
            stats: self.stats(),
            last_analysis_ms: self.last_analysis.map(|d| d.as_millis() as u64),
        }
    }

    /// Drop all snapshots, results and log lines
    pub fn reset(&mut self) {
        self.status = DetectionStatus::Idle;
        self.entry.clear();
        self.exit.clear();
        self.results.clear();
        self.log.clear();
        self.last_analysis = None;
        self.generation += 1;
    }
}

/// Shared handle to the session
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::new(log_capacity))),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(10)
    }
}
