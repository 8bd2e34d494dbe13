//! Session Service
//!
//! Business logic for staging snapshots, running the analysis and resetting
//! the session.

use sentinel_client::{ClientError, TrafficAnalyzer};
use sentinel_core::domain::log::LogEntry;
use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::session::{Checkpoint, DetectionStatus};
use sentinel_core::domain::snapshot::Snapshot;
use sentinel_core::domain::stats::SystemStats;
use sentinel_core::dto::session::{AnalysisReport, SessionSummary};
use sentinel_core::dto::snapshot::UploadSummary;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::repository::session_repository::SessionStore;

/// Service error type
#[derive(Debug)]
pub enum SessionError {
    /// One of the batches is empty
    MissingSnapshots,
    /// An analysis is already running
    AnalysisInProgress,
    /// The session was cleared while the analysis was running
    Superseded,
    ValidationError(String),
    AnalysisFailed(ClientError),
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub const MISSING_SNAPSHOTS_MESSAGE: &str = "Please upload both Entry and Exit images first.";

// =============================================================================
// Snapshots
// =============================================================================

/// Append snapshots to a checkpoint batch
///
/// An empty batch is a no-op and leaves the log untouched.
pub async fn stage_snapshots(
    store: &SessionStore,
    checkpoint: Checkpoint,
    snapshots: Vec<Snapshot>,
) -> Result<UploadSummary> {
    let mut session = store.write().await;
    let staged = snapshots.len();

    if staged > 0 {
        session.batch_mut(checkpoint).extend(snapshots);
        session.log.push(LogEntry::info(format!(
            "Uploaded {} {} snapshots.",
            staged, checkpoint
        )));
        tracing::info!("Staged {} {} snapshots", staged, checkpoint);
    }

    Ok(UploadSummary {
        checkpoint,
        staged,
        total: session.batch(checkpoint).len(),
    })
}

/// Snapshots currently staged for a checkpoint
pub async fn list_snapshots(store: &SessionStore, checkpoint: Checkpoint) -> Vec<Snapshot> {
    store.read().await.batch(checkpoint).to_vec()
}

// =============================================================================
// Analysis
// =============================================================================

/// Batches handed to the analyzer, tagged with the session generation
#[derive(Debug)]
pub struct PendingAnalysis {
    entry: Vec<Snapshot>,
    exit: Vec<Snapshot>,
    generation: u64,
}

/// Validate the session and move it to `processing`
pub async fn begin_analysis(store: &SessionStore) -> Result<PendingAnalysis> {
    let mut session = store.write().await;

    if session.status == DetectionStatus::Processing {
        return Err(SessionError::AnalysisInProgress);
    }
    if session.entry.is_empty() || session.exit.is_empty() {
        return Err(SessionError::MissingSnapshots);
    }

    session.status = DetectionStatus::Processing;
    session
        .log
        .push(LogEntry::info("Initializing Computer Vision Pipeline..."));
    session
        .log
        .push(LogEntry::info("Extracting vehicle and facial embeddings..."));

    Ok(PendingAnalysis {
        entry: session.entry.clone(),
        exit: session.exit.clone(),
        generation: session.generation,
    })
}

/// Call the analyzer and record the outcome
///
/// The session lock is released while the analyzer runs.
pub async fn complete_analysis(
    store: &SessionStore,
    pending: PendingAnalysis,
    analyzer: &dyn TrafficAnalyzer,
) -> Result<AnalysisReport> {
    tracing::info!(
        "Starting analysis of {} entry and {} exit snapshots",
        pending.entry.len(),
        pending.exit.len()
    );

    let started = Instant::now();
    let outcome = analyzer.analyze(&pending.entry, &pending.exit).await;
    let elapsed = started.elapsed();

    let mut session = store.write().await;

    if session.generation != pending.generation {
        tracing::info!("Session was cleared during analysis, discarding outcome");
        return Err(SessionError::Superseded);
    }

    match outcome {
        Ok(results) => {
            let mismatches = results.iter().filter(|r| r.is_mismatch()).count();
            session.results = results;
            session.status = DetectionStatus::Completed;
            session.last_analysis = Some(elapsed);
            session.log.push(LogEntry::info(format!(
                "Analysis complete. Detected {} mismatches.",
                mismatches
            )));

            tracing::info!(
                "Analysis completed in {:?}: {} results, {} mismatches",
                elapsed,
                session.results.len(),
                mismatches
            );

            Ok(AnalysisReport {
                status: session.status,
                results: session.results.clone(),
                stats: session.stats(),
            })
        }
        Err(err) => {
            tracing::error!("Analysis error: {}", err);
            session.status = DetectionStatus::Error;
            session
                .log
                .push(LogEntry::error("Critical failure in AI Analysis pipeline."));
            Err(SessionError::AnalysisFailed(err))
        }
    }
}

/// Validate, then run the analyzer inline
pub async fn run_analysis(
    store: &SessionStore,
    analyzer: &dyn TrafficAnalyzer,
) -> Result<AnalysisReport> {
    let pending = begin_analysis(store).await?;
    complete_analysis(store, pending, analyzer).await
}

/// Validate, then run the analyzer on a detached task
///
/// Validation errors are returned directly. The spawned task records its
/// outcome even if the returned handle is dropped, so the session never
/// stays stuck in `processing`.
pub async fn start_analysis(
    store: &SessionStore,
    analyzer: Arc<dyn TrafficAnalyzer>,
) -> Result<JoinHandle<Result<AnalysisReport>>> {
    let pending = begin_analysis(store).await?;
    let store = store.clone();

    Ok(tokio::spawn(async move {
        complete_analysis(&store, pending, analyzer.as_ref()).await
    }))
}

/// Run the analysis detached and wait for its report
pub async fn launch_analysis(
    store: &SessionStore,
    analyzer: Arc<dyn TrafficAnalyzer>,
) -> Result<AnalysisReport> {
    start_analysis(store, analyzer)
        .await?
        .await
        .map_err(|e| SessionError::InternalError(format!("Analysis task failed: {}", e)))?
}

// =============================================================================
// Queries
// =============================================================================

pub async fn results(store: &SessionStore) -> Vec<MatchResult> {
    store.read().await.results.clone()
}

pub async fn stats(store: &SessionStore) -> SystemStats {
    store.read().await.stats()
}

/// Pipeline output, newest first
pub async fn logs(store: &SessionStore) -> Vec<LogEntry> {
    store.read().await.log.entries()
}

pub async fn summary(store: &SessionStore) -> SessionSummary {
    store.read().await.summary()
}

/// Reset the session to idle
pub async fn clear(store: &SessionStore) {
    store.write().await.reset();
    tracing::info!("Session cleared");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sentinel_core::domain::matching::MatchStatus;
    use tokio::sync::Notify;

    struct FixedAnalyzer {
        results: Vec<MatchResult>,
    }

    #[async_trait]
    impl TrafficAnalyzer for FixedAnalyzer {
        async fn analyze(
            &self,
            _entry: &[Snapshot],
            _exit: &[Snapshot],
        ) -> sentinel_client::Result<Vec<MatchResult>> {
            Ok(self.results.clone())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl TrafficAnalyzer for FailingAnalyzer {
        async fn analyze(
            &self,
            _entry: &[Snapshot],
            _exit: &[Snapshot],
        ) -> sentinel_client::Result<Vec<MatchResult>> {
            Err(ClientError::api_error(503, "model overloaded"))
        }
    }

    /// Blocks until released, so tests can act while an analysis is in flight
    struct GatedAnalyzer {
        started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl TrafficAnalyzer for GatedAnalyzer {
        async fn analyze(
            &self,
            _entry: &[Snapshot],
            _exit: &[Snapshot],
        ) -> sentinel_client::Result<Vec<MatchResult>> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(Vec::new())
        }
    }

    fn result(id: &str, status: MatchStatus) -> MatchResult {
        MatchResult {
            id: id.to_string(),
            entry_snapshot_id: "e".to_string(),
            exit_snapshot_id: "x".to_string(),
            vehicle_similarity: 0.9,
            driver_similarity: 0.8,
            overall_score: 0.85,
            is_match: status == MatchStatus::Verified,
            status,
            reason: None,
        }
    }

    fn images(n: usize) -> Vec<Snapshot> {
        (0..n)
            .map(|_| Snapshot::from_image(&[0xFF, 0xD8, 0xFF], "image/jpeg", None))
            .collect()
    }

    async fn staged_store() -> SessionStore {
        let store = SessionStore::new(10);
        stage_snapshots(&store, Checkpoint::Entry, images(2)).await.unwrap();
        stage_snapshots(&store, Checkpoint::Exit, images(1)).await.unwrap();
        store
    }

    fn messages(entries: Vec<LogEntry>) -> Vec<String> {
        entries.into_iter().map(|e| e.message).collect()
    }

    #[tokio::test]
    async fn test_stage_snapshots_appends_and_logs() {
        let store = SessionStore::new(10);

        let first = stage_snapshots(&store, Checkpoint::Entry, images(2)).await.unwrap();
        let second = stage_snapshots(&store, Checkpoint::Entry, images(3)).await.unwrap();

        assert_eq!(first.staged, 2);
        assert_eq!(second.staged, 3);
        assert_eq!(second.total, 5);
        assert_eq!(list_snapshots(&store, Checkpoint::Entry).await.len(), 5);
        assert_eq!(
            messages(logs(&store).await),
            vec!["Uploaded 3 entry snapshots.", "Uploaded 2 entry snapshots."]
        );
    }

    #[tokio::test]
    async fn test_stage_empty_upload_is_noop() {
        let store = SessionStore::new(10);

        let summary = stage_snapshots(&store, Checkpoint::Exit, Vec::new()).await.unwrap();

        assert_eq!(summary.staged, 0);
        assert_eq!(summary.total, 0);
        assert!(logs(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_analysis_requires_both_batches() {
        let store = SessionStore::new(10);
        stage_snapshots(&store, Checkpoint::Entry, images(1)).await.unwrap();
        let analyzer = FixedAnalyzer { results: Vec::new() };

        let err = run_analysis(&store, &analyzer).await.unwrap_err();

        assert!(matches!(err, SessionError::MissingSnapshots));
        assert_eq!(summary(&store).await.status, DetectionStatus::Idle);
    }

    #[tokio::test]
    async fn test_successful_analysis_completes() {
        let store = staged_store().await;
        let analyzer = FixedAnalyzer {
            results: vec![
                result("a", MatchStatus::Verified),
                result("b", MatchStatus::Mismatch),
            ],
        };

        let report = run_analysis(&store, &analyzer).await.unwrap();

        assert_eq!(report.status, DetectionStatus::Completed);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.stats.total_detections, 3);
        assert_eq!(report.stats.verified_matches, 1);
        assert_eq!(report.stats.mismatches_detected, 1);

        let log = messages(logs(&store).await);
        assert_eq!(log[0], "Analysis complete. Detected 1 mismatches.");
        assert_eq!(log[1], "Extracting vehicle and facial embeddings...");
        assert_eq!(log[2], "Initializing Computer Vision Pipeline...");
        assert!(summary(&store).await.last_analysis_ms.is_some());
    }

    #[tokio::test]
    async fn test_failed_analysis_sets_error_and_keeps_results() {
        let store = staged_store().await;
        let ok = FixedAnalyzer {
            results: vec![result("a", MatchStatus::Verified)],
        };
        run_analysis(&store, &ok).await.unwrap();

        let err = run_analysis(&store, &FailingAnalyzer).await.unwrap_err();

        assert!(matches!(err, SessionError::AnalysisFailed(_)));
        assert_eq!(summary(&store).await.status, DetectionStatus::Error);
        assert_eq!(results(&store).await.len(), 1);
        assert_eq!(
            logs(&store).await[0].message,
            "Critical failure in AI Analysis pipeline."
        );
    }

    #[tokio::test]
    async fn test_concurrent_analysis_rejected_and_clear_wins() {
        let store = staged_store().await;
        let analyzer = Arc::new(GatedAnalyzer {
            started: Notify::new(),
            release: Notify::new(),
        });

        let task = {
            let store = store.clone();
            let analyzer = analyzer.clone();
            tokio::spawn(async move { run_analysis(&store, analyzer.as_ref()).await })
        };
        analyzer.started.notified().await;

        assert_eq!(summary(&store).await.status, DetectionStatus::Processing);
        let second = run_analysis(&store, analyzer.as_ref()).await.unwrap_err();
        assert!(matches!(second, SessionError::AnalysisInProgress));

        clear(&store).await;
        analyzer.release.notify_one();

        let outcome = task.await.unwrap();
        assert!(matches!(outcome, Err(SessionError::Superseded)));
        let after = summary(&store).await;
        assert_eq!(after.status, DetectionStatus::Idle);
        assert_eq!(after.entry_count, 0);
        assert!(logs(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_launch_analysis_runs_detached() {
        let store = staged_store().await;
        let analyzer: Arc<dyn TrafficAnalyzer> = Arc::new(FixedAnalyzer {
            results: vec![result("a", MatchStatus::Unknown)],
        });

        let report = launch_analysis(&store, analyzer).await.unwrap();

        assert_eq!(report.status, DetectionStatus::Completed);
        assert_eq!(stats(&store).await.verified_matches, 0);
    }

    #[tokio::test]
    async fn test_start_analysis_reports_validation_errors_immediately() {
        let store = SessionStore::new(10);
        let analyzer: Arc<dyn TrafficAnalyzer> = Arc::new(FixedAnalyzer { results: Vec::new() });

        let err = start_analysis(&store, analyzer).await.unwrap_err();

        assert!(matches!(err, SessionError::MissingSnapshots));
    }

    #[tokio::test]
    async fn test_dropped_handle_still_records_outcome() {
        let store = staged_store().await;
        let analyzer = Arc::new(GatedAnalyzer {
            started: Notify::new(),
            release: Notify::new(),
        });

        drop(start_analysis(&store, analyzer.clone()).await.unwrap());
        analyzer.started.notified().await;
        analyzer.release.notify_one();

        for _ in 0..100 {
            if summary(&store).await.status == DetectionStatus::Completed {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(summary(&store).await.status, DetectionStatus::Completed);
    }

    #[tokio::test]
    async fn test_clear_resets_session() {
        let store = staged_store().await;
        clear(&store).await;

        let after = summary(&store).await;
        assert_eq!(after.status, DetectionStatus::Idle);
        assert_eq!(after.entry_count + after.exit_count, 0);
        assert_eq!(stats(&store).await, SystemStats::default());
    }
}
