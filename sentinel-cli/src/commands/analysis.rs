//! Analysis command handlers

use std::path::Path;

use anyhow::{Result, bail};
use colored::*;
use sentinel_core::domain::matching::{MatchResult, MatchStatus};
use sentinel_core::domain::session::Checkpoint;
use sentinel_core::domain::stats::SystemStats;
use sentinel_core::dto::session::AnalysisReport;

use super::session::print_stats;
use super::snapshot::{expand_paths, read_images};
use crate::api::ApiClient;

/// Run the analysis and print the report
pub async fn analyze(client: &ApiClient) -> Result<()> {
    println!("{}", "Running analysis...".dimmed());
    let report = client.run_analysis().await?;
    print_report(&report);
    Ok(())
}

/// Print results of the last analysis
pub async fn results(client: &ApiClient) -> Result<()> {
    let results = client.results().await?;

    if results.is_empty() {
        println!("{}", "No analysis results.".yellow());
        return Ok(());
    }

    print_results(&results);
    Ok(())
}

/// Clear, upload both batches, analyze and report
pub async fn audit(client: &ApiClient, entry: &Path, exit: &Path, keep: bool) -> Result<()> {
    if !keep {
        client.clear().await?;
        println!("{} Session cleared", "✓".green());
    }

    for (checkpoint, path) in [(Checkpoint::Entry, entry), (Checkpoint::Exit, exit)] {
        let files = expand_paths(&[path.to_path_buf()])?;
        if files.is_empty() {
            bail!("No images found for {} in {}", checkpoint, path.display());
        }

        let images = read_images(&files).await?;
        let summary = client.upload_snapshots(checkpoint, images).await?;
        println!(
            "{} Uploaded {} {} snapshot(s)",
            "✓".green(),
            summary.staged,
            checkpoint
        );
    }

    analyze(client).await
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{} Analysis {}: {} pair(s) processed",
        "✓".green(),
        report.status,
        report.results.len()
    );
    println!();

    if report.results.is_empty() {
        println!("{}", "Anomaly in AI Detection: no vehicles could be correlated.".red());
    } else {
        print_results(&report.results);
    }

    println!();
    print_stats(&report.stats);
    print_verdict(&report.stats);
}

fn print_results(results: &[MatchResult]) {
    println!("{}", "─".repeat(80).dimmed());
    for result in results {
        print_match(result);
    }
    println!("{}", "─".repeat(80).dimmed());
}

fn print_match(result: &MatchResult) {
    let headline = if result.is_mismatch() {
        "Security Breach Detected".red().bold()
    } else {
        "Identity Verified".green().bold()
    };

    println!(
        "  {} {} {} [{}]",
        "▸".cyan(),
        result.id.to_uppercase().dimmed(),
        headline,
        colorize_status(result.status)
    );
    println!(
        "    Entry {} → Exit {}",
        result.entry_snapshot_id.dimmed(),
        result.exit_snapshot_id.dimmed()
    );
    println!(
        "    Vehicle: {}  Driver: {}  Overall: {}",
        percent(result.vehicle_similarity),
        colorize_driver(result.driver_similarity),
        percent(result.overall_score)
    );
    if let Some(reason) = &result.reason {
        println!("    Analysis: {}", reason);
    }
    println!();
}

fn print_verdict(stats: &SystemStats) {
    if stats.mismatches_detected > 0 {
        println!(
            "{}",
            format!("⚠ {} theft alert(s) raised", stats.mismatches_detected)
                .red()
                .bold()
        );
    } else {
        println!("{}", "No theft alerts".green());
    }
}

/// Whole-number percentage
fn percent(score: f64) -> String {
    // halves round up, unlike `{:.0}`
    format!("{}%", (score * 100.0).round())
}

fn colorize_driver(score: f64) -> ColoredString {
    if score < 0.6 {
        percent(score).red()
    } else {
        percent(score).green()
    }
}

fn colorize_status(status: MatchStatus) -> ColoredString {
    match status {
        MatchStatus::Verified => status.as_str().green(),
        MatchStatus::Mismatch => status.as_str().red(),
        MatchStatus::Unknown => status.as_str().yellow(),
    }
}
