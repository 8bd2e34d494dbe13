//! Session command handlers

use anyhow::Result;
use colored::*;
use sentinel_core::domain::log::{LogEntry, LogLevel};
use sentinel_core::domain::session::DetectionStatus;
use sentinel_core::domain::stats::SystemStats;

use crate::api::ApiClient;

/// Show the session overview
pub async fn status(client: &ApiClient) -> Result<()> {
    let summary = client.session().await?;

    println!("{}", "Session:".bold());
    println!("  Status:      {}", colorize_status(summary.status));
    println!("  Entry:       {} snapshot(s)", summary.entry_count);
    println!("  Exit:        {} snapshot(s)", summary.exit_count);
    println!("  Results:     {}", summary.result_count);
    if let Some(ms) = summary.last_analysis_ms {
        println!("  Last run:    {:.1}s", ms as f64 / 1000.0);
    }

    Ok(())
}

pub async fn stats(client: &ApiClient) -> Result<()> {
    let stats = client.stats().await?;
    print_stats(&stats);
    Ok(())
}

/// Print pipeline output, oldest line last as on the dashboard
pub async fn logs(client: &ApiClient) -> Result<()> {
    let logs = client.logs().await?;

    if logs.is_empty() {
        println!("{}", "Waiting for input signals...".dimmed());
        return Ok(());
    }

    println!("{}", "Pipeline output:".bold());
    println!("{}", "─".repeat(80).dimmed());
    for log in logs {
        print_log_entry(&log);
    }
    println!("{}", "─".repeat(80).dimmed());

    Ok(())
}

pub async fn clear(client: &ApiClient) -> Result<()> {
    client.clear().await?;
    println!("{} Session cleared", "✓".green());
    Ok(())
}

pub fn print_stats(stats: &SystemStats) {
    println!("{}", "Statistics:".bold());
    println!("  Total Captures:       {}", stats.total_detections);
    println!(
        "  Verified Identity:    {}",
        stats.verified_matches.to_string().green()
    );
    println!(
        "  Theft Alerts:         {}",
        stats.mismatches_detected.to_string().red()
    );
    println!(
        "  AI Inference Latency: {}s",
        stats.average_processing_time
    );
}

fn print_log_entry(log: &LogEntry) {
    let level_str = format!("{:?}", log.level).to_uppercase();
    let level_colored = match log.level {
        LogLevel::Debug => level_str.dimmed(),
        LogLevel::Info => level_str.cyan(),
        LogLevel::Warning => level_str.yellow(),
        LogLevel::Error => level_str.red(),
    };

    println!(
        "{} [{}] {}",
        log.timestamp.format("%H:%M:%S").to_string().dimmed(),
        level_colored,
        log.message
    );
}

fn colorize_status(status: DetectionStatus) -> ColoredString {
    let status_str = status.as_str();
    match status {
        DetectionStatus::Idle => status_str.dimmed(),
        DetectionStatus::Processing => status_str.yellow(),
        DetectionStatus::Completed => status_str.green(),
        DetectionStatus::Error => status_str.red(),
    }
}
