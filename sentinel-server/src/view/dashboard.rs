//! Dashboard page

use sentinel_core::domain::matching::resolve_pair;
use sentinel_core::domain::session::{Checkpoint, DetectionStatus};

use super::stat_card::{StatCard, Trend};
use super::{escape, layout, match_card};
use crate::repository::session_repository::Session;

/// Seconds between reloads while an analysis is running
pub const PROCESSING_REFRESH_SECS: u32 = 2;

/// Everything needed to render the page
pub struct DashboardPage<'a> {
    pub session: &'a Session,
    /// One-off message shown above the panels
    pub notice: Option<&'a str>,
}

pub fn render_dashboard(page: &DashboardPage<'_>) -> String {
    let session = page.session;
    let notice = page
        .notice
        .map(|msg| format!(r#"<div class="notice">{}</div>"#, escape(msg)))
        .unwrap_or_default();

    let body = format!(
        "{header}\n{notice}\n<main>\n<div>\n{acquisition}\n{output}\n</div>\n<div>\n{stats}\n{results}\n</div>\n</main>\n{footer}",
        header = header(session.status),
        notice = notice,
        acquisition = acquisition(session),
        output = pipeline_output(session),
        stats = stat_cards(session),
        results = results(session),
        footer = r#"<footer class="mono">Sentinel Engine v4.0.2</footer>"#,
    );

    let refresh = (session.status == DetectionStatus::Processing).then_some(PROCESSING_REFRESH_SECS);
    layout("SENTINEL | Vehicle Identity Verification", &body, refresh)
}

fn header(status: DetectionStatus) -> String {
    format!(
        r#"<header>
<div><h1>SENTINEL</h1><p class="tagline">Vehicle Identity Verification</p></div>
<div>
<span class="status"><span class="dot {status}"></span>{status}</span>
<form method="post" action="/dashboard/clear" style="display:inline"><button class="ghost" type="submit" title="Clear session">🗑</button></form>
</div>
</header>"#,
        status = status
    )
}

fn acquisition(session: &Session) -> String {
    let disabled = session.status == DetectionStatus::Processing
        || session.entry.is_empty()
        || session.exit.is_empty();
    let button = if session.status == DetectionStatus::Processing {
        "Processing Deep Vision..."
    } else {
        "Run Forensic Analysis"
    };

    format!(
        r#"<section>
<p class="panel-title">Data Acquisition</p>
{entry}
{exit}
<form method="post" action="/dashboard/analyze"><button class="analyze" type="submit"{disabled}>{button}</button></form>
</section>"#,
        entry = upload_form(Checkpoint::Entry, session.entry.len()),
        exit = upload_form(Checkpoint::Exit, session.exit.len()),
        disabled = if disabled { " disabled" } else { "" },
        button = button,
    )
}

fn upload_form(checkpoint: Checkpoint, staged: usize) -> String {
    let label = match checkpoint {
        Checkpoint::Entry => "Entry Camera Feed (Batch)",
        Checkpoint::Exit => "Exit Camera Feed (Batch)",
    };
    let note = if staged > 0 {
        format!(
            r#"<p class="staged {}">&gt; {} files staged for analysis</p>"#,
            checkpoint, staged
        )
    } else {
        String::new()
    };

    format!(
        r#"<form method="post" action="/dashboard/upload/{checkpoint}" enctype="multipart/form-data">
<p class="label">{label}</p>
<input type="file" name="files" accept="image/*" multiple>
<button type="submit">Upload</button>
</form>
{note}"#,
        checkpoint = checkpoint,
        label = label,
        note = note,
    )
}

fn pipeline_output(session: &Session) -> String {
    let entries = session.log.entries();
    let lines = if entries.is_empty() {
        r#"<div class="empty">Waiting for input signals...</div>"#.to_string()
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    r#"<div{}>{}</div>"#,
                    if i == 0 { r#" class="latest""# } else { "" },
                    escape(&entry.display_line())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<section><p class="panel-title">Pipeline Output</p><div class="log mono">{}</div></section>"#,
        lines
    )
}

fn stat_cards(session: &Session) -> String {
    let stats = session.stats();
    let cards = [
        StatCard::new("Total Captures", stats.total_detections, "▦"),
        StatCard::new("Verified Identity", stats.verified_matches, "✔").with_trend(Trend::up(12)),
        StatCard::new("Theft Alerts", stats.mismatches_detected, "⚠").with_trend(Trend::down(2)),
        StatCard::new(
            "AI Inference Latency",
            format!("{}s", stats.average_processing_time),
            "⏱",
        ),
    ];

    format!(
        r#"<div class="stats">{}</div>"#,
        cards.iter().map(StatCard::render).collect::<String>()
    )
}

fn results(session: &Session) -> String {
    let count = if session.results.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="count">{} pairs processed</span>"#,
            session.results.len()
        )
    };
    let heading = format!("<h2>Analysis Results{}</h2>", count);

    let content = match session.status {
        DetectionStatus::Idle => r#"<div class="empty-state"><p>No active analysis session.</p><p>Upload entry and exit snapshots to begin forensics.</p></div>"#.to_string(),
        DetectionStatus::Processing => {
            r#"<div class="results"><div class="placeholder"></div><div class="placeholder"></div></div>"#.to_string()
        }
        DetectionStatus::Completed if session.results.is_empty() => r#"<div class="anomaly"><p><strong>Anomaly in AI Detection</strong></p><p>The system was unable to correlate vehicles between entry and exit points. Verify image quality and alignment.</p></div>"#.to_string(),
        DetectionStatus::Completed => {
            let cards = session
                .results
                .iter()
                .filter_map(|result| {
                    resolve_pair(result, &session.entry, &session.exit)
                        .map(|(entry, exit)| match_card::render(result, entry, exit))
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(r#"<div class="results">{}</div>"#, cards)
        }
        DetectionStatus::Error => r#"<div class="failure"><p><strong>Analysis Failed</strong></p><p>The AI analysis pipeline did not return a result. Check the pipeline output and try again.</p></div>"#.to_string(),
    };

    format!("<div>{}\n{}</div>", heading, content)
}
