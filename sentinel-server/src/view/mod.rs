//! Server-rendered dashboard
//!
//! Plain string rendering. Every interpolated value goes through [`escape`].

pub mod dashboard;
pub mod match_card;
pub mod stat_card;

pub use dashboard::{DashboardPage, render_dashboard};

/// Escape text for HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a score in `0..=1` as a whole percentage
pub fn percent(score: f64) -> String {
    // halves round up, unlike `{:.0}`
    format!("{}%", (score * 100.0).round())
}

/// Wrap a body in the page shell
///
/// `refresh` adds a meta refresh, used while an analysis is running.
pub fn layout(title: &str, body: &str, refresh: Option<u32>) -> String {
    let refresh = refresh
        .map(|secs| format!(r#"<meta http-equiv="refresh" content="{}">"#, secs))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        refresh = refresh,
        title = escape(title),
        STYLE = STYLE,
        body = body,
    )
}

const STYLE: &str = r#"
body{margin:0;background:#020617;color:#e2e8f0;font-family:system-ui,sans-serif}
.mono{font-family:ui-monospace,monospace}
header{display:flex;justify-content:space-between;align-items:center;padding:16px 24px;border-bottom:1px solid #1e293b;background:#020617cc}
header h1{margin:0;font-size:20px}
header .tagline{margin:0;font-size:10px;color:#818cf8;font-weight:700;letter-spacing:.2em;text-transform:uppercase}
.status{display:inline-flex;align-items:center;gap:8px;padding:6px 12px;border-radius:8px;background:#0f172a;border:1px solid #1e293b;font-size:12px;text-transform:capitalize}
.dot{width:8px;height:8px;border-radius:50%;background:#10b981}
.dot.processing{background:#f59e0b}
.dot.error{background:#f43f5e}
main{display:grid;grid-template-columns:minmax(280px,1fr) 2fr;gap:32px;padding:32px;max-width:1600px;margin:0 auto}
section,.panel{background:#0f172a80;border:1px solid #1e293b;border-radius:16px;padding:20px;margin-bottom:24px}
.panel-title{font-size:12px;font-weight:700;text-transform:uppercase;letter-spacing:.1em;color:#94a3b8;margin:0 0 16px}
.staged{font-size:10px;padding:8px;border-radius:4px;background:#34d3990d;color:#34d399}
.staged.exit{color:#fb7185;background:#fb71850d}
button{cursor:pointer;border:0;border-radius:12px;padding:12px 16px;font-weight:700;background:#4f46e5;color:#fff}
button:disabled{background:#1e293b;color:#64748b;cursor:not-allowed}
button.ghost{background:transparent;color:#94a3b8;padding:8px}
.analyze{width:100%;padding:16px}
.log{font-size:11px;background:#00000066;padding:12px;border-radius:8px;min-height:120px}
.log div{color:#64748b;margin-bottom:6px}
.log div.latest{color:#818cf8;font-weight:700}
.log .empty{color:#334155;font-style:italic}
.stats{display:grid;grid-template-columns:repeat(4,1fr);gap:16px;margin-bottom:32px}
.stat{background:#0f172a;border:1px solid #1e293b;border-radius:12px;padding:20px}
.stat-head{display:flex;justify-content:space-between;color:#94a3b8;font-size:14px}
.stat-value{font-size:24px;font-weight:700;margin:12px 0 0}
.trend{font-size:12px;font-weight:600;margin-left:8px}
.up{color:#34d399}
.down{color:#fb7185}
.results{display:grid;grid-template-columns:repeat(2,1fr);gap:24px}
.count{font-size:12px;background:#1e293b;color:#94a3b8;padding:4px 8px;border-radius:999px;margin-left:12px}
.card{background:#0f172a;border:1px solid #1e293b;border-radius:16px;padding:24px}
.card.mismatch{border-color:#f43f5e80;border-top:4px solid #f43f5e}
.card-head{display:flex;justify-content:space-between;align-items:center;margin-bottom:24px}
.card-head h4{margin:0}
.card-head p{margin:4px 0 0;font-size:12px;color:#94a3b8}
.badge{padding:4px 12px;border-radius:999px;font-size:10px;font-weight:700;letter-spacing:.1em;background:#10b98133;color:#34d399}
.mismatch .badge{background:#f43f5e;color:#fff}
.shots{display:grid;grid-template-columns:1fr 1fr;gap:16px;margin-bottom:24px}
.shot{position:relative;aspect-ratio:16/9;background:#000;border:1px solid #1e293b;border-radius:8px;overflow:hidden}
.shot img{width:100%;height:100%;object-fit:cover}
.shot span{position:absolute;left:8px;bottom:8px;font-size:10px;background:#00000099;padding:2px 6px;border-radius:4px}
.label{font-size:10px;font-weight:700;text-transform:uppercase;color:#64748b;letter-spacing:.15em}
.scores{display:grid;grid-template-columns:repeat(3,1fr);gap:12px}
.score{background:#02061780;border:1px solid #1e293b80;border-radius:12px;padding:12px}
.score p{margin:4px 0 0;font-size:18px;font-weight:700}
.vehicle{color:#818cf8}
.alert{color:#fb7185}
.ok{color:#34d399}
.reason{margin-top:16px;padding:12px;border-radius:8px;font-size:12px;background:#020617;color:#94a3b8}
.mismatch .reason{background:#f43f5e1a;color:#fda4af;border:1px solid #f43f5e33}
.placeholder{height:384px;background:#0f172a80;border:1px solid #1e293b;border-radius:16px}
.empty-state{text-align:center;padding:96px 24px;border:1px dashed #1e293b;border-radius:24px;color:#64748b}
.anomaly,.failure{text-align:center;padding:80px 24px;border:1px solid #f43f5e33;border-radius:24px;background:#f43f5e0d;color:#fb7185}
.notice{margin:16px 32px 0;padding:12px 16px;border-radius:12px;background:#f59e0b1a;border:1px solid #f59e0b4d;color:#fbbf24}
footer{padding:12px 24px;border-top:1px solid #0f172a;font-size:10px;color:#64748b;text-transform:uppercase;letter-spacing:.15em}
"#;
