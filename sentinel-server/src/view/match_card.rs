//! Match card

use sentinel_core::domain::matching::MatchResult;
use sentinel_core::domain::snapshot::Snapshot;

use super::{escape, percent};

/// Driver similarity below this is shown in the alert colour
pub const DRIVER_ALERT_THRESHOLD: f64 = 0.6;

pub fn render(result: &MatchResult, entry: &Snapshot, exit: &Snapshot) -> String {
    let mismatch = result.is_mismatch();
    let (class, title, icon) = if mismatch {
        ("card mismatch", "Security Breach Detected", "⚠")
    } else {
        ("card", "Identity Verified", "✔")
    };
    let driver_class = if result.driver_similarity < DRIVER_ALERT_THRESHOLD {
        "alert"
    } else {
        "ok"
    };

    let reason = result
        .reason
        .as_deref()
        .map(|reason| {
            format!(
                r#"<div class="reason"><span class="label">Analysis:</span> {}</div>"#,
                escape(reason)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="{class}">
<div class="card-head"><div><h4>{icon} {title}</h4><p class="mono">ID: {id}</p></div><span class="badge">{status}</span></div>
<div class="shots">
{entry}
{exit}
</div>
<div class="scores">
<div class="score"><span class="label">Vehicle</span><p class="vehicle">{vehicle}</p></div>
<div class="score"><span class="label">Driver</span><p class="{driver_class}">{driver}</p></div>
<div class="score"><span class="label">Overall</span><p>{overall}</p></div>
</div>
{reason}
</div>"#,
        class = class,
        icon = icon,
        title = title,
        id = escape(&result.id.to_uppercase()),
        status = result.status,
        entry = shot("Entry Snapshot", "IN", entry),
        exit = shot("Exit Snapshot", "OUT", exit),
        vehicle = percent(result.vehicle_similarity),
        driver_class = driver_class,
        driver = percent(result.driver_similarity),
        overall = percent(result.overall_score),
        reason = reason,
    )
}

fn shot(label: &str, tag: &str, snapshot: &Snapshot) -> String {
    format!(
        r#"<div><p class="label">{}</p><div class="shot"><img src="{}" alt="{}"><span class="mono">{}: {}</span></div></div>"#,
        label,
        escape(&snapshot.image_url),
        escape(&snapshot.id),
        tag,
        snapshot.timestamp.format("%H:%M:%S")
    )
}
