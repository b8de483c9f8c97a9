//! Plain-text rendering for terminals and logs.

use crate::locale::Locale;
use crate::model::Recommendation;
use crate::model::Severity;
use crate::summary::Summary;

/// Badge shown next to a recommendation title.
pub fn badge(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    }
}

/// One block per recommendation: badge and title, details, then one line
/// per suggested action.
pub fn recommendations(recs: &[Recommendation], locale: Locale) -> String {
    if recs.is_empty() {
        return format!("{}\n", locale.no_recommendations());
    }

    let mut out = String::new();
    for (idx, rec) in recs.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{}] {}\n", badge(rec.severity), rec.title));
        out.push_str(&format!("  {}\n", rec.details));
        for action in &rec.actions {
            out.push_str(&format!("  -> {}\n", action.label()));
        }
    }
    out
}

pub fn summary(summary: &Summary) -> String {
    let mut out = format!(
        "Devices: {}/{} on ({}%)\n",
        summary.active_devices, summary.total_devices, summary.active_percentage
    );

    match summary.current_kw {
        Some(kw) => out.push_str(&format!("Consumption: {} kW\n", kw)),
        None => out.push_str("Consumption: n/a\n"),
    }

    out.push_str(&format!(
        "Security: {} active sensor(s), {} unacknowledged alert(s)\n",
        summary.active_sensors, summary.unacknowledged_alerts
    ));

    if !summary.devices_by_room.is_empty() {
        out.push_str("Rooms:\n");
        for group in &summary.devices_by_room {
            out.push_str(&format!("  {}: {}\n", group.room, group.devices.join(", ")));
        }
    }

    if !summary.batteries.is_empty() {
        out.push_str("Batteries:\n");
        for sensor in &summary.batteries {
            out.push_str(&format!(
                "  {}: {}% ({})\n",
                sensor.name, sensor.battery, sensor.level
            ));
        }
    }

    out
}
