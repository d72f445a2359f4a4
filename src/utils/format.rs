/// Compact number for axis labels and summaries: `950`, `12.3K`, `4.5M`, `1.2B`.
///
/// The unit is picked after rounding, so `999_950` is `1.0M` rather than `1000.0K`.
pub fn format_number(value: f64) -> String {
    let whole = value.round();
    if whole.abs() < 1_000.0 {
        return format!("{:.0}", whole);
    }
    for (divisor, suffix) in [(1_000.0, "K"), (1_000_000.0, "M")] {
        let scaled = (value / divisor * 10.0).round() / 10.0;
        if scaled.abs() < 1_000.0 {
            return format!("{:.1}{}", scaled, suffix);
        }
    }
    format!("{:.1}B", (value / 1_000_000_000.0 * 10.0).round() / 10.0)
}

/// `m:ss` below an hour, `h:mm:ss` from an hour on.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`; anything else is returned unchanged.
pub fn format_day_label(date: &str) -> String {
    match date.split('-').collect::<Vec<_>>().as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => date.to_string(),
    }
}
