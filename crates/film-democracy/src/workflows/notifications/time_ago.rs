use chrono::{DateTime, Utc};

const PERIODS: [(&str, i64); 5] = [
    ("year", 60 * 60 * 24 * 365),
    ("day", 60 * 60 * 24),
    ("hour", 60 * 60),
    ("minute", 60),
    ("second", 1),
];

/// Human age of an event relative to `now`, in the largest unit strictly exceeded.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();

    PERIODS
        .iter()
        .find(|(_, period)| seconds > *period)
        .map(|(name, period)| {
            let value = seconds / period;
            let plural = if value > 1 { "s" } else { "" };
            format!("{value} {name}{plural}")
        })
        .unwrap_or_else(|| "just now".to_string())
}
