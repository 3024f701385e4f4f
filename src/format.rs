//! Display helpers shared by the TUI and the exports

use crate::data::Job;
use crate::nodes::PLACEHOLDER;
use chrono::{DateTime, Duration, Local, Utc};
use std::collections::HashMap;

/// `HH:MM:SS`, or `Nd HH:MM:SS` past a day; negative durations clamp to zero
pub fn format_duration(duration: Option<Duration>) -> String {
    let Some(duration) = duration else {
        return PLACEHOLDER.to_string();
    };
    let total = duration.num_seconds().max(0);
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, minutes, seconds) = (rest / 3600, (rest % 3600) / 60, rest % 60);
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Timestamp in the local timezone
pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(value) => value
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_bool(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "?",
    }
}

pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Blank or missing text becomes the placeholder
pub fn or_placeholder(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(PLACEHOLDER)
}

/// `k=v` pairs sorted by key
pub fn format_resources(resources: &HashMap<String, String>) -> String {
    if resources.is_empty() {
        return PLACEHOLDER.to_string();
    }
    let mut pairs: Vec<_> = resources.iter().collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Running jobs first, then by queue and id
pub fn sort_jobs_for_display(jobs: &[Job]) -> Vec<&Job> {
    let mut sorted: Vec<&Job> = jobs.iter().collect();
    sorted.sort_by(|a, b| {
        (!a.is_running(), &a.queue, &a.id).cmp(&(!b.is_running(), &b.queue, &b.id))
    });
    sorted
}
