//! One-shot exports: aligned text table and Markdown report

use crate::data::{Job, JobState, SchedulerSnapshot};
use crate::format::{format_duration, or_placeholder, sort_jobs_for_display};
use crate::nodes::PLACEHOLDER;
use chrono::{DateTime, Local, Utc};

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Job table columns shared by every job listing
pub const JOB_COLUMNS: [(&str, Align); 9] = [
    ("Job ID", Align::Left),
    ("Name", Align::Left),
    ("User", Align::Left),
    ("Queue", Align::Left),
    ("State", Align::Left),
    ("Nodes", Align::Right),
    ("First Node", Align::Left),
    ("Walltime", Align::Left),
    ("Runtime", Align::Left),
];

/// Cell values of one job row, in [`JOB_COLUMNS`] order
pub fn job_row(job: &Job, reference: DateTime<Utc>) -> Vec<String> {
    let summary = job.node_summary();
    vec![
        or_placeholder(Some(job.id.as_str())).to_string(),
        or_placeholder(Some(job.name.as_str())).to_string(),
        or_placeholder(Some(job.user.as_str())).to_string(),
        or_placeholder(Some(job.queue.as_str())).to_string(),
        JobState::label(&job.state),
        summary.count_label(),
        summary.first_node_label().to_string(),
        or_placeholder(job.walltime.as_deref()).to_string(),
        format_duration(job.runtime(reference)),
    ]
}

fn title(snapshot: &SchedulerSnapshot) -> String {
    format!(
        "PBS Jobs as of {}",
        snapshot
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %Z")
    )
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text, width = width),
        Align::Right => format!("{:>width$}", text, width = width),
    }
}

/// Aligned plain-text table of the snapshot's jobs
pub fn snapshot_to_table(snapshot: &SchedulerSnapshot) -> String {
    let rows: Vec<Vec<String>> = sort_jobs_for_display(&snapshot.jobs)
        .into_iter()
        .map(|job| job_row(job, snapshot.timestamp))
        .collect();

    let mut widths: Vec<usize> = JOB_COLUMNS
        .iter()
        .map(|(header, _)| header.chars().count())
        .collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .zip(JOB_COLUMNS.iter())
            .map(|((cell, width), (_, align))| pad(cell, *width, *align))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![title(snapshot), String::new()];
    lines.push(render(
        JOB_COLUMNS.iter().map(|(header, _)| header.to_string()).collect(),
    ));
    lines.push(render(widths.iter().map(|w| "-".repeat(*w)).collect()));
    if rows.is_empty() {
        lines.push("No jobs available".to_string());
    } else {
        lines.extend(rows.into_iter().map(render));
    }
    lines.push(String::new());
    lines.push(format!("Source: {}", snapshot.source));
    lines.join("\n")
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
        .trim()
        .to_string()
}

fn markdown_cell(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        escape_markdown_cell(value)
    }
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Markdown report of the snapshot's jobs
pub fn snapshot_to_markdown(snapshot: &SchedulerSnapshot) -> String {
    let headers: Vec<String> = JOB_COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
    let mut lines = vec![
        format!("### {}", title(snapshot)),
        format!("*Source*: {}", snapshot.source),
        String::new(),
        markdown_row(&headers),
        markdown_row(&vec!["---".to_string(); headers.len()]),
    ];

    if snapshot.jobs.is_empty() {
        let mut empty = vec![String::new(); headers.len()];
        empty[0] = "_No jobs available_".to_string();
        lines.push(markdown_row(&empty));
    } else {
        for job in sort_jobs_for_display(&snapshot.jobs) {
            let cells: Vec<String> = job_row(job, snapshot.timestamp)
                .iter()
                .map(|cell| markdown_cell(cell))
                .collect();
            lines.push(markdown_row(&cells));
        }
    }

    if !snapshot.errors.is_empty() {
        lines.push(String::new());
        lines.extend(snapshot.errors.iter().map(|error| format!("> {}", error)));
    }
    lines.join("\n")
}
