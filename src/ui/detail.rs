//! Label/value rows for the detail panel

use crate::data::{Job, JobState, Node, Queue};
use crate::format::{
    format_bool, format_datetime, format_duration, format_optional, format_resources,
    or_placeholder,
};
use chrono::{DateTime, Utc};

pub type DetailRows = Vec<(&'static str, String)>;

pub fn job_details(job: &Job, reference: DateTime<Utc>) -> DetailRows {
    let summary = job.node_summary();
    let mut rows = vec![
        ("Job ID", job.id.clone()),
        ("Name", job.name.clone()),
        ("User", job.user.clone()),
        ("Queue", job.queue.clone()),
        ("State", JobState::label(&job.state)),
        ("Nodes", summary.count_label()),
        ("First node", summary.first_node_label().to_string()),
        ("Exec host", or_placeholder(job.exec_host.as_deref()).to_string()),
        ("Node spec", or_placeholder(job.nodes.as_deref()).to_string()),
        ("Submitted", format_datetime(job.create_time)),
        ("Started", format_datetime(job.start_time)),
        ("Finished", format_datetime(job.end_time)),
        ("Runtime", format_duration(job.runtime(reference))),
        ("Requested", format_resources(&job.resources_requested)),
    ];
    if !job.resources_used.is_empty() {
        rows.push(("Used", format_resources(&job.resources_used)));
    }
    rows.extend([
        ("Walltime", or_placeholder(job.walltime.as_deref()).to_string()),
        ("Comment", or_placeholder(job.comment.as_deref()).to_string()),
        ("Exit status", or_placeholder(job.exit_status.as_deref()).to_string()),
    ]);
    rows
}

pub fn node_details(node: &Node) -> DetailRows {
    let mut rows = vec![
        ("Node", node.name.clone()),
        ("State", node.state.clone()),
        ("NP", format_optional(node.np)),
        ("CPUs", format_optional(node.ncpus)),
        ("Properties", or_placeholder(Some(node.properties.join(", ").as_str())).to_string()),
        ("Jobs", or_placeholder(Some(node.jobs.join(", ").as_str())).to_string()),
    ];
    if !node.resources_available.is_empty() {
        rows.push(("Available", format_resources(&node.resources_available)));
    }
    if !node.resources_assigned.is_empty() {
        rows.push(("Assigned", format_resources(&node.resources_assigned)));
    }
    rows.push(("Comment", or_placeholder(node.comment.as_deref()).to_string()));
    rows
}

pub fn queue_details(queue: &Queue) -> DetailRows {
    let mut rows = vec![
        ("Queue", queue.name.clone()),
        ("Enabled", format_bool(queue.enabled).to_string()),
        ("Started", format_bool(queue.started).to_string()),
        ("Total jobs", format_optional(queue.total_jobs)),
    ];
    if !queue.job_states.is_empty() {
        let mut states: Vec<_> = queue.job_states.iter().collect();
        states.sort();
        let states = states
            .iter()
            .map(|(state, count)| format!("{}={}", JobState::label(state), count))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(("States", states));
    }
    if !queue.resources_default.is_empty() {
        rows.push(("Default", format_resources(&queue.resources_default)));
    }
    if !queue.resources_max.is_empty() {
        rows.push(("Max", format_resources(&queue.resources_max)));
    }
    rows.push(("Comment", or_placeholder(queue.comment.as_deref()).to_string()));
    rows
}
