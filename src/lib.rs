//! PBS Dash - live terminal dashboard over a PBS scheduler
//!
//! Shows jobs, compute nodes and queues from a scheduler snapshot as an
//! interactive view, a one-shot table or a Markdown report. The [`nodes`]
//! module resolves each job's free-form node strings into a node count and a
//! representative node.

pub mod app;
pub mod config;
pub mod data;
pub mod export;
pub mod format;
pub mod nodes;
pub mod samples;
pub mod source;
pub mod ui;

// Re-exports
pub use app::App;
pub use config::DashConfig;
pub use data::{Job, JobState, Node, Queue, SchedulerSnapshot};
pub use nodes::{job_node_summary, NodeFields, NodeSpecParser, NodeSummary};
pub use source::{SnapshotSource, SourceError};

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
