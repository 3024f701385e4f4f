//! Scheduler snapshot model - jobs, nodes and queues

use crate::nodes::{self, NodeFields, NodeSummary};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// PBS job state codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Begun,
    Exiting,
    Finished,
    Held,
    Queued,
    Running,
    Suspended,
    Transit,
    Waiting,
}

impl JobState {
    /// Parse a single-letter state code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "B" => Some(Self::Begun),
            "E" => Some(Self::Exiting),
            "F" => Some(Self::Finished),
            "H" => Some(Self::Held),
            "Q" => Some(Self::Queued),
            "R" => Some(Self::Running),
            "S" => Some(Self::Suspended),
            "T" => Some(Self::Transit),
            "W" => Some(Self::Waiting),
            _ => None,
        }
    }

    /// Human-readable label for a state code, the code itself if unknown
    pub fn label(code: &str) -> String {
        Self::from_code(code)
            .map(|state| state.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begun => write!(f, "Begun"),
            Self::Exiting => write!(f, "Exiting"),
            Self::Finished => write!(f, "Finished"),
            Self::Held => write!(f, "Held"),
            Self::Queued => write!(f, "Queued"),
            Self::Running => write!(f, "Running"),
            Self::Suspended => write!(f, "Suspended"),
            Self::Transit => write!(f, "Transit"),
            Self::Waiting => write!(f, "Waiting"),
        }
    }
}

/// A batch job as reported by `qstat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub user: String,
    pub queue: String,
    /// Single-letter PBS state code
    pub state: String,
    #[serde(default)]
    pub exec_host: Option<String>,
    #[serde(default)]
    pub nodes: Option<String>,
    #[serde(default)]
    pub walltime: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub exit_status: Option<String>,
    #[serde(default)]
    pub resources_requested: HashMap<String, String>,
    #[serde(default)]
    pub resources_used: HashMap<String, String>,
}

impl Job {
    /// Minimal job; remaining fields are filled in by the caller
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        user: impl Into<String>,
        queue: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            user: user.into(),
            queue: queue.into(),
            state: state.into(),
            exec_host: None,
            nodes: None,
            walltime: None,
            create_time: None,
            start_time: None,
            end_time: None,
            comment: None,
            exit_status: None,
            resources_requested: HashMap::new(),
            resources_used: HashMap::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        JobState::from_code(&self.state) == Some(JobState::Running)
    }

    /// Elapsed run time up to `end_time` or `reference`, never negative
    pub fn runtime(&self, reference: DateTime<Utc>) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or(reference);
        Some((end - start).max(Duration::zero()))
    }

    pub fn node_summary(&self) -> NodeSummary {
        nodes::job_node_summary(self)
    }
}

impl NodeFields for Job {
    fn exec_host(&self) -> Option<&str> {
        self.exec_host.as_deref()
    }

    fn requested_nodes(&self) -> Option<&str> {
        self.nodes.as_deref()
    }

    fn requested_resources(&self) -> &HashMap<String, String> {
        &self.resources_requested
    }
}

/// A compute node as reported by `pbsnodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub np: Option<u32>,
    #[serde(default)]
    pub ncpus: Option<u32>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub resources_available: HashMap<String, String>,
    #[serde(default)]
    pub resources_assigned: HashMap<String, String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            np: None,
            ncpus: None,
            properties: Vec::new(),
            jobs: Vec::new(),
            resources_available: HashMap::new(),
            resources_assigned: HashMap::new(),
            comment: None,
        }
    }

    /// First component of a compound state such as `offline,down`
    pub fn primary_state(&self) -> &str {
        match self.state.split(',').next().map(str::trim) {
            Some(state) if !state.is_empty() => state,
            _ => "unknown",
        }
    }
}

/// A queue as reported by `qstat -Q`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    pub name: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub total_jobs: Option<u32>,
    /// Job count per state code
    #[serde(default)]
    pub job_states: HashMap<String, u32>,
    #[serde(default)]
    pub resources_default: HashMap<String, String>,
    #[serde(default)]
    pub resources_max: HashMap<String, String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Queue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: None,
            started: None,
            total_jobs: None,
            job_states: HashMap::new(),
            resources_default: HashMap::new(),
            resources_max: HashMap::new(),
            comment: None,
        }
    }

    fn state_total(&self, codes: &[&str]) -> u32 {
        codes
            .iter()
            .filter_map(|code| self.job_states.get(*code))
            .fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Queued, waiting and in-transit jobs
    pub fn queued(&self) -> u32 {
        self.state_total(&["Q", "W", "T"])
    }

    pub fn running(&self) -> u32 {
        self.state_total(&["R"])
    }

    /// Held and suspended jobs
    pub fn held(&self) -> u32 {
        self.state_total(&["H", "S"])
    }
}

/// Everything known about the scheduler at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub queues: Vec<Queue>,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    /// Non-fatal problems encountered while collecting the snapshot
    #[serde(default)]
    pub errors: Vec<String>,
}

impl SchedulerSnapshot {
    pub fn empty(source: impl Into<String>) -> Self {
        Self {
            jobs: Vec::new(),
            nodes: Vec::new(),
            queues: Vec::new(),
            timestamp: Utc::now(),
            source: source.into(),
            errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.nodes.is_empty() && self.queues.is_empty()
    }

    /// Job count per state label, sorted by label
    pub fn job_state_counts(&self) -> Vec<(String, usize)> {
        count_sorted(self.jobs.iter().map(|job| JobState::label(&job.state)))
    }

    /// Node count per primary state, sorted by state
    pub fn node_state_counts(&self) -> Vec<(String, usize)> {
        count_sorted(self.nodes.iter().map(|node| node.primary_state().to_string()))
    }
}

fn count_sorted(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort();
    counts
}
