//! Bundled demo data shown when no scheduler snapshot is available

use crate::data::{Job, Node, Queue, SchedulerSnapshot};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A representative snapshot with a few jobs, nodes and queues
pub fn sample_snapshot(now: DateTime<Utc>) -> SchedulerSnapshot {
    let mut climate = Job::new("104829.aqua", "climate_model", "aurora", "prod", "R");
    climate.exec_host = Some("nid000001/0*128+nid000002/0*128".into());
    climate.create_time = Some(now - Duration::minutes(3 * 60 + 15));
    climate.start_time = Some(now - Duration::minutes(2 * 60 + 5));
    climate.walltime = Some("04:00:00".into());
    climate.nodes = Some("2:ppn=128".into());
    climate.resources_requested = map(&[
        ("nodes", "2:ppn=128"),
        ("walltime", "04:00:00"),
        ("select", "2:ncpus=128"),
    ]);
    climate.resources_used = map(&[
        ("walltime", "02:05:11"),
        ("cput", "04:10:22"),
        ("mem", "1200gb"),
    ]);

    let mut analysis = Job::new("104830.aqua", "fom_analysis", "zenith", "prod", "Q");
    analysis.create_time = Some(now - Duration::minutes(45));
    analysis.walltime = Some("01:00:00".into());
    analysis.nodes = Some("nid[000010-000011]:ppn=64".into());
    analysis.resources_requested = map(&[
        ("nodes", "nid[000010-000011]:ppn=64"),
        ("walltime", "01:00:00"),
    ]);

    let mut debug = Job::new("104731.vesta", "vis_debug", "lattice", "debug", "H");
    debug.create_time = Some(now - Duration::minutes(80));
    debug.walltime = Some("00:30:00".into());
    debug.resources_requested = map(&[("select", "1:ncpus=32"), ("walltime", "00:30:00")]);
    debug.comment = Some("Awaiting data set availability".into());

    let mut busy = Node::new("nid000001", "job-exclusive");
    busy.ncpus = Some(128);
    busy.properties = strings(&["has_ssd", "zen4"]);
    busy.jobs = strings(&["0/104829.aqua"]);
    busy.resources_available = map(&[("ncpus", "128"), ("ngpus", "4"), ("mem", "512gb")]);
    busy.resources_assigned = map(&[("ncpus", "128"), ("mem", "480gb")]);

    let mut free = Node::new("nid000002", "free");
    free.ncpus = Some(128);
    free.properties = strings(&["zen4"]);
    free.resources_available = map(&[("ncpus", "128"), ("ngpus", "4"), ("mem", "512gb")]);

    let mut down = Node::new("nid000010", "offline,down");
    down.ncpus = Some(128);
    down.properties = strings(&["zen4", "maintenance"]);
    down.comment = Some("File system diagnostics in progress".into());
    down.resources_available = map(&[("ncpus", "128"), ("ngpus", "4"), ("mem", "512gb")]);

    let mut prod = Queue::new("prod");
    prod.enabled = Some(true);
    prod.started = Some(true);
    prod.total_jobs = Some(2);
    prod.job_states = [("R".to_string(), 1), ("Q".to_string(), 1)].into();
    prod.resources_default = map(&[("walltime", "02:00:00")]);
    prod.resources_max = map(&[("walltime", "24:00:00")]);
    prod.comment = Some("Production queue for capability jobs".into());

    let mut debug_queue = Queue::new("debug");
    debug_queue.enabled = Some(true);
    debug_queue.started = Some(true);
    debug_queue.total_jobs = Some(1);
    debug_queue.job_states = [("H".to_string(), 1)].into();
    debug_queue.resources_default = map(&[("walltime", "00:30:00")]);
    debug_queue.comment = Some("Interactive debugging queue".into());

    let mut paused = Queue::new("analysis");
    paused.enabled = Some(false);
    paused.started = Some(false);
    paused.total_jobs = Some(0);
    paused.comment = Some("Queue paused for scheduled maintenance".into());

    SchedulerSnapshot {
        jobs: vec![climate, analysis, debug],
        nodes: vec![busy, free, down],
        queues: vec![prod, debug_queue, paused],
        timestamp: now,
        source: "sample".to_string(),
        errors: vec![
            "Displaying bundled sample data because no scheduler snapshot was provided."
                .to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_snapshot_shape() {
        let now = Utc::now();
        let snapshot = sample_snapshot(now);
        assert_eq!(snapshot.source, "sample");
        assert_eq!(snapshot.timestamp, now);
        assert_eq!(snapshot.jobs.len(), 3);
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.queues.len(), 3);
        assert_eq!(snapshot.errors.len(), 1);
    }

    #[test]
    fn test_sample_node_summaries() {
        let snapshot = sample_snapshot(Utc::now());
        let summaries: Vec<_> = snapshot
            .jobs
            .iter()
            .map(|job| {
                let summary = job.node_summary();
                (summary.count, summary.first_node)
            })
            .collect();
        assert_eq!(
            summaries,
            vec![
                (Some(2), Some("nid000001".to_string())),
                (Some(2), Some("nid000010".to_string())),
                (Some(1), None),
            ]
        );
    }
}
