//! Node count / first node resolution for a job

use super::NodeSpecParser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder shown for an absent summary field
pub const PLACEHOLDER: &str = "-";

/// The fields of a job record that describe its node placement
pub trait NodeFields {
    /// `exec_host`: hosts the job actually occupies
    fn exec_host(&self) -> Option<&str>;

    /// `nodes`: what the job asked for
    fn requested_nodes(&self) -> Option<&str>;

    /// `Resource_List` entries (`nodes`, `select`, `nodect`, ...)
    fn requested_resources(&self) -> &HashMap<String, String>;
}

/// Resolved node count and representative node of a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub count: Option<usize>,
    pub first_node: Option<String>,
}

impl NodeSummary {
    pub fn new(count: Option<usize>, first_node: Option<String>) -> Self {
        Self { count, first_node }
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.first_node.is_none()
    }

    pub fn count_label(&self) -> String {
        self.count
            .map(|count| count.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn first_node_label(&self) -> &str {
        self.first_node.as_deref().unwrap_or(PLACEHOLDER)
    }
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.first_node {
            Some(node) => write!(f, "{} ({})", self.count_label(), node),
            None => write!(f, "{}", self.count_label()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl NodeSpecParser {
    /// Resolve a job's node count and first node.
    ///
    /// Sources are tried in order and the first one that yields a count wins:
    /// 1. `exec_host`, which reflects the actual assignment
    /// 2. the requested `nodes` spec (or the `nodes` resource when unset)
    /// 3. the `select` resource, then a literal `nodect`
    pub fn node_summary<J: NodeFields + ?Sized>(&self, job: &J) -> NodeSummary {
        let exec_nodes = self.extract_exec_host_nodes(job.exec_host());
        if let Some(first) = exec_nodes.first() {
            return NodeSummary::new(Some(exec_nodes.len()), Some(first.clone()));
        }

        let resources = job.requested_resources();
        let requested = non_blank(job.requested_nodes())
            .or_else(|| non_blank(resources.get("nodes").map(String::as_str)));

        if let Some(count) = self.parse_node_count_spec(requested) {
            let first_node = self.extract_requested_nodes(requested).into_iter().next();
            return NodeSummary::new(Some(count), first_node);
        }

        let count = resources
            .get("select")
            .and_then(|select| self.parse_node_count_spec(Some(select)))
            .or_else(|| {
                resources
                    .get("nodect")
                    .and_then(|nodect| nodect.trim().parse::<usize>().ok())
            });
        NodeSummary::new(count, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Fields {
        exec_host: Option<String>,
        nodes: Option<String>,
        resources: HashMap<String, String>,
    }

    impl NodeFields for Fields {
        fn exec_host(&self) -> Option<&str> {
            self.exec_host.as_deref()
        }

        fn requested_nodes(&self) -> Option<&str> {
            self.nodes.as_deref()
        }

        fn requested_resources(&self) -> &HashMap<String, String> {
            &self.resources
        }
    }

    fn fields(exec_host: Option<&str>, nodes: Option<&str>, resources: &[(&str, &str)]) -> Fields {
        Fields {
            exec_host: exec_host.map(String::from),
            nodes: nodes.map(String::from),
            resources: resources
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn summary(job: &Fields) -> (Option<usize>, Option<String>) {
        let summary = NodeSpecParser::new().node_summary(job);
        (summary.count, summary.first_node)
    }

    #[test]
    fn test_exec_host_wins_over_requested() {
        let job = fields(Some("nodeA/0+nodeB/1+nodeC/2"), Some("nodeA+nodeB"), &[]);
        assert_eq!(summary(&job), (Some(3), Some("nodeA".to_string())));
    }

    #[test]
    fn test_empty_exec_host_falls_through() {
        let job = fields(Some(""), Some("node01+node02"), &[]);
        assert_eq!(summary(&job), (Some(2), Some("node01".to_string())));
    }

    #[test]
    fn test_requested_count_without_names() {
        let job = fields(None, Some("2"), &[]);
        assert_eq!(summary(&job), (Some(2), None));
    }

    #[test]
    fn test_nodes_resource_stands_in_for_requested() {
        let job = fields(None, None, &[("nodes", "4:ppn=8"), ("nodect", "9")]);
        assert_eq!(summary(&job), (Some(4), None));
    }

    #[test]
    fn test_select_over_nodect() {
        let job = fields(None, None, &[("select", "2:ncpus=36"), ("nodect", "5")]);
        assert_eq!(summary(&job), (Some(2), None));
    }

    #[test]
    fn test_unparseable_select_uses_nodect() {
        let job = fields(None, Some("++"), &[("select", "::"), ("nodect", " 5 ")]);
        assert_eq!(summary(&job), (Some(5), None));
    }

    #[test]
    fn test_nothing_derivable() {
        let job = fields(None, Some("!!!"), &[("nodect", "many")]);
        let resolved = NodeSpecParser::new().node_summary(&job);
        assert!(resolved.is_empty());
        assert_eq!(resolved.count_label(), "-");
        assert_eq!(resolved.first_node_label(), "-");
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeSummary::new(Some(3), Some("n1".into())).to_string(), "3 (n1)");
        assert_eq!(NodeSummary::new(Some(2), None).to_string(), "2");
        assert_eq!(NodeSummary::default().to_string(), "-");
    }
}
