//! Node specification parsing
//!
//! PBS reports node placement through several loosely structured strings:
//! `exec_host` (`nodeA/0+nodeA/1+nodeB/0*2`), the requested `nodes` spec
//! (`2:ppn=64`, `node[01-04]`) and resource fallbacks such as `select` and
//! `nodect`. This module turns those strings into a canonical node count and
//! a representative first node.
//!
//! The pipeline is: split into top-level tokens, strip per-token qualifiers,
//! expand bracketed ranges, then either deduplicate into node names or sum
//! into a node count. Nothing here fails; unparseable input degrades to
//! "no information".

mod extract;
mod summary;
mod tokens;

pub use summary::{NodeFields, NodeSummary, PLACEHOLDER};
pub use tokens::{split_node_spec, NodeSpecTokens};

use regex::Regex;
use std::sync::OnceLock;

/// Stateless parser holding the compiled node-spec patterns
pub struct NodeSpecParser {
    /// `prefix[body]suffix`, prefix free of brackets
    range_re: Regex,
    /// Leading node count, e.g. the `3` in `3:ppn=64`
    count_re: Regex,
    /// Characters allowed in an execution-host node name
    exec_host_re: Regex,
}

impl NodeSpecParser {
    pub fn new() -> Self {
        Self {
            range_re: Regex::new(r"^(?P<prefix>[^\[\]]*)\[(?P<body>[^\]]+)\](?P<suffix>.*)$")
                .unwrap(),
            count_re: Regex::new(r"^[0-9]+").unwrap(),
            exec_host_re: Regex::new(r"^[A-Za-z0-9._-]+$").unwrap(),
        }
    }
}

impl Default for NodeSpecParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared parser instance used by the free functions below
pub fn parser() -> &'static NodeSpecParser {
    static PARSER: OnceLock<NodeSpecParser> = OnceLock::new();
    PARSER.get_or_init(NodeSpecParser::new)
}

/// Strip qualifiers from one token and expand its bracketed range
pub fn normalize_node_token(token: &str) -> Vec<String> {
    parser().normalize_token(token)
}

/// Distinct node identifiers in first-seen order
pub fn extract_nodes(spec: Option<&str>, allow_numeric: bool) -> Vec<String> {
    parser().extract_nodes(spec, allow_numeric)
}

/// Node names from an `exec_host` string
pub fn extract_exec_host_nodes(exec_host: Option<&str>) -> Vec<String> {
    parser().extract_exec_host_nodes(exec_host)
}

/// Named nodes from a requested `nodes` spec (bare integers are counts)
pub fn extract_requested_nodes(spec: Option<&str>) -> Vec<String> {
    parser().extract_requested_nodes(spec)
}

/// Total node count described by a spec, `None` when nothing is derivable
pub fn parse_node_count_spec(spec: Option<&str>) -> Option<usize> {
    parser().parse_node_count_spec(spec)
}

/// Resolve a job's node count and first node
pub fn job_node_summary<J: NodeFields + ?Sized>(job: &J) -> NodeSummary {
    parser().node_summary(job)
}

pub(crate) fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn has_alphanumeric(value: &str) -> bool {
    value.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_helpers() {
        assert!(is_numeric("0042"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("node1"));
        assert!(has_alphanumeric("-a-"));
        assert!(!has_alphanumeric("!!!"));
    }

    #[test]
    fn test_shared_parser_is_reused() {
        assert!(std::ptr::eq(parser(), parser()));
    }
}
