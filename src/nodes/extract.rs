//! Node extraction and node counting

use super::{has_alphanumeric, is_numeric, split_node_spec, NodeSpecParser};
use std::collections::HashSet;

impl NodeSpecParser {
    /// Distinct node identifiers of `spec` in first-seen order.
    ///
    /// Candidates without any alphanumeric character are dropped, as are
    /// purely numeric ones unless `allow_numeric` is set.
    pub fn extract_nodes(&self, spec: Option<&str>, allow_numeric: bool) -> Vec<String> {
        let Some(spec) = spec.filter(|s| !s.trim().is_empty()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        split_node_spec(spec)
            .flat_map(|token| self.normalize_token(token))
            .filter(|node| has_alphanumeric(node))
            .filter(|node| allow_numeric || !is_numeric(node))
            .filter(|node| seen.insert(node.clone()))
            .collect()
    }

    /// Execution-host entries are often bare numeric ids that still name a host
    pub fn extract_exec_host_nodes(&self, exec_host: Option<&str>) -> Vec<String> {
        self.extract_nodes(exec_host, true)
            .into_iter()
            .filter(|node| self.exec_host_re.is_match(node))
            .collect()
    }

    /// A bare integer in a requested spec is a count, not a name
    pub fn extract_requested_nodes(&self, spec: Option<&str>) -> Vec<String> {
        self.extract_nodes(spec, false)
    }

    /// Total node count described by `spec`.
    ///
    /// A leading integer on a token (`3:ppn=64`) is a count. Other tokens
    /// contribute their named nodes, or every expanded value when the token
    /// was a bracketed range of bare numbers. `None` means no token said
    /// anything, which is distinct from an explicit count of zero.
    pub fn parse_node_count_spec(&self, spec: Option<&str>) -> Option<usize> {
        let spec = spec?.trim();
        if spec.is_empty() {
            return None;
        }

        let mut total: Option<usize> = None;
        for token in split_node_spec(spec) {
            if let Some(prefix) = self.count_re.find(token) {
                // overflowing prefixes carry no usable count
                if let Ok(count) = prefix.as_str().parse::<usize>() {
                    total = Some(total.unwrap_or(0).saturating_add(count));
                }
                continue;
            }

            let candidates: Vec<String> = self
                .normalize_token(token)
                .into_iter()
                .filter(|node| has_alphanumeric(node))
                .collect();
            if candidates.is_empty() {
                continue;
            }

            let named = candidates.iter().filter(|node| !is_numeric(node)).count();
            let contributed = if named > 0 {
                named
            } else if token.contains('[') {
                candidates.len()
            } else {
                0
            };
            if contributed > 0 {
                total = Some(total.unwrap_or(0).saturating_add(contributed));
            }
        }
        total
    }
}
