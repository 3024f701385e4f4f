//! Token splitting and per-token normalisation

use super::NodeSpecParser;

/// Characters that start a per-token qualifier (`/0`, `*2`, `:ppn=4`)
const QUALIFIERS: [char; 3] = ['*', '/', ':'];

/// Iterator over the top-level tokens of a node spec.
///
/// `+` and `,` are interchangeable separators. A separator only splits when
/// no `]` follows it before the next `[`, so `node[1,3]` stays one token while
/// an unmatched `[` is treated as literal text.
pub struct NodeSpecTokens<'a> {
    value: &'a str,
    /// For each byte: scanning forward from it, a `]` is met before any `[`
    inside: Vec<bool>,
    pos: usize,
}

impl<'a> NodeSpecTokens<'a> {
    fn new(value: &'a str) -> Self {
        let mut inside = vec![false; value.len()];
        let mut closes_next = false;
        for (idx, byte) in value.bytes().enumerate().rev() {
            match byte {
                b'[' => closes_next = false,
                b']' => closes_next = true,
                _ => {}
            }
            inside[idx] = closes_next;
        }

        Self {
            value,
            inside,
            pos: 0,
        }
    }

    fn is_split_point(&self, idx: usize, byte: u8) -> bool {
        matches!(byte, b'+' | b',') && !self.inside[idx]
    }
}

impl<'a> Iterator for NodeSpecTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let value = self.value;
        while self.pos <= value.len() {
            let start = self.pos;
            let end = value.as_bytes()[start..]
                .iter()
                .enumerate()
                .find(|(offset, byte)| self.is_split_point(start + offset, **byte))
                .map(|(offset, _)| start + offset)
                .unwrap_or(value.len());

            self.pos = end + 1;
            let segment = value[start..end].trim();
            if !segment.is_empty() {
                return Some(segment);
            }
        }
        None
    }
}

/// Split a node spec into trimmed, non-empty top-level tokens
pub fn split_node_spec(value: &str) -> NodeSpecTokens<'_> {
    NodeSpecTokens::new(value)
}

/// Drop everything from the first qualifier character onwards
fn strip_qualifiers(token: &str) -> &str {
    let token = token.trim();
    match token.find(QUALIFIERS) {
        Some(idx) => token[..idx].trim(),
        None => token,
    }
}

/// Parse a decimal bound, rejecting anything but ASCII digits
fn parse_bound(value: &str) -> Option<u64> {
    if super::is_numeric(value) {
        value.parse().ok()
    } else {
        None
    }
}

impl NodeSpecParser {
    /// Clean a token and expand its bracketed range into node identifiers.
    ///
    /// Returns nothing for a token that is empty once qualifiers are removed.
    /// A token whose range does not parse is returned verbatim.
    pub fn normalize_token(&self, token: &str) -> Vec<String> {
        let base = strip_qualifiers(token);
        if base.is_empty() {
            return Vec::new();
        }
        self.expand_ranges(base)
    }

    fn expand_ranges(&self, base: &str) -> Vec<String> {
        let Some(caps) = self.range_re.captures(base) else {
            return vec![base.to_string()];
        };

        let prefix = &caps["prefix"];
        let body = &caps["body"];
        let suffix = &caps["suffix"];
        if body.contains('[') {
            return vec![base.to_string()];
        }

        let pieces: Vec<&str> = body
            .split([',', '+'])
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect();
        if pieces.is_empty() {
            return vec![base.to_string()];
        }

        let mut expanded = Vec::new();
        for piece in pieces {
            let bounds = piece
                .split_once('-')
                .map(|(start, end)| (start.trim(), end.trim()));

            match bounds.and_then(|(start, end)| {
                Some((start, end, parse_bound(start)?, parse_bound(end)?))
            }) {
                Some((start, end, first, last)) => {
                    let width = start.len().max(end.len());
                    let values: Box<dyn Iterator<Item = u64>> = if last >= first {
                        Box::new(first..=last)
                    } else {
                        Box::new((last..=first).rev())
                    };
                    expanded.extend(
                        values.map(|value| format!("{prefix}{value:0width$}{suffix}")),
                    );
                }
                None => expanded.push(format!("{prefix}{piece}{suffix}")),
            }
        }
        expanded
    }
}
