//! Parse progress trace
//!
//! Records every tuple node visited during one decode call so a failure can
//! be located ("the 3rd node under an `and`") rather than reported bare.

use crate::criteria::node_type::NodeTypeId;
use serde::Serialize;

/// One visited tuple node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTupleNode {
    /// Nesting depth; the outermost node is at depth 0
    pub depth: usize,
    /// Discriminator text as found on the wire
    pub tuple_node_type: String,
    /// Resolved node kind, `None` while the node is still being parsed
    pub node_type: Option<NodeTypeId>,
}

/// Append-only trace of a single decode call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseProgress {
    depth: usize,
    nodes: Vec<ParsedTupleNode>,
}

impl ParseProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record entry into a tuple node and return its index in the trace
    pub(crate) fn enter(&mut self, tuple_node_type: &str) -> usize {
        let index = self.nodes.len();
        self.nodes.push(ParsedTupleNode {
            depth: self.depth,
            tuple_node_type: tuple_node_type.to_owned(),
            node_type: None,
        });
        self.depth += 1;
        index
    }

    /// Back-fill the resolved kind of the node at `index` and leave it
    pub(crate) fn exit(&mut self, index: usize, node_type: NodeTypeId) {
        self.nodes[index].node_type = Some(node_type);
        self.depth -= 1;
    }

    /// Number of tuple nodes currently open
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nodes(&self) -> &[ParsedTupleNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Innermost node left unresolved, i.e. where a failed decode stopped
    pub fn failed_node(&self) -> Option<&ParsedTupleNode> {
        self.nodes.iter().rev().find(|node| node.node_type.is_none())
    }

    /// Deepest depth reached during the decode
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_exit() {
        let mut progress = ParseProgress::new();
        let outer = progress.enter("and");
        let inner = progress.enter("gt");
        assert_eq!(progress.depth(), 2);
        progress.exit(inner, NodeTypeId::NumericGreaterThan);
        progress.exit(outer, NodeTypeId::And);

        assert_eq!(progress.depth(), 0);
        assert_eq!(progress.len(), 2);
        assert_eq!(progress.nodes()[0].depth, 0);
        assert_eq!(progress.nodes()[1].depth, 1);
        assert_eq!(progress.nodes()[1].node_type, Some(NodeTypeId::NumericGreaterThan));
        assert!(progress.failed_node().is_none());
        assert_eq!(progress.max_depth(), 1);
    }

    #[test]
    fn test_failed_node_is_innermost_pending() {
        let mut progress = ParseProgress::new();
        progress.enter("and");
        let first = progress.enter("code");
        progress.exit(first, NodeTypeId::TextFieldContains);
        progress.enter("price");

        let failed = progress.failed_node().unwrap();
        assert_eq!(failed.tuple_node_type, "price");
        assert_eq!(failed.depth, 1);
    }

    #[test]
    fn test_serializes_for_telemetry() {
        let mut progress = ParseProgress::new();
        let index = progress.enter("all");
        progress.exit(index, NodeTypeId::All);

        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["nodes"][0]["tuple_node_type"], "all");
        assert_eq!(json["nodes"][0]["node_type"], "All");
    }
}
