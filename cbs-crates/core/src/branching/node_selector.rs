use std::fmt::Debug;

use super::SelectionContext;
use crate::basic_types::NodeId;

/// Chooses the gate of the justification frontier to branch on.
pub trait NodeSelector: Debug {
    /// Returns one of the nodes in [`SelectionContext::frontier`], or [`None`] only if the
    /// frontier is empty.
    fn select_node(&mut self, context: &SelectionContext<'_>) -> Option<NodeId>;
}
