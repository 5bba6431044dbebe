use super::clause_database::ClauseHandle;
use crate::basic_types::NodeId;

/// Why a node received its value.
///
/// Structural reasons name the nodes whose current values imply the assignment through the AND
/// gate semantics; e.g. a fanin forced to true by its gate being true has the gate as its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reason {
    /// A branching choice, or one of the target literals at the root.
    Decision,
    StructuralUnary(NodeId),
    StructuralBinary(NodeId, NodeId),
    /// A learned clause which became unit; the assigned node is its first literal.
    Clause(ClauseHandle),
}
