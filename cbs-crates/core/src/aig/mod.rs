//! The And-Inverter Graph consumed by the solver.
//!
//! The solver only reads the graph through the [`AigGraph`] trait; it never mutates it. [`Aig`]
//! is a simple graph implementing the trait which can be used to build circuits directly.
mod aig_error;
mod network;

pub use aig_error::AigError;
pub use network::Aig;

use crate::basic_types::Literal;
use crate::basic_types::NodeId;

/// The three kinds of nodes which can occur in an And-Inverter Graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The constant-false node, always [`NodeId::CONSTANT`].
    Constant,
    /// A primary input.
    Input,
    /// A two-input AND gate.
    And,
}

/// Read-only access to an And-Inverter Graph.
///
/// Node ids range over `0..num_nodes()` and node `0` is the constant node. The fanins of an AND
/// gate must refer to nodes with a smaller id.
pub trait AigGraph {
    /// The total number of nodes, including the constant node.
    fn num_nodes(&self) -> usize;

    fn node_kind(&self, node: NodeId) -> NodeKind;

    /// The two fanin literals of an AND gate.
    ///
    /// Only defined when `node` is an AND gate.
    fn fanins(&self, node: NodeId) -> [Literal; 2];

    /// The number of references to `node`, i.e. the number of gates and outputs which use it.
    ///
    /// The counts are expected to reflect the graph at the time a solve call starts; the solver
    /// only uses them to guide decisions.
    fn reference_count(&self, node: NodeId) -> u32;

    /// The position of `node` among the primary inputs, or [`None`] if it is not an input.
    fn input_index(&self, node: NodeId) -> Option<usize>;

    fn is_and(&self, node: NodeId) -> bool {
        self.node_kind(node) == NodeKind::And
    }

    fn is_input(&self, node: NodeId) -> bool {
        self.node_kind(node) == NodeKind::Input
    }
}
