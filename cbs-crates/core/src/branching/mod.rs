//! Contains the decision making procedure of the [`CircuitSolver`].
//!
//! Whenever propagation reaches a fixpoint without satisfying every false gate, the search
//! branches on a gate of the justification frontier, i.e. a false AND gate of which neither fanin
//! is assigned yet. A [`NodeSelector`] picks that gate; the search then decides the fanin with the
//! larger number of references to be false (see [`decision_literal`]), which justifies the gate.
mod node_selector;
pub mod node_selection;
mod selection_context;
pub mod tie_breaking;

pub use node_selector::NodeSelector;
pub use selection_context::SelectionContext;

use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
#[cfg(doc)]
use crate::CircuitSolver;

/// The literal which is decided to be true when branching on the unjustified gate `gate`.
///
/// Both fanins of `gate` are unassigned; setting either of them to false justifies the gate. The
/// fanin whose node has more references is preferred, ties go to the second fanin.
pub fn decision_literal<Graph: AigGraph + ?Sized>(graph: &Graph, gate: NodeId) -> Literal {
    let [first, second] = graph.fanins(gate);
    if graph.reference_count(first.node()) > graph.reference_count(second.node()) {
        !first
    } else {
        !second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::Aig;

    #[test]
    fn decision_falsifies_the_fanin_with_more_references() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let gate = aig.add_and(a, !b).unwrap();
        let _ = aig.add_and(b, gate).unwrap();

        assert_eq!(decision_literal(&aig, gate.node()), b);
    }

    #[test]
    fn equal_references_prefer_the_second_fanin() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let gate = aig.add_and(!a, b).unwrap();

        assert_eq!(decision_literal(&aig, gate.node()), !b);
    }
}
