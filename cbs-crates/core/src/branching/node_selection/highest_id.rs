use crate::basic_types::NodeId;
use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::NodeSelector;
use crate::branching::SelectionContext;

/// A [`NodeSelector`] which selects the unjustified gate with the highest id, i.e. the gate
/// closest to the outputs.
#[derive(Debug)]
pub struct HighestId {
    tie_breaker: InOrderTieBreaker<NodeId, u32>,
}

impl Default for HighestId {
    fn default() -> Self {
        HighestId {
            tie_breaker: InOrderTieBreaker::new(Direction::Maximum),
        }
    }
}

impl NodeSelector for HighestId {
    fn select_node(&mut self, context: &SelectionContext<'_>) -> Option<NodeId> {
        for &node in context.frontier() {
            self.tie_breaker.consider(node, node.id());
        }
        self.tie_breaker.select()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::node_selection::test_helpers::three_gates;
    use crate::containers::KeyedVec;

    #[test]
    fn highest_gate_is_selected() {
        let (aig, [left, right, top]) = three_gates();
        let activities = KeyedVec::default();
        let frontier = [right, top, left];
        let context = SelectionContext::new(&aig, &frontier, &activities);

        assert_eq!(HighestId::default().select_node(&context), Some(top));
    }

    #[test]
    fn empty_frontier_selects_nothing() {
        let (aig, _) = three_gates();
        let activities = KeyedVec::default();
        let context = SelectionContext::new(&aig, &[], &activities);

        assert_eq!(HighestId::default().select_node(&context), None);
    }
}
