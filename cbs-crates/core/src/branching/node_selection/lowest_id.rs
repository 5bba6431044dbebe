use crate::basic_types::NodeId;
use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::NodeSelector;
use crate::branching::SelectionContext;

/// A [`NodeSelector`] which selects the unjustified gate with the lowest id.
#[derive(Debug)]
pub struct LowestId {
    tie_breaker: InOrderTieBreaker<NodeId, u32>,
}

impl Default for LowestId {
    fn default() -> Self {
        LowestId {
            tie_breaker: InOrderTieBreaker::new(Direction::Minimum),
        }
    }
}

impl NodeSelector for LowestId {
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
    fn lowest_gate_is_selected() {
        let (aig, [left, right, top]) = three_gates();
        let activities = KeyedVec::default();
        let frontier = [top, right, left];
        let context = SelectionContext::new(&aig, &frontier, &activities);

        assert_eq!(LowestId::default().select_node(&context), Some(left));
    }
}
