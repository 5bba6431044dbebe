use crate::basic_types::NodeId;
use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::NodeSelector;
use crate::branching::SelectionContext;

/// A [`NodeSelector`] which selects the unjustified gate whose most referenced fanin has the most
/// references; deciding such a fanin affects the largest part of the circuit.
///
/// The reference counts are taken from the graph as it was when the call started.
#[derive(Debug)]
pub struct MaxFaninFanout {
    tie_breaker: InOrderTieBreaker<NodeId, u32>,
}

impl Default for MaxFaninFanout {
    fn default() -> Self {
        MaxFaninFanout {
            tie_breaker: InOrderTieBreaker::new(Direction::Maximum),
        }
    }
}

impl NodeSelector for MaxFaninFanout {
    fn select_node(&mut self, context: &SelectionContext<'_>) -> Option<NodeId> {
        for &node in context.frontier() {
            self.tie_breaker
                .consider(node, context.fanin_fanout_max(node));
        }
        self.tie_breaker.select()
    }
}
