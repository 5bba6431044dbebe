use crate::basic_types::NodeId;
use crate::branching::tie_breaking::Direction;
use crate::branching::tie_breaking::InOrderTieBreaker;
use crate::branching::tie_breaking::TieBreaker;
use crate::branching::NodeSelector;
use crate::branching::SelectionContext;

/// A [`NodeSelector`] which selects the unjustified gate that took part in the most resolved
/// conflicts so far. Before any conflict has been resolved, this is the oldest gate of the
/// frontier.
#[derive(Debug)]
pub struct MaxActivity {
    tie_breaker: InOrderTieBreaker<NodeId, u32>,
}

impl Default for MaxActivity {
    fn default() -> Self {
        MaxActivity {
            tie_breaker: InOrderTieBreaker::new(Direction::Maximum),
        }
    }
}

impl NodeSelector for MaxActivity {
    fn select_node(&mut self, context: &SelectionContext<'_>) -> Option<NodeId> {
        for &node in context.frontier() {
            self.tie_breaker.consider(node, context.activity(node));
        }
        self.tie_breaker.select()
    }
}
