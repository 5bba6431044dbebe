//! The [`NodeSelector`]s which can be chosen through [`BranchingHeuristic`].
mod highest_id;
mod lowest_id;
mod max_activity;
mod max_fanin_fanout;

pub use highest_id::HighestId;
pub use lowest_id::LowestId;
pub use max_activity::MaxActivity;
pub use max_fanin_fanout::MaxFaninFanout;

use super::NodeSelector;
use crate::options::BranchingHeuristic;

/// Creates the [`NodeSelector`] implementing `heuristic`.
pub fn create_node_selector(heuristic: BranchingHeuristic) -> Box<dyn NodeSelector> {
    match heuristic {
        BranchingHeuristic::HighestId => Box::new(HighestId::default()),
        BranchingHeuristic::LowestId => Box::new(LowestId::default()),
        BranchingHeuristic::MaxActivity => Box::new(MaxActivity::default()),
        BranchingHeuristic::MaxFaninFanout => Box::new(MaxFaninFanout::default()),
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use crate::aig::Aig;
    use crate::basic_types::Literal;
    use crate::basic_types::NodeId;

    /// A graph with three gates over four inputs; `c` is shared by the two lower gates.
    pub(crate) fn three_gates() -> (Aig, [NodeId; 3]) {
        let mut aig = Aig::new();
        let inputs: Vec<Literal> = (0..4).map(|_| aig.add_input()).collect();
        let left = aig.add_and(inputs[0], inputs[2]).unwrap();
        let right = aig.add_and(inputs[1], !inputs[2]).unwrap();
        let top = aig.add_and(left, inputs[3]).unwrap();
        (aig, [left.node(), right.node(), top.node()])
    }
}
