use crate::aig::AigGraph;
use crate::basic_types::NodeId;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// The information a [`NodeSelector`](super::NodeSelector) may use to select a node.
#[derive(Clone, Copy)]
pub struct SelectionContext<'a> {
    graph: &'a dyn AigGraph,
    frontier: &'a [NodeId],
    activities: &'a KeyedVec<NodeId, u32>,
}

impl std::fmt::Debug for SelectionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionContext")
            .field("frontier", &self.frontier)
            .finish_non_exhaustive()
    }
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        graph: &'a dyn AigGraph,
        frontier: &'a [NodeId],
        activities: &'a KeyedVec<NodeId, u32>,
    ) -> Self {
        SelectionContext {
            graph,
            frontier,
            activities,
        }
    }

    /// The unjustified gates, in the order in which they joined the frontier.
    pub fn frontier(&self) -> &'a [NodeId] {
        self.frontier
    }

    pub fn graph(&self) -> &'a dyn AigGraph {
        self.graph
    }

    /// How often `node` took part in a resolved conflict during the current call.
    pub fn activity(&self, node: NodeId) -> u32 {
        if node.index() < self.activities.len() {
            self.activities[node]
        } else {
            0
        }
    }

    /// The largest reference count among the fanin nodes of the gate `node`.
    pub fn fanin_fanout_max(&self, node: NodeId) -> u32 {
        let [first, second] = self.graph.fanins(node);
        self.graph
            .reference_count(first.node())
            .max(self.graph.reference_count(second.node()))
    }
}
