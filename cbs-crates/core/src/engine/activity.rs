use crate::basic_types::NodeId;
use crate::containers::KeyedVec;

/// Per-node counters of how often a node took part in a resolved learned clause.
///
/// Only the nodes which were bumped during a call are reset by [`NodeActivity::clear`].
#[derive(Debug, Default)]
pub(crate) struct NodeActivity {
    activities: KeyedVec<NodeId, u32>,
    bumped: Vec<NodeId>,
}

impl NodeActivity {
    pub(crate) fn grow(&mut self, num_nodes: usize) {
        if self.activities.len() < num_nodes {
            self.activities.resize(num_nodes, 0);
        }
    }

    pub(crate) fn bump(&mut self, node: NodeId) {
        if self.activities[node] == 0 {
            self.bumped.push(node);
        }
        self.activities[node] += 1;
    }

    pub(crate) fn activities(&self) -> &KeyedVec<NodeId, u32> {
        &self.activities
    }

    pub(crate) fn clear(&mut self) {
        for node in self.bumped.drain(..) {
            self.activities[node] = 0;
        }
    }
}
