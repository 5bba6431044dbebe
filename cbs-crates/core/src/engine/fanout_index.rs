use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::containers::KeyedVec;

#[derive(Debug, Clone, Copy)]
struct FanoutEdge {
    gate: NodeId,
    next: Option<u32>,
}

/// Fanout lists for the transitive fanin cone of a set of target literals.
///
/// Each node owns a singly linked list of the gates in the cone that use it; the edges are stored
/// in one arena and linked by index. The index is built at the start of a call and cleared at its
/// end, touching only the nodes of the cone.
#[derive(Debug, Default)]
pub(crate) struct FanoutIndex {
    first_edge: KeyedVec<NodeId, Option<u32>>,
    edges: Vec<FanoutEdge>,
    visited: KeyedVec<NodeId, bool>,
    cone: Vec<NodeId>,
}

impl FanoutIndex {
    pub(crate) fn grow(&mut self, num_nodes: usize) {
        if self.first_edge.len() < num_nodes {
            self.first_edge.resize(num_nodes, None);
            self.visited.resize(num_nodes, false);
        }
    }

    /// Collects the fanouts of every node in the fanin cone of `targets`.
    pub(crate) fn build<Graph: AigGraph + ?Sized>(&mut self, graph: &Graph, targets: &[Literal]) {
        let mut stack = targets
            .iter()
            .map(|target| target.node())
            .collect::<Vec<_>>();

        while let Some(node) = stack.pop() {
            if self.visited[node] {
                continue;
            }
            self.visited[node] = true;
            self.cone.push(node);

            if !graph.is_and(node) {
                continue;
            }
            for fanin in graph.fanins(node) {
                self.add_edge(fanin.node(), node);
                stack.push(fanin.node());
            }
        }
    }

    fn add_edge(&mut self, node: NodeId, gate: NodeId) {
        let edge = self.edges.len() as u32;
        self.edges.push(FanoutEdge {
            gate,
            next: self.first_edge[node],
        });
        self.first_edge[node] = Some(edge);
    }

    /// The gates using `node`; a gate with both fanins on `node` appears twice.
    pub(crate) fn fanouts(&self, node: NodeId) -> Fanouts<'_> {
        Fanouts {
            index: self,
            edge: self.first_edge[node],
        }
    }

    pub(crate) fn clear(&mut self) {
        for node in self.cone.drain(..) {
            self.first_edge[node] = None;
            self.visited[node] = false;
        }
        self.edges.clear();
    }
}

#[derive(Debug)]
pub(crate) struct Fanouts<'a> {
    index: &'a FanoutIndex,
    edge: Option<u32>,
}

impl Iterator for Fanouts<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let edge = self.index.edges[self.edge? as usize];
        self.edge = edge.next;
        Some(edge.gate)
    }
}
