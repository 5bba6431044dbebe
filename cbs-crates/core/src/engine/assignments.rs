use super::reason::Reason;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::cbs_assert_moderate;
use crate::cbs_assert_simple;
use crate::containers::KeyedVec;
use crate::containers::Queue;

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    level: u32,
    reason: Reason,
}

/// The trail and level store.
///
/// All per-node state lives in side tables indexed by [`NodeId`]; the graph itself is never
/// touched. The trail doubles as the propagation queue: its head marks the first assignment
/// which has not been propagated yet.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    values: KeyedVec<NodeId, Option<bool>>,
    trail_positions: KeyedVec<NodeId, Option<u32>>,
    trail: Queue<Literal>,
    entries: Vec<TrailEntry>,
}

impl Assignments {
    /// Makes room for `num_nodes` nodes.
    pub(crate) fn grow(&mut self, num_nodes: usize) {
        if self.values.len() < num_nodes {
            self.values.resize(num_nodes, None);
            self.trail_positions.resize(num_nodes, None);
        }
    }

    pub(crate) fn value(&self, node: NodeId) -> Option<bool> {
        self.values[node]
    }

    pub(crate) fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.values[literal.node()].map(|value| literal.evaluate(value))
    }

    pub(crate) fn is_assigned(&self, node: NodeId) -> bool {
        self.values[node].is_some()
    }

    pub(crate) fn is_literal_true(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(true)
    }

    pub(crate) fn is_literal_false(&self, literal: Literal) -> bool {
        self.literal_value(literal) == Some(false)
    }

    pub(crate) fn level(&self, node: NodeId) -> u32 {
        self.entry(node).level
    }

    pub(crate) fn reason(&self, node: NodeId) -> Reason {
        self.entry(node).reason
    }

    pub(crate) fn trail_position(&self, node: NodeId) -> Option<u32> {
        self.trail_positions[node]
    }

    fn entry(&self, node: NodeId) -> &TrailEntry {
        match self.trail_positions[node] {
            Some(position) => &self.entries[position as usize],
            None => panic!("Unassigned nodes do not have a level or a reason, {node} is unassigned"),
        }
    }

    /// Makes `literal` true at `level`.
    pub(crate) fn assign(&mut self, literal: Literal, level: u32, reason: Reason) {
        let node = literal.node();
        cbs_assert_simple!(
            !self.is_assigned(node),
            "A node must not be assigned twice, {node} is already assigned"
        );
        cbs_assert_moderate!(self.entries.last().map_or(true, |last| last.level <= level));

        self.values[node] = Some(literal.polarity());
        self.trail_positions[node] = Some(self.trail.tail() as u32);
        self.trail.push(literal);
        self.entries.push(TrailEntry { level, reason });
    }

    /// Unassigns every node at trail positions `>= bound` and truncates the trail to `bound`.
    pub(crate) fn cancel_until(&mut self, bound: usize) {
        cbs_assert_simple!(bound <= self.trail.tail());
        for &literal in self.trail.slice(bound..self.trail.tail()) {
            self.values[literal.node()] = None;
            self.trail_positions[literal.node()] = None;
        }
        self.trail.truncate(bound);
        self.entries.truncate(bound);
        cbs_assert_moderate!(self.trail.tail() == self.entries.len());
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.tail()
    }

    pub(crate) fn trail_entry(&self, position: usize) -> Literal {
        self.trail[position]
    }

    /// All assignments in chronological order.
    pub(crate) fn trail(&self) -> &[Literal] {
        self.trail.slice(0..self.trail.tail())
    }

    /// The position of the first assignment which has not been propagated yet.
    pub(crate) fn propagation_head(&self) -> usize {
        self.trail.head()
    }

    pub(crate) fn set_propagation_head(&mut self, head: usize) {
        self.trail.set_head(head);
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.trail.is_empty()
    }
}
