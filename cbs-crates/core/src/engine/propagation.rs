use std::time::Instant;

use super::assignments::Assignments;
use super::clause_database::ClauseDatabase;
use super::clause_database::ClauseHandle;
use super::fanout_index::FanoutIndex;
use super::reason::Reason;
use super::solver_statistics::EngineStatistics;
use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::containers::Queue;
use crate::options::PropagationMode;

/// A set of assigned nodes whose values cannot hold together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conflict {
    /// An AND gate whose value contradicts the values of one or both of its fanins.
    Gate {
        gate: NodeId,
        first: NodeId,
        second: Option<NodeId>,
    },
    /// A learned clause of which every literal is false.
    Clause(ClauseHandle),
}

/// Everything propagation reads and writes, apart from the propagator itself.
#[derive(Debug)]
pub(crate) struct PropagationContext<'a, Graph: ?Sized> {
    pub(crate) graph: &'a Graph,
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) clauses: &'a mut ClauseDatabase,
    pub(crate) frontier: &'a mut Queue<NodeId>,
    pub(crate) statistics: &'a mut EngineStatistics,
}

impl<Graph: AigGraph + ?Sized> PropagationContext<'_, Graph> {
    /// An AND gate is unjustified when it is false and neither fanin is assigned yet.
    pub(crate) fn is_unjustified(&self, node: NodeId) -> bool {
        self.assignments.value(node) == Some(false)
            && self.graph.is_and(node)
            && self
                .graph
                .fanins(node)
                .iter()
                .all(|fanin| !self.assignments.is_assigned(fanin.node()))
    }
}

/// Propagates the gate semantics of the circuit together with the learned clauses.
///
/// In [`PropagationMode::Frontier`] the structural pass evaluates each newly assigned node and then
/// re-evaluates the nodes of the justification frontier until nothing changes. In
/// [`PropagationMode::Fanout`] every new assignment also evaluates the gates it feeds, using
/// fanout lists for the cone of the targets, and the frontier is rebuilt afterwards by
/// [`CircuitPropagator::rebuild_frontier`].
#[derive(Debug, Default)]
pub(crate) struct CircuitPropagator {
    mode: PropagationMode,
    fanouts: FanoutIndex,
}

impl CircuitPropagator {
    #[cfg(test)]
    pub(crate) fn new(mode: PropagationMode) -> Self {
        CircuitPropagator {
            mode,
            fanouts: FanoutIndex::default(),
        }
    }

    pub(crate) fn mode(&self) -> PropagationMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: PropagationMode) {
        self.mode = mode;
    }

    pub(crate) fn grow(&mut self, num_nodes: usize) {
        self.fanouts.grow(num_nodes);
    }

    /// Prepares propagation for a call on `targets`.
    pub(crate) fn start_call<Graph: AigGraph + ?Sized>(
        &mut self,
        graph: &Graph,
        targets: &[Literal],
    ) {
        if self.mode == PropagationMode::Fanout {
            self.fanouts.build(graph, targets);
        }
    }

    pub(crate) fn end_call(&mut self) {
        self.fanouts.clear();
    }

    /// Propagates all pending assignments at `level` until a fixpoint or a conflict is reached.
    pub(crate) fn propagate<Graph: AigGraph + ?Sized>(
        &mut self,
        context: &mut PropagationContext<'_, Graph>,
        level: u32,
    ) -> Result<(), Conflict> {
        let result = match self.mode {
            PropagationMode::Frontier => Self::propagate_with_frontier(context, level),
            PropagationMode::Fanout => self.propagate_with_fanouts(context, level),
        };
        if result.is_err() {
            context.statistics.propagation_conflicts += 1;
        }
        result
    }

    fn propagate_with_frontier<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        level: u32,
    ) -> Result<(), Conflict> {
        loop {
            while let Some(literal) = Self::next_pending(context.assignments) {
                Self::propagate_clauses(context, literal, level)?;
                Self::propagate_gate(context, literal.node(), level, true)?;
            }

            // keep the nodes which are still unjustified, the others may imply new values
            let head = context.frontier.head();
            let tail = context.frontier.tail();
            let mut kept = head;
            for position in head..tail {
                let node = context.frontier[position];
                if context.is_unjustified(node) {
                    context.frontier[kept] = node;
                    kept += 1;
                } else {
                    Self::propagate_false_gate(context, node, level, false)?;
                }
            }

            if kept == tail {
                return Ok(());
            }
            context.frontier.truncate(kept);
        }
    }

    fn propagate_with_fanouts<Graph: AigGraph + ?Sized>(
        &mut self,
        context: &mut PropagationContext<'_, Graph>,
        level: u32,
    ) -> Result<(), Conflict> {
        while let Some(literal) = Self::next_pending(context.assignments) {
            Self::propagate_clauses(context, literal, level)?;

            let node = literal.node();
            for gate in self.fanouts.fanouts(node) {
                if context.assignments.is_assigned(gate) {
                    Self::propagate_gate(context, gate, level, false)?;
                } else {
                    Self::imply_gate_output(context, gate, level);
                }
            }
            Self::propagate_gate(context, node, level, false)?;
        }
        Ok(())
    }

    /// Moves the frontier to a new window holding the unjustified nodes among the previous window
    /// and the assignments made from trail position `trail_start` onwards.
    ///
    /// The previous window stays in place, so restoring a save-point taken before this call
    /// undoes it.
    pub(crate) fn rebuild_frontier<Graph: AigGraph + ?Sized>(
        &self,
        context: &mut PropagationContext<'_, Graph>,
        trail_start: usize,
    ) {
        let started = Instant::now();

        let previous_tail = context.frontier.tail();
        for position in context.frontier.head()..previous_tail {
            let node = context.frontier[position];
            if context.is_unjustified(node) {
                context.frontier.push(node);
            }
        }
        for position in trail_start..context.assignments.num_trail_entries() {
            let node = context.assignments.trail_entry(position).node();
            if context.is_unjustified(node) {
                context.frontier.push(node);
            }
        }
        context.frontier.set_head(previous_tail);

        context.statistics.frontier_rebuild_micros += started.elapsed().as_micros() as u64;
    }

    fn next_pending(assignments: &mut Assignments) -> Option<Literal> {
        if !assignments.has_pending() {
            return None;
        }
        let head = assignments.propagation_head();
        assignments.set_propagation_head(head + 1);
        Some(assignments.trail_entry(head))
    }

    fn propagate_clauses<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        literal: Literal,
        level: u32,
    ) -> Result<(), Conflict> {
        context
            .clauses
            .propagate_literal(literal, context.assignments, level, context.statistics)
            .map_err(Conflict::Clause)
    }

    /// Checks the assigned node `node` against its fanins.
    fn propagate_gate<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        node: NodeId,
        level: u32,
        push_unjustified: bool,
    ) -> Result<(), Conflict> {
        if !context.graph.is_and(node) {
            return Ok(());
        }

        match context.assignments.value(node) {
            Some(true) => Self::propagate_true_gate(context, node, level),
            Some(false) => Self::propagate_false_gate(context, node, level, push_unjustified),
            None => Ok(()),
        }
    }

    /// A true gate needs both fanins to be true.
    fn propagate_true_gate<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        gate: NodeId,
        level: u32,
    ) -> Result<(), Conflict> {
        context.statistics.structural_propagations += 1;

        let [first, second] = context.graph.fanins(gate);
        match (
            context.assignments.literal_value(first),
            context.assignments.literal_value(second),
        ) {
            (Some(false), Some(false)) => {
                return Err(Conflict::Gate {
                    gate,
                    first: first.node(),
                    second: Some(second.node()),
                })
            }
            (Some(false), _) => {
                return Err(Conflict::Gate {
                    gate,
                    first: first.node(),
                    second: None,
                })
            }
            (_, Some(false)) => {
                return Err(Conflict::Gate {
                    gate,
                    first: second.node(),
                    second: None,
                })
            }
            _ => {}
        }

        // the values are read again since both fanins may share a node
        for fanin in [first, second] {
            match context.assignments.literal_value(fanin) {
                None => context
                    .assignments
                    .assign(fanin, level, Reason::StructuralUnary(gate)),
                Some(true) => {}
                Some(false) => {
                    return Err(Conflict::Gate {
                        gate,
                        first: fanin.node(),
                        second: None,
                    })
                }
            }
        }
        Ok(())
    }

    /// A false gate needs at least one false fanin.
    fn propagate_false_gate<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        gate: NodeId,
        level: u32,
        push_unjustified: bool,
    ) -> Result<(), Conflict> {
        context.statistics.structural_propagations += 1;

        let [first, second] = context.graph.fanins(gate);
        match (
            context.assignments.literal_value(first),
            context.assignments.literal_value(second),
        ) {
            (Some(false), _) | (_, Some(false)) => {}
            (Some(true), Some(true)) => {
                return Err(Conflict::Gate {
                    gate,
                    first: first.node(),
                    second: Some(second.node()),
                })
            }
            (Some(true), None) => context.assignments.assign(
                !second,
                level,
                Reason::StructuralBinary(gate, first.node()),
            ),
            (None, Some(true)) => context.assignments.assign(
                !first,
                level,
                Reason::StructuralBinary(gate, second.node()),
            ),
            (None, None) => {
                if push_unjustified {
                    context.frontier.push(gate);
                }
            }
        }
        Ok(())
    }

    /// Assigns the output of an unassigned gate when its fanins determine it.
    fn imply_gate_output<Graph: AigGraph + ?Sized>(
        context: &mut PropagationContext<'_, Graph>,
        gate: NodeId,
        level: u32,
    ) {
        let [first, second] = context.graph.fanins(gate);
        let (output, reason) = match (
            context.assignments.literal_value(first),
            context.assignments.literal_value(second),
        ) {
            (Some(false), _) => (false, Reason::StructuralUnary(first.node())),
            (_, Some(false)) => (false, Reason::StructuralUnary(second.node())),
            (Some(true), Some(true)) => (
                true,
                Reason::StructuralBinary(first.node(), second.node()),
            ),
            _ => return,
        };

        context.statistics.forward_implications += 1;
        context
            .assignments
            .assign(Literal::with_value(gate, output), level, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::Aig;

    struct Fixture {
        assignments: Assignments,
        clauses: ClauseDatabase,
        frontier: Queue<NodeId>,
        statistics: EngineStatistics,
    }

    impl Fixture {
        fn new(aig: &Aig) -> Fixture {
            let mut assignments = Assignments::default();
            assignments.grow(aig.num_nodes());
            let mut clauses = ClauseDatabase::default();
            clauses.grow(aig.num_nodes());
            Fixture {
                assignments,
                clauses,
                frontier: Queue::default(),
                statistics: EngineStatistics::default(),
            }
        }

        fn context<'a>(&'a mut self, aig: &'a Aig) -> PropagationContext<'a, Aig> {
            PropagationContext {
                graph: aig,
                assignments: &mut self.assignments,
                clauses: &mut self.clauses,
                frontier: &mut self.frontier,
                statistics: &mut self.statistics,
            }
        }
    }

    fn propagate_target(
        aig: &Aig,
        fixture: &mut Fixture,
        target: Literal,
        mode: PropagationMode,
    ) -> Result<(), Conflict> {
        let mut propagator = CircuitPropagator::new(mode);
        propagator.grow(aig.num_nodes());
        propagator.start_call(aig, &[target]);
        fixture.assignments.assign(target, 0, Reason::Decision);
        let mut context = fixture.context(aig);
        let result = propagator.propagate(&mut context, 0);
        if result.is_ok() && mode == PropagationMode::Fanout {
            propagator.rebuild_frontier(&mut context, 0);
        }
        result
    }

    #[test]
    fn true_gate_forces_fanins() {
        for mode in [PropagationMode::Frontier, PropagationMode::Fanout] {
            let mut aig = Aig::new();
            let a = aig.add_input();
            let b = aig.add_input();
            let gate = aig.add_and(a, !b).unwrap();
            let mut fixture = Fixture::new(&aig);

            assert!(propagate_target(&aig, &mut fixture, gate, mode).is_ok());
            assert_eq!(fixture.assignments.value(a.node()), Some(true));
            assert_eq!(fixture.assignments.value(b.node()), Some(false));
            assert_eq!(
                fixture.assignments.reason(b.node()),
                Reason::StructuralUnary(gate.node())
            );
            assert!(fixture.frontier.is_empty());
        }
    }

    #[test]
    fn false_gate_with_unassigned_fanins_joins_the_frontier() {
        for mode in [PropagationMode::Frontier, PropagationMode::Fanout] {
            let mut aig = Aig::new();
            let a = aig.add_input();
            let b = aig.add_input();
            let gate = aig.add_and(a, b).unwrap();
            let mut fixture = Fixture::new(&aig);

            assert!(propagate_target(&aig, &mut fixture, !gate, mode).is_ok());
            assert_eq!(fixture.frontier.window(), &[gate.node()]);
            assert!(!fixture.assignments.is_assigned(a.node()));
        }
    }

    #[test]
    fn false_gate_with_one_true_fanin_forces_the_other() {
        for mode in [PropagationMode::Frontier, PropagationMode::Fanout] {
            let mut aig = Aig::new();
            let a = aig.add_input();
            let b = aig.add_input();
            let lower = aig.add_and(a, b).unwrap();
            let upper = aig.add_and(!lower, a).unwrap();
            let gate = aig.add_and(upper, b).unwrap();
            let mut fixture = Fixture::new(&aig);

            // gate = ~(a & b) & a & b can never be true
            let result = propagate_target(&aig, &mut fixture, gate, mode);
            assert!(matches!(result, Err(Conflict::Gate { .. })));
        }
    }

    #[test]
    fn shared_fanin_node_is_assigned_once() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let gate = aig.add_and(a, a).unwrap();
        let mut fixture = Fixture::new(&aig);

        assert!(propagate_target(&aig, &mut fixture, gate, PropagationMode::Frontier).is_ok());
        assert_eq!(fixture.assignments.num_trail_entries(), 2);
    }

    #[test]
    fn complementary_fanins_conflict() {
        for mode in [PropagationMode::Frontier, PropagationMode::Fanout] {
            let mut aig = Aig::new();
            let a = aig.add_input();
            let gate = aig.add_and(a, !a).unwrap();
            let mut fixture = Fixture::new(&aig);

            let result = propagate_target(&aig, &mut fixture, gate, mode);
            assert_eq!(
                result,
                Err(Conflict::Gate {
                    gate: gate.node(),
                    first: a.node(),
                    second: None
                })
            );
        }
    }

    #[test]
    fn fanout_mode_implies_gate_outputs() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let inner = aig.add_and(a, b).unwrap();
        let either = aig.add_or(inner, c).unwrap();
        // top = ~a & (inner | c): a is false, which makes inner false and in turn forces c
        let top = aig.add_and(!a, either).unwrap();
        let mut fixture = Fixture::new(&aig);

        assert!(propagate_target(&aig, &mut fixture, top, PropagationMode::Fanout).is_ok());
        assert_eq!(fixture.assignments.value(inner.node()), Some(false));
        assert_eq!(
            fixture.assignments.reason(inner.node()),
            Reason::StructuralUnary(a.node())
        );
        assert_eq!(fixture.assignments.value(c.node()), Some(true));
        assert!(fixture.statistics.forward_implications > 0);
        assert!(fixture.frontier.is_empty());
    }
}
