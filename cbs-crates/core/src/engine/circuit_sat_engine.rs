use log::debug;
use log::trace;

use super::activity::NodeActivity;
use super::assignments::Assignments;
use super::clause_database::ClauseDatabase;
use super::conflict_analysis::ConflictAnalyser;
use super::conflict_analysis::LearnedId;
use super::propagation::CircuitPropagator;
use super::propagation::Conflict;
use super::propagation::PropagationContext;
use super::reason::Reason;
use super::solver_statistics::EngineStatistics;
use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::branching::decision_literal;
use crate::branching::NodeSelector;
use crate::branching::SelectionContext;
use crate::cbs_assert_moderate;
use crate::cbs_assert_simple;
use crate::containers::Queue;
use crate::options::PropagationMode;
use crate::options::SolverOptions;
use crate::results::Model;
use crate::results::SatisfactionResult;

/// Which assignments end up in the [`Model`] of a satisfiable call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModelScope {
    /// Only the primary inputs.
    Inputs,
    /// The primary inputs and the literal of every assigned node.
    AllNodes,
}

/// The result of one level of the recursive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    /// Every false gate is justified.
    Satisfied,
    /// The assignments of this level and below cannot be extended; the learned clause says why.
    Conflict(LearnedId),
    /// A resource limit was exceeded.
    Undecided,
}

/// The limits of a single call, taken from the [`SolverOptions`].
#[derive(Debug, Clone, Copy, Default)]
struct CallLimits {
    conflicts: u64,
    frontier_size: usize,
}

/// The counters of the current call which are compared against the [`CallLimits`].
#[derive(Debug, Clone, Copy, Default)]
struct CallCounters {
    resolved_conflicts: u64,
    peak_frontier_size: usize,
}

/// A conflict-driven search which decides whether literals of an And-Inverter Graph can be true
/// at the same time.
///
/// The engine keeps no state across calls apart from its statistics and its allocations: the
/// trail, the justification frontier, the learned clauses and the activities are all emptied
/// before [`CircuitSatEngine::solve`] returns.
#[derive(Debug, Default)]
pub(crate) struct CircuitSatEngine {
    assignments: Assignments,
    /// The false AND gates of which neither fanin is assigned.
    frontier: Queue<NodeId>,
    clauses: ClauseDatabase,
    analyser: ConflictAnalyser,
    propagator: CircuitPropagator,
    activity: NodeActivity,
    limits: CallLimits,
    counters: CallCounters,
    statistics: EngineStatistics,
}

impl CircuitSatEngine {
    pub(crate) fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    pub(crate) fn clear_statistics(&mut self) {
        self.statistics = EngineStatistics::default();
    }

    /// The number of conflicts resolved during the last call.
    pub(crate) fn last_call_conflicts(&self) -> u64 {
        self.counters.resolved_conflicts
    }

    /// Decides whether all `targets` can be true at the same time.
    pub(crate) fn solve<Graph: AigGraph>(
        &mut self,
        graph: &Graph,
        targets: &[Literal],
        selector: &mut dyn NodeSelector,
        options: &SolverOptions,
        scope: ModelScope,
    ) -> SatisfactionResult {
        self.start_call(graph, targets, options);

        let result = if self.assign_targets(targets) {
            match self.search(graph, selector, 0) {
                SearchOutcome::Satisfied => {
                    SatisfactionResult::Satisfiable(self.extract_model(graph, scope))
                }
                SearchOutcome::Conflict(learned) => {
                    cbs_assert_simple!(self.analyser.asserting(learned).is_none());
                    SatisfactionResult::Unsatisfiable
                }
                SearchOutcome::Undecided => SatisfactionResult::Undecided,
            }
        } else {
            trace!("The targets contradict each other");
            SatisfactionResult::Unsatisfiable
        };

        // a call which exceeded its limits is undecided, even if the search ended afterwards
        let result = if self.record_limit_failure() {
            SatisfactionResult::Undecided
        } else {
            result
        };

        debug!(
            "Solved {} target(s): {}, conflicts = {}, peak frontier = {}",
            targets.len(),
            result.status_code(),
            self.counters.resolved_conflicts,
            self.counters.peak_frontier_size
        );

        self.end_call();
        result
    }

    fn start_call<Graph: AigGraph>(
        &mut self,
        graph: &Graph,
        targets: &[Literal],
        options: &SolverOptions,
    ) {
        cbs_assert_simple!(self.assignments.num_trail_entries() == 0);
        cbs_assert_simple!(self.frontier.is_empty());

        let num_nodes = graph.num_nodes();
        self.assignments.grow(num_nodes);
        self.clauses.grow(num_nodes);
        self.analyser.grow(num_nodes);
        self.propagator.grow(num_nodes);
        self.activity.grow(num_nodes);

        self.limits = CallLimits {
            conflicts: options.conflict_limit,
            frontier_size: options.justification_limit,
        };
        self.counters = CallCounters::default();

        self.propagator.set_mode(options.propagation_mode);
        self.propagator.start_call(graph, targets);
    }

    /// Unassigns every node and forgets everything learned during the call.
    fn end_call(&mut self) {
        self.assignments.cancel_until(0);
        self.frontier.clear();
        self.clauses.clear();
        self.analyser.clear();
        self.activity.clear();
        self.propagator.end_call();

        self.statistics.peak_frontier_size = self
            .statistics
            .peak_frontier_size
            .max(self.counters.peak_frontier_size as u64);
    }

    /// Assigns the constant node and the targets at the root. Returns false if a target is false
    /// under the assignments made before it.
    fn assign_targets(&mut self, targets: &[Literal]) -> bool {
        self.assignments.assign(Literal::TRUE, 0, Reason::Decision);

        for &target in targets {
            match self.assignments.literal_value(target) {
                Some(true) => {}
                Some(false) => return false,
                None => self.assignments.assign(target, 0, Reason::Decision),
            }
        }
        true
    }

    fn limits_exceeded(&self) -> bool {
        self.counters.peak_frontier_size > self.limits.frontier_size
            || self.counters.resolved_conflicts > self.limits.conflicts
    }

    /// Returns whether the call exceeded one of its limits, accounting the failure if so.
    fn record_limit_failure(&mut self) -> bool {
        if self.counters.peak_frontier_size > self.limits.frontier_size {
            self.statistics.justification_limit_failures += 1;
            true
        } else if self.counters.resolved_conflicts > self.limits.conflicts {
            self.statistics.conflict_limit_failures += 1;
            true
        } else {
            false
        }
    }

    /// Propagates the assignments of `level` and branches on the justification frontier until
    /// either every false gate is justified or both values of a decision have failed.
    fn search<Graph: AigGraph>(
        &mut self,
        graph: &Graph,
        selector: &mut dyn NodeSelector,
        level: u32,
    ) -> SearchOutcome {
        if let Err(conflict) = self.propagate(graph, level) {
            let learned = self.analyser.analyse(
                conflict,
                &self.assignments,
                &mut self.clauses,
                &mut self.statistics,
            );
            return SearchOutcome::Conflict(learned);
        }

        if self.frontier.is_empty() {
            return SearchOutcome::Satisfied;
        }
        self.counters.peak_frontier_size = self.counters.peak_frontier_size.max(self.frontier.len());
        if self.limits_exceeded() {
            return SearchOutcome::Undecided;
        }

        let trail_bound = self.assignments.num_trail_entries();
        let frontier_snapshot = match self.propagator.mode() {
            // the frontier is compacted in place during propagation, so the window is copied
            PropagationMode::Frontier => self.frontier.store(),
            PropagationMode::Fanout => self.frontier.save_point(),
        };

        let gate = self.select_gate(graph, selector);
        let decision = decision_literal(graph, gate);

        let first = match self.decide(graph, selector, decision, level + 1) {
            SearchOutcome::Conflict(learned) => learned,
            outcome => return outcome,
        };
        if self.analyser.asserting(first) != Some(decision.node()) {
            trace!("Backjumping over the decision {decision} at level {}", level + 1);
            return SearchOutcome::Conflict(first);
        }

        self.assignments.cancel_until(trail_bound);
        self.frontier.restore(frontier_snapshot);

        let second = match self.decide(graph, selector, !decision, level + 1) {
            SearchOutcome::Conflict(learned) => learned,
            outcome => return outcome,
        };
        if self.analyser.asserting(second) != Some(decision.node()) {
            trace!("Backjumping over the decision {} at level {}", !decision, level + 1);
            return SearchOutcome::Conflict(second);
        }

        let resolved = self.analyser.resolve(
            first,
            second,
            &self.assignments,
            &mut self.clauses,
            &mut self.statistics,
        );
        self.bump_activities(resolved);
        self.counters.resolved_conflicts += 1;
        self.statistics.resolved_conflicts += 1;
        SearchOutcome::Conflict(resolved)
    }

    fn decide<Graph: AigGraph>(
        &mut self,
        graph: &Graph,
        selector: &mut dyn NodeSelector,
        decision: Literal,
        level: u32,
    ) -> SearchOutcome {
        trace!("Deciding {decision} at level {level}");
        self.statistics.decisions += 1;
        self.assignments.assign(decision, level, Reason::Decision);
        self.search(graph, selector, level)
    }

    fn select_gate<Graph: AigGraph>(
        &self,
        graph: &Graph,
        selector: &mut dyn NodeSelector,
    ) -> NodeId {
        let context = SelectionContext::new(
            graph,
            self.frontier.window(),
            self.activity.activities(),
        );
        match selector.select_node(&context) {
            Some(gate) => {
                cbs_assert_moderate!(
                    self.frontier.window().contains(&gate),
                    "The selected node must be part of the justification frontier"
                );
                gate
            }
            None => panic!("{selector:?} did not select a node from a non-empty frontier"),
        }
    }

    /// Propagates the pending assignments at `level`; in fanout mode the frontier is rebuilt
    /// from the assignments made since the last fixpoint.
    fn propagate<Graph: AigGraph>(&mut self, graph: &Graph, level: u32) -> Result<(), Conflict> {
        let trail_start = self.assignments.propagation_head();
        let mut context = PropagationContext {
            graph,
            assignments: &mut self.assignments,
            clauses: &mut self.clauses,
            frontier: &mut self.frontier,
            statistics: &mut self.statistics,
        };
        self.propagator.propagate(&mut context, level)?;
        if self.propagator.mode() == PropagationMode::Fanout {
            self.propagator.rebuild_frontier(&mut context, trail_start);
        }
        Ok(())
    }

    fn bump_activities(&mut self, learned: LearnedId) {
        if let Some(asserting) = self.analyser.asserting(learned) {
            self.activity.bump(asserting);
        }
        for &node in self.analyser.body(learned) {
            self.activity.bump(node);
        }
    }

    fn extract_model<Graph: AigGraph>(&self, graph: &Graph, scope: ModelScope) -> Model {
        let mut inputs = Vec::new();
        let mut node_literals = Vec::new();
        for &literal in self.assignments.trail() {
            let node = literal.node();
            if node.is_constant() {
                continue;
            }
            if let Some(index) = graph.input_index(node) {
                inputs.push((index, literal.polarity()));
            }
            if scope == ModelScope::AllNodes {
                node_literals.push(literal);
            }
        }
        Model::new(inputs, node_literals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::Aig;
    use crate::branching::node_selection::create_node_selector;
    use crate::options::BranchingHeuristic;

    /// `u ^ v` for `u = a & b` and `v = b & a`, which can never be true.
    fn xor_of_equal_gates() -> (Aig, Literal) {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let u = aig.add_and(a, b).unwrap();
        let v = aig.add_and(b, a).unwrap();
        let miter = aig.add_xor(u, v).unwrap();
        (aig, miter)
    }

    fn assert_levels_non_decreasing(assignments: &Assignments) {
        let levels = assignments
            .trail()
            .iter()
            .map(|literal| assignments.level(literal.node()))
            .collect::<Vec<_>>();
        assert!(
            levels.windows(2).all(|pair| pair[0] <= pair[1]),
            "the trail levels {levels:?} decrease"
        );
    }

    /// The engine after the root propagation of `target`, together with the first decision the
    /// search takes.
    fn engine_at_first_decision(aig: &Aig, target: Literal) -> (CircuitSatEngine, Literal) {
        let mut engine = CircuitSatEngine::default();
        let mut selector = create_node_selector(BranchingHeuristic::HighestId);
        engine.start_call(aig, &[target], &SolverOptions::default());
        assert!(engine.assign_targets(&[target]));
        assert!(engine.propagate(aig, 0).is_ok());
        assert_levels_non_decreasing(&engine.assignments);

        let gate = engine.select_gate(aig, selector.as_mut());
        let decision = decision_literal(aig, gate);
        (engine, decision)
    }

    /// Assigns `decision` at level 1 and analyses the conflict it runs into.
    fn failing_branch(engine: &mut CircuitSatEngine, aig: &Aig, decision: Literal) -> LearnedId {
        engine.assignments.assign(decision, 1, Reason::Decision);
        let conflict = match engine.propagate(aig, 1) {
            Err(conflict) => conflict,
            Ok(()) => panic!("{decision} does not fail by propagation alone"),
        };
        assert_levels_non_decreasing(&engine.assignments);
        engine.analyser.analyse(
            conflict,
            &engine.assignments,
            &mut engine.clauses,
            &mut engine.statistics,
        )
    }

    #[test]
    fn trail_levels_never_decrease_across_both_branches() {
        let (aig, miter) = xor_of_equal_gates();
        let (mut engine, decision) = engine_at_first_decision(&aig, miter);
        let trail_bound = engine.assignments.num_trail_entries();
        let snapshot = engine.frontier.store();

        let first = failing_branch(&mut engine, &aig, decision);
        assert_eq!(engine.analyser.asserting(first), Some(decision.node()));

        engine.assignments.cancel_until(trail_bound);
        engine.frontier.restore(snapshot);
        assert_levels_non_decreasing(&engine.assignments);

        let second = failing_branch(&mut engine, &aig, !decision);
        assert_eq!(engine.analyser.asserting(second), Some(decision.node()));

        engine.end_call();
        assert_eq!(engine.assignments.num_trail_entries(), 0);
    }

    #[test]
    fn learned_clause_becomes_unit_after_backjumping() {
        let (aig, miter) = xor_of_equal_gates();
        let (mut engine, decision) = engine_at_first_decision(&aig, miter);
        let trail_bound = engine.assignments.num_trail_entries();
        let snapshot = engine.frontier.store();

        let _ = failing_branch(&mut engine, &aig, decision);
        engine.assignments.cancel_until(trail_bound);
        engine.frontier.restore(snapshot);
        // the second branch goes through the target, so its clause has a body
        let learned = failing_branch(&mut engine, &aig, !decision);
        let clause = engine
            .analyser
            .clause(learned)
            .expect("the clause of the second branch is materialised");
        let literals = engine.clauses.literals(clause).to_vec();
        assert!(literals
            .iter()
            .all(|&literal| engine.assignments.is_literal_false(literal)));

        let backjump_level = literals[1..]
            .iter()
            .map(|literal| engine.assignments.level(literal.node()))
            .max()
            .unwrap();
        let bound = engine
            .assignments
            .trail()
            .iter()
            .position(|literal| engine.assignments.level(literal.node()) > backjump_level)
            .unwrap();
        engine.assignments.cancel_until(bound);

        assert!(!engine.assignments.is_assigned(literals[0].node()));
        assert!(literals[1..]
            .iter()
            .all(|&literal| engine.assignments.is_literal_false(literal)));

        let result = engine.clauses.propagate_literal(
            !literals[1],
            &mut engine.assignments,
            backjump_level,
            &mut engine.statistics,
        );
        assert!(result.is_ok());
        assert!(engine.assignments.is_literal_true(literals[0]));
        assert_eq!(
            engine.assignments.reason(literals[0].node()),
            Reason::Clause(clause)
        );
        assert_eq!(engine.assignments.level(literals[0].node()), backjump_level);
    }
}
