use std::time::Instant;

use log::warn;

use super::results::SatisfactionResult;
use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::branching::node_selection::create_node_selector;
use crate::branching::NodeSelector;
use crate::cbs_assert_simple;
use crate::containers::HashSet;
use crate::engine::CircuitSatEngine;
use crate::engine::ModelScope;
use crate::options::SolverOptions;
use crate::statistics::log_statistic_postfix;
use crate::statistics::SolverStatistics;
use crate::statistics::StatisticLogger;

/// Decides whether literals of an And-Inverter Graph can be true, using conflict-driven search
/// directly on the gates of the graph.
///
/// Every call is independent of the previous ones: the assignments and learned clauses are
/// discarded before a call returns. Only the [`SolverOptions`] and the accumulated
/// [`SolverStatistics`] are kept.
///
/// # Example
/// ```rust
/// # use cbs_core::aig::Aig;
/// # use cbs_core::results::SatisfactionResult;
/// # use cbs_core::CircuitSolver;
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// let b = aig.add_input();
/// let gate = aig.add_and(a, b).unwrap();
///
/// let mut solver = CircuitSolver::new(&aig);
///
/// // both inputs have to be true for the gate to be true
/// let result = solver.solve(gate);
/// let model = result.model().unwrap();
/// assert_eq!(model.input_value(0), Some(true));
/// assert_eq!(model.input_value(1), Some(true));
///
/// // but then `a` cannot be false
/// assert_eq!(solver.solve_pair(gate, !a), SatisfactionResult::Unsatisfiable);
/// ```
pub struct CircuitSolver<'graph, Graph: AigGraph> {
    graph: &'graph Graph,
    options: SolverOptions,
    node_selector: Box<dyn NodeSelector>,
    engine: CircuitSatEngine,
    statistics: SolverStatistics,
}

impl<Graph: AigGraph> std::fmt::Debug for CircuitSolver<'_, Graph> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitSolver")
            .field("options", &self.options)
            .field("node_selector", &self.node_selector)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<'graph, Graph: AigGraph> CircuitSolver<'graph, Graph> {
    /// Creates a solver for `graph` with the default [`SolverOptions`].
    pub fn new(graph: &'graph Graph) -> Self {
        CircuitSolver::with_options(graph, SolverOptions::default())
    }

    pub fn with_options(graph: &'graph Graph, options: SolverOptions) -> Self {
        if graph.num_nodes() <= 1 {
            warn!("The circuit solver was created for a graph without inputs or gates");
        }
        CircuitSolver {
            graph,
            options,
            node_selector: create_node_selector(options.branching_heuristic),
            engine: CircuitSatEngine::default(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn graph(&self) -> &'graph Graph {
        self.graph
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Replaces the options; the node selector is recreated if the branching heuristic changes.
    pub fn set_options(&mut self, options: SolverOptions) {
        if options.branching_heuristic != self.options.branching_heuristic {
            self.node_selector = create_node_selector(options.branching_heuristic);
        }
        self.options = options;
    }

    pub fn set_conflict_limit(&mut self, conflict_limit: u64) {
        self.options.conflict_limit = conflict_limit;
    }

    /// Uses `node_selector` for branching instead of the one given by
    /// [`SolverOptions::branching_heuristic`], until the heuristic is changed through
    /// [`CircuitSolver::set_options`].
    pub fn set_node_selector(&mut self, node_selector: Box<dyn NodeSelector>) {
        self.node_selector = node_selector;
    }

    /// Decides whether `target` can be true. A model only contains the primary inputs.
    pub fn solve(&mut self, target: Literal) -> SatisfactionResult {
        self.run(&[target], ModelScope::Inputs)
    }

    /// Decides whether `first` and `second` can be true at the same time. A model contains the
    /// literal of every assigned node.
    pub fn solve_pair(&mut self, first: Literal, second: Literal) -> SatisfactionResult {
        self.run(&[first, second], ModelScope::AllNodes)
    }

    /// Decides whether all `targets` can be true at the same time. A model contains the literal of
    /// every assigned node.
    pub fn solve_batch(&mut self, targets: &[Literal]) -> SatisfactionResult {
        let mut seen: HashSet<Literal> = HashSet::default();
        let targets: Vec<Literal> = targets
            .iter()
            .copied()
            .filter(|&target| seen.insert(target))
            .collect();
        self.run(&targets, ModelScope::AllNodes)
    }

    fn run(&mut self, targets: &[Literal], scope: ModelScope) -> SatisfactionResult {
        for target in targets {
            cbs_assert_simple!(
                target.node().id() < self.graph.num_nodes() as u32,
                "The target {target} does not belong to the graph"
            );
        }

        let started = Instant::now();
        let result = self.engine.solve(
            self.graph,
            targets,
            self.node_selector.as_mut(),
            &self.options,
            scope,
        );

        self.statistics.engine = *self.engine.statistics();
        self.statistics
            .record_call(&result, self.engine.last_call_conflicts(), started.elapsed());
        result
    }

    /// The statistics accumulated since the solver was created or the statistics were cleared.
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    pub fn clear_statistics(&mut self) {
        self.statistics = SolverStatistics::default();
        self.engine.clear_statistics();
    }

    /// Logs the statistics currently present in the solver.
    pub fn log_statistics(&self) {
        self.statistics
            .log(StatisticLogger::default(), self.options.verbose);
        log_statistic_postfix();
    }
}
