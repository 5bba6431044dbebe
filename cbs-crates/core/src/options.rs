//! Options which determine how the [`CircuitSolver`] behaves.
#[cfg(doc)]
use crate::CircuitSolver;

/// Options for the [`CircuitSolver`]; they are read at the start of every call and can only be
/// changed between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// The number of resolved conflicts after which a call gives up.
    pub conflict_limit: u64,
    /// The size of the justification frontier after which a call gives up.
    pub justification_limit: usize,
    /// How the node to branch on is picked from the justification frontier.
    pub branching_heuristic: BranchingHeuristic,
    /// How the gate semantics are propagated.
    pub propagation_mode: PropagationMode,
    /// Whether statistics of the engine itself are logged as well.
    pub verbose: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            conflict_limit: 1000,
            justification_limit: 500,
            branching_heuristic: BranchingHeuristic::default(),
            propagation_mode: PropagationMode::default(),
            verbose: false,
        }
    }
}

/// The heuristic used to choose which unjustified gate to branch on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingHeuristic {
    /// The gate with the highest node id.
    #[default]
    HighestId,
    /// The gate with the lowest node id.
    LowestId,
    /// The gate which occurred most often in resolved conflicts during the current call.
    MaxActivity,
    /// The gate with a fanin which has the largest number of references.
    MaxFaninFanout,
}

/// The manner in which the gate semantics are propagated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PropagationMode {
    /// Propagate backwards from assigned gates to their fanins and keep re-evaluating the
    /// justification frontier.
    #[default]
    Frontier,
    /// Additionally propagate forwards from fanins to the gates they feed, rebuilding the
    /// justification frontier after every fixpoint.
    Fanout,
}
