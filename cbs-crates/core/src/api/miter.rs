//! Solving every output of a miter.
//!
//! A miter is a circuit whose outputs are true exactly when two circuits it compares disagree. An
//! output which can never be true proves the compared circuits equivalent on that output; a
//! satisfying assignment is a counter-example.
use log::debug;
use log::warn;

use super::results::Model;
use super::results::SatisfactionResult;
use crate::aig::AigGraph;
use crate::basic_types::Literal;
use crate::CircuitSolver;

/// The outcome for one output of a miter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStatus {
    /// The output can never be true.
    Proved,
    /// The output is true under the counter-example.
    Disproved(Model),
    /// The solver exceeded its limits.
    Undecided,
}

/// Decides for each of `outputs` whether it can be true, one call per output.
///
/// Constant outputs are decided without calling the solver; a constant-true output is disproved by
/// the empty counter-example. The statistics of the solver are logged afterwards if
/// [`SolverOptions::verbose`](crate::options::SolverOptions::verbose) is set.
pub fn solve_miter<Graph: AigGraph>(
    solver: &mut CircuitSolver<'_, Graph>,
    outputs: &[Literal],
) -> Vec<OutputStatus> {
    if outputs.is_empty() {
        warn!("The miter does not have any outputs");
    }

    let statuses: Vec<OutputStatus> = outputs
        .iter()
        .map(|&output| {
            if output == Literal::FALSE {
                return OutputStatus::Proved;
            }
            if output == Literal::TRUE {
                return OutputStatus::Disproved(Model::default());
            }
            match solver.solve(output) {
                SatisfactionResult::Satisfiable(model) => OutputStatus::Disproved(model),
                SatisfactionResult::Unsatisfiable => OutputStatus::Proved,
                SatisfactionResult::Undecided => OutputStatus::Undecided,
            }
        })
        .collect();

    let count = |predicate: fn(&OutputStatus) -> bool| {
        statuses.iter().filter(|status| predicate(status)).count()
    };
    debug!(
        "Miter with {} outputs: {} proved, {} disproved, {} undecided",
        statuses.len(),
        count(|status| matches!(status, OutputStatus::Proved)),
        count(|status| matches!(status, OutputStatus::Disproved(_))),
        count(|status| matches!(status, OutputStatus::Undecided)),
    );

    if solver.options().verbose {
        solver.log_statistics();
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aig::Aig;

    #[test]
    fn outputs_are_decided_independently() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let u = aig.add_and(a, b).unwrap();
        let v = aig.add_and(b, a).unwrap();
        let equal = aig.add_xor(u, v).unwrap();
        let different = aig.add_xor(u, a).unwrap();

        let mut solver = CircuitSolver::new(&aig);
        let statuses = solve_miter(
            &mut solver,
            &[equal, different, Literal::FALSE, Literal::TRUE],
        );

        assert_eq!(statuses[0], OutputStatus::Proved);
        let OutputStatus::Disproved(model) = &statuses[1] else {
            panic!("u ^ a is true for a = 1, b = 0");
        };
        let values = aig.evaluate(&model.to_input_vector(2)).unwrap();
        assert!(different.evaluate(values[different.node()]));
        assert_eq!(statuses[2], OutputStatus::Proved);
        assert_eq!(statuses[3], OutputStatus::Disproved(Model::default()));
        assert_eq!(solver.statistics().num_calls(), 2);
    }
}
