use std::time::Duration;

use crate::create_statistics_struct;
use crate::results::SatisfactionResult;
use crate::statistics::moving_averages::CumulativeMovingAverage;
use crate::statistics::moving_averages::MovingAverage;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// Structure responsible for storing the statistics of the solver, accumulated over all calls
/// until they are cleared.
#[derive(Debug, Default, Clone)]
pub struct SolverStatistics {
    /// The calls which were proven satisfiable
    pub satisfiable: OutcomeStatistics,
    /// The calls which were proven unsatisfiable
    pub unsatisfiable: OutcomeStatistics,
    /// The calls which ran out of resources
    pub undecided: OutcomeStatistics,
    /// Core statistics of the search engine (e.g. the number of decisions)
    pub engine: EngineStatistics,
    /// The total time spent in all calls
    pub time_spent_in_solver: Duration,
}

impl SolverStatistics {
    pub fn num_calls(&self) -> u64 {
        self.satisfiable.calls + self.unsatisfiable.calls + self.undecided.calls
    }

    /// Accounts one call with the given result, `conflicts` conflicts and duration `elapsed`.
    pub(crate) fn record_call(
        &mut self,
        result: &SatisfactionResult,
        conflicts: u64,
        elapsed: Duration,
    ) {
        let outcome = match result {
            SatisfactionResult::Satisfiable(_) => &mut self.satisfiable,
            SatisfactionResult::Unsatisfiable => &mut self.unsatisfiable,
            SatisfactionResult::Undecided => &mut self.undecided,
        };
        outcome.calls += 1;
        outcome.conflicts += conflicts;
        outcome.average_conflicts.add_term(conflicts);
        outcome.time_micros += elapsed.as_micros() as u64;
        self.time_spent_in_solver += elapsed;
    }

    pub(crate) fn log(&self, statistic_logger: StatisticLogger, verbose: bool) {
        Statistic::log(&self.num_calls(), statistic_logger.attach_to_prefix("calls"));
        self.unsatisfiable
            .log(statistic_logger.attach_to_prefix("unsat"));
        self.satisfiable.log(statistic_logger.attach_to_prefix("sat"));
        self.undecided.log(statistic_logger.attach_to_prefix("undecided"));
        // `f64` has an inherent `log` method
        Statistic::log(
            &self.time_spent_in_solver.as_secs_f64(),
            statistic_logger.attach_to_prefix("solve_time"),
        );
        if verbose {
            self.engine.log(statistic_logger.attach_to_prefix("engine"));
        }
    }
}

create_statistics_struct!(
    /// Statistics of the calls which ended with one particular outcome
    OutcomeStatistics {
        /// The number of calls
        calls: u64,
        /// The number of conflicts summed over these calls
        conflicts: u64,
        /// The average number of conflicts per call
        average_conflicts: CumulativeMovingAverage<u64>,
        /// The time spent in these calls in microseconds
        time_micros: u64,
});

create_statistics_struct!(
    /// Core statistics of the search engine
    EngineStatistics {
        /// The number of decisions taken
        decisions: u64,
        /// The number of gate evaluations during structural propagation
        structural_propagations: u64,
        /// The number of watched clauses visited during clause propagation
        clause_propagations: u64,
        /// The number of gate outputs implied by their fanins (fanout propagation only)
        forward_implications: u64,
        /// The number of conflicts found during propagation
        propagation_conflicts: u64,
        /// The number of conflicts found in learned clauses
        clause_conflicts: u64,
        /// The number of learned clauses added to the clause database
        learned_clauses: u64,
        /// The number of times both branches of a decision failed
        resolved_conflicts: u64,
        /// The largest justification frontier seen
        peak_frontier_size: u64,
        /// The number of calls stopped because the frontier outgrew its limit
        justification_limit_failures: u64,
        /// The number of calls stopped because the conflicts exceeded their limit
        conflict_limit_failures: u64,
        /// The time spent rebuilding the justification frontier in microseconds (fanout propagation only)
        frontier_rebuild_micros: u64,
});
