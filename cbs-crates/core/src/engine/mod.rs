//! The search engine: the trail, the learned clauses, propagation, conflict analysis and the
//! recursive search driving them.
mod activity;
mod assignments;
mod circuit_sat_engine;
mod clause_database;
mod conflict_analysis;
mod fanout_index;
mod propagation;
mod reason;
mod solver_statistics;

pub(crate) use circuit_sat_engine::CircuitSatEngine;
pub(crate) use circuit_sat_engine::ModelScope;
pub use solver_statistics::EngineStatistics;
pub use solver_statistics::OutcomeStatistics;
pub use solver_statistics::SolverStatistics;
