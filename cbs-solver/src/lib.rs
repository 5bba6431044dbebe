//! # cbs-solver
//! A circuit-based SAT solver for combinational And-Inverter Graphs.
//!
//! This crate re-exports the engine of [`cbs_core`] and provides the `cbs-solver` binary, which
//! reads a circuit in the ASCII AIGER format and decides for every output whether it can be
//! true:
//! ```text
//! cbs-solver [--conflict-limit N] [--branching-heuristic max-fanin-fanout] circuit.aag
//! ```
//! See [`CircuitSolver`] for using the engine as a library.
pub use cbs_core as core;
pub use cbs_core::*;
