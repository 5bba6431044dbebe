//! # cbs-core
//! A conflict-driven SAT engine which works directly on And-Inverter Graphs.
//!
//! Instead of translating a circuit into clauses, the engine propagates the semantics of the AND
//! gates themselves. It branches on the *justification frontier*, the false gates of which
//! neither fanin is assigned yet, and learns clauses from the conflicts it finds; the learned
//! clauses are watched and propagated like in a clause-based solver.
//!
//! A call decides whether one or more literals of a graph can be true at the same time:
//! ```rust
//! # use cbs_core::aig::Aig;
//! # use cbs_core::CircuitSolver;
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let either = aig.add_or(a, b).unwrap();
//!
//! let mut solver = CircuitSolver::new(&aig);
//! assert!(solver.solve(either).is_satisfiable());
//! assert!(solver.solve_batch(&[either, !a, !b]).is_unsatisfiable());
//! ```
//!
//! Calls can end undecided when the conflict limit or the justification limit of the
//! [`options::SolverOptions`] is exceeded.
pub mod aig;
pub mod asserts;
pub(crate) mod basic_types;
pub mod branching;
pub mod containers;
pub(crate) mod engine;
pub mod options;
pub mod statistics;

pub use convert_case;

// All exports from the api module are exports directly from the crate, e.g.
// `use cbs_core::CircuitSolver;`
mod api;

pub use api::*;

pub use crate::api::solver::CircuitSolver;
pub use crate::basic_types::Literal;
pub use crate::basic_types::NodeId;
