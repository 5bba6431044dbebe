pub mod miter;
mod outputs;
pub(crate) mod solver;

pub mod results {
    //! Contains the outputs of the [`CircuitSolver`](crate::CircuitSolver).
    pub use super::outputs::Model;
    pub use super::outputs::SatisfactionResult;
}

