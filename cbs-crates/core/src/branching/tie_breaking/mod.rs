//! Tie-breakers decide which node is selected when several nodes share the best value.
mod in_order_tie_breaker;

pub use in_order_tie_breaker::InOrderTieBreaker;

/// Whether a [`TieBreaker`] looks for the largest or the smallest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximum,
    Minimum,
}

/// Selects one of the considered nodes with the best value according to its [`Direction`].
pub trait TieBreaker<Var, Value> {
    /// Offers `variable` with the given `value` for selection.
    fn consider(&mut self, variable: Var, value: Value);

    /// Returns the selected variable, if any was considered, and resets the tie-breaker.
    fn select(&mut self) -> Option<Var>;

    fn get_direction(&self) -> Direction;
}
