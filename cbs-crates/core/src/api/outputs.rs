use std::fmt::Display;

use itertools::Itertools;

use crate::basic_types::Literal;
#[cfg(doc)]
use crate::CircuitSolver;

/// The result of a call to [`CircuitSolver::solve`] and its variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatisfactionResult {
    /// The targets can be true at the same time; the [`Model`] is an assignment which shows it.
    Satisfiable(Model),
    /// The targets cannot be true at the same time.
    Unsatisfiable,
    /// The conflict limit or the justification limit was exceeded before the call was decided.
    Undecided,
}

impl SatisfactionResult {
    /// The status code of the result: `1` for unsatisfiable, `0` for satisfiable and `-1` for
    /// undecided.
    pub fn status_code(&self) -> i32 {
        match self {
            SatisfactionResult::Satisfiable(_) => 0,
            SatisfactionResult::Unsatisfiable => 1,
            SatisfactionResult::Undecided => -1,
        }
    }

    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Satisfiable(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Unsatisfiable)
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SatisfactionResult::Satisfiable(model) => Some(model),
            _ => None,
        }
    }
}

/// A satisfying assignment.
///
/// The inputs are listed in the order in which they were assigned during the search, as pairs of
/// the position of the input and its value. Inputs which do not appear were not needed to satisfy
/// the targets and may take any value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    inputs: Vec<(usize, bool)>,
    node_literals: Vec<Literal>,
}

impl Model {
    pub(crate) fn new(inputs: Vec<(usize, bool)>, node_literals: Vec<Literal>) -> Self {
        Model {
            inputs,
            node_literals,
        }
    }

    pub fn inputs(&self) -> &[(usize, bool)] {
        &self.inputs
    }

    /// The literals which were true for every assigned node, in assignment order.
    ///
    /// Only recorded by [`CircuitSolver::solve_pair`] and [`CircuitSolver::solve_batch`].
    pub fn node_literals(&self) -> &[Literal] {
        &self.node_literals
    }

    /// The value of the input at position `index`, if it was assigned.
    pub fn input_value(&self, index: usize) -> Option<bool> {
        self.inputs
            .iter()
            .find(|(input, _)| *input == index)
            .map(|&(_, value)| value)
    }

    /// The values of all `num_inputs` inputs, where unassigned inputs are false.
    pub fn to_input_vector(&self, num_inputs: usize) -> Vec<bool> {
        let mut values = vec![false; num_inputs];
        for &(index, value) in &self.inputs {
            if index < num_inputs {
                values[index] = value;
            }
        }
        values
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.inputs
                .iter()
                .map(|&(index, value)| format!("i{index}={}", u8::from(value)))
                .join(" ")
        )
    }
}
