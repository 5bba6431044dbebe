use super::Direction;
use super::TieBreaker;

/// A tie-breaker which keeps the first variable that was considered among those with the best
/// value.
#[derive(Debug, Clone)]
pub struct InOrderTieBreaker<Var, Value> {
    selected: Option<(Var, Value)>,
    direction: Direction,
}

impl<Var, Value> InOrderTieBreaker<Var, Value> {
    pub fn new(direction: Direction) -> Self {
        InOrderTieBreaker {
            selected: None,
            direction,
        }
    }
}

impl<Var: Copy, Value: PartialOrd> TieBreaker<Var, Value> for InOrderTieBreaker<Var, Value> {
    fn consider(&mut self, variable: Var, value: Value) {
        let improves = match &self.selected {
            None => true,
            Some((_, best)) => match self.direction {
                Direction::Maximum => value > *best,
                Direction::Minimum => value < *best,
            },
        };
        if improves {
            self.selected = Some((variable, value));
        }
    }

    fn select(&mut self) -> Option<Var> {
        self.selected.take().map(|(variable, _)| variable)
    }

    fn get_direction(&self) -> Direction {
        self.direction
    }
}
