use super::assignments::Assignments;
use super::reason::Reason;
use super::solver_statistics::EngineStatistics;
use crate::basic_types::Literal;
use crate::cbs_assert_advanced;
use crate::cbs_assert_moderate;
use crate::cbs_assert_simple;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A reference to a learned clause in the [`ClauseDatabase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ClauseHandle {
    id: u32,
}

impl StorageKey for ClauseHandle {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseHandle { id: index as u32 }
    }
}

impl std::fmt::Display for ClauseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}

/// The literals of a clause live at `start..start + len` in the literal arena. `next[i]` links the
/// clause into the watch list of its `i`-th literal.
#[derive(Debug, Clone, Copy)]
struct ClauseRecord {
    start: u32,
    len: u32,
    next: [Option<ClauseHandle>; 2],
}

/// The place holding the link to the clause currently visited in a watch list.
#[derive(Debug, Clone, Copy)]
enum WatchLink {
    Head(Literal),
    Next(ClauseHandle),
}

/// Arena of learned clauses with a two-watched-literal index.
///
/// The first two literals of a clause are watched. A clause watching literal `l` is stored in the
/// list keyed by `~l`, so that the list can be visited as soon as `~l` is assigned. The lists are
/// singly linked through the clause records themselves.
///
/// Clauses are never removed individually; [`ClauseDatabase::clear`] truncates the arena and
/// resets only the watch lists which were used.
#[derive(Debug, Default)]
pub(crate) struct ClauseDatabase {
    literals: Vec<Literal>,
    clauses: KeyedVec<ClauseHandle, ClauseRecord>,
    watch_heads: KeyedVec<Literal, Option<ClauseHandle>>,
    touched_watches: Vec<Literal>,
}

impl ClauseDatabase {
    pub(crate) fn grow(&mut self, num_nodes: usize) {
        if self.watch_heads.len() < 2 * num_nodes {
            self.watch_heads.resize(2 * num_nodes, None);
        }
    }

    #[cfg(test)]
    pub(crate) fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub(crate) fn literals(&self, clause: ClauseHandle) -> &[Literal] {
        let record = &self.clauses[clause];
        &self.literals[record.start as usize..(record.start + record.len) as usize]
    }

    /// Adds a clause and watches its first two literals.
    pub(crate) fn add_clause(&mut self, literals: &[Literal]) -> ClauseHandle {
        cbs_assert_simple!(
            literals.len() >= 2,
            "A watched clause must have at least two literals"
        );

        let clause = self.clauses.push(ClauseRecord {
            start: self.literals.len() as u32,
            len: literals.len() as u32,
            next: [None, None],
        });
        self.literals.extend_from_slice(literals);

        self.watch(clause, literals[0]);
        self.watch(clause, literals[1]);
        clause
    }

    fn watch(&mut self, clause: ClauseHandle, literal: Literal) {
        let key = !literal;
        if self.watch_heads[key].is_none() {
            self.touched_watches.push(key);
        }

        let record = self.clauses[clause];
        let position = record.start as usize;
        cbs_assert_moderate!(
            self.literals[position] == literal || self.literals[position + 1] == literal
        );
        let slot = usize::from(self.literals[position + 1] == literal);

        self.clauses[clause].next[slot] = self.watch_heads[key];
        self.watch_heads[key] = Some(clause);
    }

    fn follow(&self, link: WatchLink) -> Option<ClauseHandle> {
        match link {
            WatchLink::Head(literal) => self.watch_heads[literal],
            WatchLink::Next(clause) => self.clauses[clause].next[1],
        }
    }

    fn set_link(&mut self, link: WatchLink, target: Option<ClauseHandle>) {
        match link {
            WatchLink::Head(literal) => self.watch_heads[literal] = target,
            WatchLink::Next(clause) => self.clauses[clause].next[1] = target,
        }
    }

    /// Visits every clause watching `~true_literal`, which has just become false.
    ///
    /// Unit clauses assign their first literal at `level`. Returns the clause whose literals are all
    /// false, if there is one.
    pub(crate) fn propagate_literal(
        &mut self,
        true_literal: Literal,
        assignments: &mut Assignments,
        level: u32,
        statistics: &mut EngineStatistics,
    ) -> Result<(), ClauseHandle> {
        let falsified = !true_literal;
        let mut link = WatchLink::Head(true_literal);

        while let Some(clause) = self.follow(link) {
            statistics.clause_propagations += 1;

            let record = self.clauses[clause];
            let start = record.start as usize;
            let end = start + record.len as usize;

            // place the falsified literal at position 1
            if self.literals[start] == falsified {
                self.literals.swap(start, start + 1);
                self.clauses[clause].next.swap(0, 1);
            }
            cbs_assert_simple!(self.literals[start + 1] == falsified);

            let first = self.literals[start];
            if assignments.is_literal_true(first) {
                link = WatchLink::Next(clause);
                continue;
            }

            let replacement =
                (start + 2..end).find(|&index| !assignments.is_literal_false(self.literals[index]));
            if let Some(index) = replacement {
                self.literals.swap(start + 1, index);
                // unlink from this list, the link now points at the following clause
                let following = self.clauses[clause].next[1];
                self.set_link(link, following);
                self.watch(clause, self.literals[start + 1]);
                continue;
            }

            match assignments.literal_value(first) {
                None => {
                    assignments.assign(first, level, Reason::Clause(clause));
                    link = WatchLink::Next(clause);
                }
                Some(false) => {
                    statistics.clause_conflicts += 1;
                    return Err(clause);
                }
                Some(true) => link = WatchLink::Next(clause),
            }
        }

        Ok(())
    }

    /// Removes all clauses and empties the watch lists which were used.
    pub(crate) fn clear(&mut self) {
        self.literals.clear();
        self.clauses.clear();
        for literal in self.touched_watches.drain(..) {
            self.watch_heads[literal] = None;
        }
        cbs_assert_advanced!(self.watch_heads.iter().all(Option::is_none));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::NodeId;

    fn literal(node: u32, value: bool) -> Literal {
        Literal::with_value(NodeId::new(node), value)
    }

    fn setup(num_nodes: usize) -> (ClauseDatabase, Assignments, EngineStatistics) {
        let mut clauses = ClauseDatabase::default();
        clauses.grow(num_nodes);
        let mut assignments = Assignments::default();
        assignments.grow(num_nodes);
        (clauses, assignments, EngineStatistics::default())
    }

    #[test]
    fn unit_clause_assigns_first_literal() {
        let (mut clauses, mut assignments, mut statistics) = setup(4);
        let clause = clauses.add_clause(&[literal(1, true), literal(2, true)]);

        assignments.assign(literal(2, false), 0, Reason::Decision);
        let result =
            clauses.propagate_literal(literal(2, false), &mut assignments, 0, &mut statistics);

        assert!(result.is_ok());
        assert_eq!(assignments.value(NodeId::new(1)), Some(true));
        assert_eq!(assignments.reason(NodeId::new(1)), Reason::Clause(clause));
    }

    #[test]
    fn falsified_clause_is_reported() {
        let (mut clauses, mut assignments, mut statistics) = setup(4);
        let clause = clauses.add_clause(&[literal(1, true), literal(2, true)]);

        assignments.assign(literal(1, false), 0, Reason::Decision);
        assignments.assign(literal(2, false), 1, Reason::Decision);
        let result =
            clauses.propagate_literal(literal(2, false), &mut assignments, 1, &mut statistics);

        assert_eq!(result, Err(clause));
        assert_eq!(statistics.clause_conflicts, 1);
    }

    #[test]
    fn watch_moves_to_unassigned_literal() {
        let (mut clauses, mut assignments, mut statistics) = setup(5);
        let clause = clauses.add_clause(&[literal(1, true), literal(2, true), literal(3, true)]);

        assignments.assign(literal(1, false), 0, Reason::Decision);
        let result =
            clauses.propagate_literal(literal(1, false), &mut assignments, 0, &mut statistics);

        assert!(result.is_ok());
        assert!(!assignments.is_assigned(NodeId::new(2)));
        assert_eq!(clauses.literals(clause)[1], literal(3, true));
        assert_eq!(clauses.watch_heads[literal(1, false)], None);
        assert_eq!(clauses.watch_heads[literal(3, false)], Some(clause));

        // the clause now becomes unit on its new watch
        assignments.assign(literal(3, false), 1, Reason::Decision);
        let result =
            clauses.propagate_literal(literal(3, false), &mut assignments, 1, &mut statistics);
        assert!(result.is_ok());
        assert_eq!(assignments.value(NodeId::new(2)), Some(true));
    }

    #[test]
    fn satisfied_clause_is_skipped() {
        let (mut clauses, mut assignments, mut statistics) = setup(4);
        let _ = clauses.add_clause(&[literal(1, true), literal(2, true), literal(3, true)]);

        assignments.assign(literal(1, true), 0, Reason::Decision);
        assignments.assign(literal(2, false), 0, Reason::Decision);
        let result =
            clauses.propagate_literal(literal(2, false), &mut assignments, 0, &mut statistics);

        assert!(result.is_ok());
        assert!(!assignments.is_assigned(NodeId::new(3)));
    }

    #[test]
    fn clear_resets_used_watch_lists() {
        let (mut clauses, _, _) = setup(4);
        let _ = clauses.add_clause(&[literal(1, true), literal(2, false)]);
        let _ = clauses.add_clause(&[literal(2, false), literal(3, true)]);

        clauses.clear();

        assert_eq!(clauses.num_clauses(), 0);
        assert!(clauses.touched_watches.is_empty());
        assert!(clauses.watch_heads.iter().all(Option::is_none));
    }
}
