use std::ops::Range;

use log::trace;

use super::assignments::Assignments;
use super::clause_database::ClauseDatabase;
use super::clause_database::ClauseHandle;
use super::propagation::Conflict;
use super::reason::Reason;
use super::solver_statistics::EngineStatistics;
use crate::basic_types::Literal;
use crate::basic_types::NodeId;
use crate::cbs_assert_moderate;
use crate::cbs_assert_simple;
use crate::containers::KeyedVec;
use crate::containers::Queue;
use crate::containers::StorageKey;

/// A reference to a clause learned by the [`ConflictAnalyser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LearnedId {
    id: u32,
}

impl StorageKey for LearnedId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        LearnedId { id: index as u32 }
    }
}

/// A learned clause in terms of nodes: the negation of the current values of `asserting` and of
/// the nodes stored at `body` in the scratch buffer.
///
/// `asserting` is the decision of the conflict level. A record without an asserting node is a
/// refutation: the conflict only depends on the root assignments.
#[derive(Debug, Clone)]
struct LearnedRecord {
    asserting: Option<NodeId>,
    body: Range<usize>,
    #[cfg(test)]
    clause: Option<ClauseHandle>,
}

/// Derives learned clauses from conflicts.
///
/// Clauses are assembled in a scratch buffer; each finished clause is frozen in place, so the
/// buffer also keeps the node lists of every clause learned during the call. Clauses with at
/// least two literals are additionally copied into the [`ClauseDatabase`] to be watched.
#[derive(Debug, Default)]
pub(crate) struct ConflictAnalyser {
    scratch: Queue<NodeId>,
    learned: KeyedVec<LearnedId, LearnedRecord>,
    seen: KeyedVec<NodeId, bool>,
    seen_nodes: Vec<NodeId>,
    clause_literals: Vec<Literal>,
}

impl ConflictAnalyser {
    pub(crate) fn grow(&mut self, num_nodes: usize) {
        if self.seen.len() < num_nodes {
            self.seen.resize(num_nodes, false);
        }
    }

    pub(crate) fn asserting(&self, learned: LearnedId) -> Option<NodeId> {
        self.learned[learned].asserting
    }

    /// The nodes of the learned clause below its conflict level.
    pub(crate) fn body(&self, learned: LearnedId) -> &[NodeId] {
        self.scratch.slice(self.learned[learned].body.clone())
    }

    #[cfg(test)]
    pub(crate) fn clause(&self, learned: LearnedId) -> Option<ClauseHandle> {
        self.learned[learned].clause
    }

    /// Learns a clause from a conflict found during propagation.
    pub(crate) fn analyse(
        &mut self,
        conflict: Conflict,
        assignments: &Assignments,
        clauses: &mut ClauseDatabase,
        statistics: &mut EngineStatistics,
    ) -> LearnedId {
        cbs_assert_simple!(self.scratch.is_empty());

        match conflict {
            Conflict::Gate {
                gate,
                first,
                second,
            } => {
                self.scratch.push(gate);
                self.scratch.push(first);
                if let Some(second) = second {
                    self.scratch.push(second);
                }
            }
            Conflict::Clause(clause) => {
                for literal in clauses.literals(clause) {
                    self.scratch.push(literal.node());
                }
            }
        }

        let level = self.highest_level(assignments);
        self.derive_reason(level, assignments, clauses, statistics)
    }

    /// Combines the clauses learned in the two branches of one decision, both of which blame that
    /// decision, into a clause over the nodes assigned before it.
    pub(crate) fn resolve(
        &mut self,
        first: LearnedId,
        second: LearnedId,
        assignments: &Assignments,
        clauses: &mut ClauseDatabase,
        statistics: &mut EngineStatistics,
    ) -> LearnedId {
        cbs_assert_simple!(self.scratch.is_empty());
        cbs_assert_simple!(self.asserting(first).is_some());
        cbs_assert_simple!(self.asserting(first) == self.asserting(second));

        for learned in [first, second] {
            for position in self.learned[learned].body.clone() {
                let node = self.scratch[position];
                if !self.seen[node] {
                    self.mark(node);
                    self.scratch.push(node);
                }
            }
        }
        self.clear_marks();

        let level = self.highest_level(assignments);
        self.derive_reason(level, assignments, clauses, statistics)
    }

    fn highest_level(&self, assignments: &Assignments) -> u32 {
        self.scratch
            .window()
            .iter()
            .map(|&node| assignments.level(node))
            .max()
            .unwrap_or(0)
    }

    /// Replaces every node of the scratch window assigned at `level` by its reason until only the
    /// decision of `level` remains from that level; nodes of lower levels are kept.
    fn derive_reason(
        &mut self,
        level: u32,
        assignments: &Assignments,
        clauses: &mut ClauseDatabase,
        statistics: &mut EngineStatistics,
    ) -> LearnedId {
        if level == 0 {
            self.scratch.truncate(self.scratch.head());
            return self.learned.push(LearnedRecord {
                asserting: None,
                body: self.scratch.finish(),
                #[cfg(test)]
                clause: None,
            });
        }

        let mut asserting = None;
        let mut kept = self.scratch.head();
        let mut position = self.scratch.head();
        while position < self.scratch.tail() {
            let node = self.scratch[position];
            position += 1;
            if self.seen[node] {
                continue;
            }
            self.mark(node);

            let node_level = assignments.level(node);
            if node_level < level {
                self.scratch[kept] = node;
                kept += 1;
                continue;
            }
            cbs_assert_moderate!(node_level == level);

            match assignments.reason(node) {
                Reason::Decision => {
                    cbs_assert_simple!(
                        asserting.is_none(),
                        "A level above the root has exactly one decision"
                    );
                    asserting = Some(node);
                }
                Reason::StructuralUnary(cause) => self.scratch.push(cause),
                Reason::StructuralBinary(first, second) => {
                    self.scratch.push(first);
                    self.scratch.push(second);
                }
                Reason::Clause(clause) => {
                    for literal in &clauses.literals(clause)[1..] {
                        self.scratch.push(literal.node());
                    }
                }
            }
        }
        self.scratch.truncate(kept);
        self.clear_marks();
        cbs_assert_simple!(asserting.is_some());

        let body = self.scratch.finish();
        let clause = asserting
            .filter(|_| !body.is_empty())
            .map(|asserting| self.materialise(asserting, body.clone(), assignments, clauses));
        if clause.is_some() {
            statistics.learned_clauses += 1;
        }

        let learned = self.learned.push(LearnedRecord {
            asserting,
            body,
            #[cfg(test)]
            clause,
        });
        trace!(
            "Learned {:?} at level {level} blaming {:?} with {} lower-level nodes",
            learned,
            asserting,
            self.body(learned).len()
        );
        learned
    }

    /// Adds the learned clause to the clause database. The first literal is the asserting one and
    /// the second one is the literal assigned last among the others.
    fn materialise(
        &mut self,
        asserting: NodeId,
        body: Range<usize>,
        assignments: &Assignments,
        clauses: &mut ClauseDatabase,
    ) -> ClauseHandle {
        let falsified = |node: NodeId| match assignments.value(node) {
            Some(value) => Literal::with_value(node, !value),
            None => panic!("Learned clauses only contain assigned nodes, {node} is unassigned"),
        };

        self.clause_literals.clear();
        self.clause_literals.push(falsified(asserting));
        self.clause_literals
            .extend(self.scratch.slice(body).iter().map(|&node| falsified(node)));

        let latest = (1..self.clause_literals.len())
            .max_by_key(|&index| assignments.trail_position(self.clause_literals[index].node()))
            .unwrap_or(1);
        self.clause_literals.swap(1, latest);

        clauses.add_clause(&self.clause_literals)
    }

    fn mark(&mut self, node: NodeId) {
        self.seen[node] = true;
        self.seen_nodes.push(node);
    }

    fn clear_marks(&mut self) {
        for node in self.seen_nodes.drain(..) {
            self.seen[node] = false;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.scratch.clear();
        self.learned.clear();
        cbs_assert_simple!(self.seen_nodes.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32) -> NodeId {
        NodeId::new(id)
    }

    struct Fixture {
        analyser: ConflictAnalyser,
        assignments: Assignments,
        clauses: ClauseDatabase,
        statistics: EngineStatistics,
    }

    impl Fixture {
        fn new() -> Fixture {
            let mut analyser = ConflictAnalyser::default();
            analyser.grow(8);
            let mut assignments = Assignments::default();
            assignments.grow(8);
            let mut clauses = ClauseDatabase::default();
            clauses.grow(8);
            Fixture {
                analyser,
                assignments,
                clauses,
                statistics: EngineStatistics::default(),
            }
        }

        fn assign(&mut self, id: u32, value: bool, level: u32, reason: Reason) {
            self.assignments
                .assign(Literal::with_value(node(id), value), level, reason);
        }

        fn analyse(&mut self, conflict: Conflict) -> LearnedId {
            self.analyser.analyse(
                conflict,
                &self.assignments,
                &mut self.clauses,
                &mut self.statistics,
            )
        }

        fn resolve(&mut self, first: LearnedId, second: LearnedId) -> LearnedId {
            self.analyser.resolve(
                first,
                second,
                &self.assignments,
                &mut self.clauses,
                &mut self.statistics,
            )
        }
    }

    #[test]
    fn conflict_is_traced_back_to_the_decision() {
        let mut fixture = Fixture::new();
        fixture.assign(1, true, 1, Reason::Decision);
        fixture.assign(2, true, 2, Reason::Decision);
        fixture.assign(3, false, 2, Reason::StructuralBinary(node(2), node(1)));
        fixture.assign(4, true, 2, Reason::StructuralUnary(node(3)));

        let learned = fixture.analyse(Conflict::Gate {
            gate: node(4),
            first: node(1),
            second: None,
        });

        assert_eq!(fixture.analyser.asserting(learned), Some(node(2)));
        assert_eq!(fixture.analyser.body(learned), &[node(1)]);
        assert_eq!(fixture.statistics.learned_clauses, 1);
    }

    #[test]
    fn learned_clause_is_falsified_by_the_trail() {
        let mut fixture = Fixture::new();
        fixture.assign(1, false, 1, Reason::Decision);
        fixture.assign(5, true, 1, Reason::StructuralUnary(node(1)));
        fixture.assign(2, true, 2, Reason::Decision);
        fixture.assign(3, false, 2, Reason::StructuralBinary(node(2), node(5)));
        fixture.assign(4, true, 2, Reason::StructuralUnary(node(3)));

        let learned = fixture.analyse(Conflict::Gate {
            gate: node(4),
            first: node(1),
            second: Some(node(5)),
        });

        let clause = fixture
            .analyser
            .clause(learned)
            .expect("a clause with a body is materialised");
        let literals = fixture.clauses.literals(clause);
        assert_eq!(literals[0], Literal::with_value(node(2), false));
        assert!(literals
            .iter()
            .all(|&literal| fixture.assignments.is_literal_false(literal)));
    }

    #[test]
    fn root_level_conflict_is_a_refutation() {
        let mut fixture = Fixture::new();
        fixture.assign(1, true, 0, Reason::Decision);
        fixture.assign(2, true, 0, Reason::StructuralUnary(node(1)));

        let learned = fixture.analyse(Conflict::Gate {
            gate: node(2),
            first: node(1),
            second: None,
        });

        assert_eq!(fixture.analyser.asserting(learned), None);
        assert!(fixture.analyser.body(learned).is_empty());
        assert_eq!(fixture.analyser.clause(learned), None);
    }

    #[test]
    fn resolving_both_branches_blames_the_previous_decision() {
        let mut fixture = Fixture::new();
        fixture.assign(4, true, 0, Reason::Decision);
        fixture.assign(1, true, 1, Reason::Decision);

        fixture.assign(2, true, 2, Reason::Decision);
        fixture.assign(3, true, 2, Reason::StructuralUnary(node(2)));
        let first = fixture.analyse(Conflict::Gate {
            gate: node(3),
            first: node(1),
            second: None,
        });
        assert_eq!(fixture.analyser.asserting(first), Some(node(2)));

        fixture.assignments.cancel_until(2);
        fixture.assign(2, false, 2, Reason::Decision);
        fixture.assign(5, true, 2, Reason::StructuralUnary(node(2)));
        let second = fixture.analyse(Conflict::Gate {
            gate: node(5),
            first: node(1),
            second: Some(node(4)),
        });
        assert_eq!(fixture.analyser.asserting(second), Some(node(2)));
        assert_eq!(fixture.analyser.body(second), &[node(1), node(4)]);

        let resolved = fixture.resolve(first, second);
        assert_eq!(fixture.analyser.asserting(resolved), Some(node(1)));
        assert_eq!(fixture.analyser.body(resolved), &[node(4)]);
        // the earlier records are untouched
        assert_eq!(fixture.analyser.body(first), &[node(1)]);
    }

    #[test]
    fn resolving_root_level_bodies_is_a_refutation() {
        let mut fixture = Fixture::new();
        fixture.assign(4, true, 0, Reason::Decision);

        fixture.assign(2, true, 1, Reason::Decision);
        fixture.assign(3, true, 1, Reason::StructuralUnary(node(2)));
        let first = fixture.analyse(Conflict::Gate {
            gate: node(3),
            first: node(4),
            second: None,
        });

        fixture.assignments.cancel_until(1);
        fixture.assign(2, false, 1, Reason::Decision);
        let second = fixture.analyse(Conflict::Gate {
            gate: node(4),
            first: node(2),
            second: None,
        });

        let resolved = fixture.resolve(first, second);
        assert_eq!(fixture.analyser.asserting(resolved), None);
        assert!(fixture.analyser.body(resolved).is_empty());
    }

    #[test]
    fn clear_forgets_learned_records() {
        let mut fixture = Fixture::new();
        fixture.assign(1, true, 0, Reason::Decision);
        let _ = fixture.analyse(Conflict::Gate {
            gate: node(1),
            first: node(1),
            second: None,
        });

        fixture.analyser.clear();
        assert!(fixture.analyser.scratch.is_empty());
        assert_eq!(fixture.analyser.learned.len(), 0);
    }
}
