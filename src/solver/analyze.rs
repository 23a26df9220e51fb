use super::trail::{DecisionLevel, Reason, Value};
use super::{ClauseIdx, Solver};
use crate::formula::{Clause, Literal};
use log::trace;

/// The outcome of conflict analysis: a clause implied by the database that is
/// falsified by the current trail and becomes unit on `asserting` once the
/// trail is cut back to `backtrack_level`.
#[derive(Debug)]
pub(super) struct Learned {
    pub(super) clause: Clause,
    pub(super) asserting: Literal,
    pub(super) backtrack_level: DecisionLevel,
}

impl Solver {
    /// First-UIP conflict analysis.
    ///
    /// Starting from the conflicting clause, resolve away the most recently
    /// assigned variable of the conflict level until exactly one conflict-level
    /// variable is left. Variables from lower levels stay in the learned clause
    /// as they are met. Must not be called at the root level.
    pub(super) fn analyze_conflict(&self, conflict: ClauseIdx) -> Learned {
        let level = self.decision_level;
        assert!(level > DecisionLevel::ROOT, "conflict analysis at the root level");

        let mut seen = vec![false; self.trail.num_variables()];
        let mut learned = vec![];
        // seen variables of the conflict level that have not been resolved yet
        let mut frontier = 0;
        let mut trail_index = self.trail.len();
        let mut reason = &self.clauses[conflict.0];

        let uip = loop {
            for l in reason.literals() {
                let variable = l.variable();
                if seen[variable.index()] {
                    continue;
                }
                seen[variable.index()] = true;

                debug_assert_eq!(self.trail.value(l), Value::False);
                match self.trail.level(variable) {
                    Some(l_level) if l_level == level => frontier += 1,
                    Some(_) => learned.push(*l),
                    None => unreachable!("conflict clause literal {} is unassigned", l),
                }
            }
            debug_assert!(frontier > 0);

            let entry = loop {
                trail_index -= 1;
                let entry = &self.trail.assignments()[trail_index];
                if seen[entry.variable().index()] {
                    break entry;
                }
            };
            debug_assert_eq!(entry.level, level);

            if frontier == 1 {
                break entry.literal;
            }
            frontier -= 1;
            reason = match entry.reason {
                Reason::Propagated(idx) => &self.clauses[idx.0],
                Reason::Decision => unreachable!("decision {} resolved before the UIP", entry.literal),
            };
        };

        let backtrack_level = learned
            .iter()
            .filter_map(|l| self.trail.level(l.variable()))
            .max()
            .unwrap_or(DecisionLevel::ROOT);

        let asserting = uip.negated();
        let clause = Clause::new(std::iter::once(asserting).chain(learned));
        trace!(
            "conflict clause {} learned {}, backtrack to level {}",
            conflict.0,
            clause,
            backtrack_level.0
        );

        Learned {
            clause,
            asserting,
            backtrack_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, Formula, Variable};
    use crate::solver::propagate::BcpResult;
    use crate::solver::SolverConfig;
    use test_env_log::test;

    fn decide(s: &mut Solver, literal: Literal) {
        s.decision_level = s.decision_level.next();
        s.assign(literal, Reason::Decision);
    }

    // 1 -> 2, 1 -> 3, 2 & 3 -> 4, 4 -> 6, and (4 & 5 & 6) is forbidden
    fn implication_chain() -> Solver {
        let f = Formula::from_clauses(vec![
            Clause::new(vec![n(1), p(2)]),
            Clause::new(vec![n(1), p(3)]),
            Clause::new(vec![n(2), n(3), p(4)]),
            Clause::new(vec![n(4), p(6)]),
            Clause::new(vec![n(4), n(5), n(6)]),
        ]);
        Solver::with_config(f, SolverConfig { check_invariants: true })
    }

    #[test]
    fn learns_the_first_uip() {
        let mut s = implication_chain();
        assert_eq!(s.enqueue_root_units(), BcpResult::NoConflict);

        decide(&mut s, p(5));
        assert_eq!(s.bcp(), BcpResult::NoConflict);
        decide(&mut s, p(1));
        assert_eq!(s.bcp(), BcpResult::Conflict(ClauseIdx(4)));

        let learned = s.analyze_conflict(ClauseIdx(4));
        assert_eq!(learned.asserting, n(4));
        assert_eq!(learned.clause, Clause::new(vec![n(4), n(5)]));
        assert_eq!(learned.backtrack_level, DecisionLevel(1));
    }

    #[test]
    fn learned_clause_is_asserting_after_backtrack() {
        let mut s = implication_chain();
        assert_eq!(s.enqueue_root_units(), BcpResult::NoConflict);
        decide(&mut s, p(5));
        assert_eq!(s.bcp(), BcpResult::NoConflict);
        decide(&mut s, p(1));
        let conflict = match s.bcp() {
            BcpResult::Conflict(idx) => idx,
            BcpResult::NoConflict => panic!("expected a conflict"),
        };

        let learned = s.analyze_conflict(conflict);
        assert_eq!(learned.clause.evaluate(&s.trail), Value::False);

        s.backtrack(learned.backtrack_level);
        assert!(learned.clause.is_unit(&s.trail));
        assert_eq!(learned.clause.unit_literal(&s.trail), Some(learned.asserting));

        let idx = s.add_clause(learned.clause);
        s.assign(learned.asserting, Reason::Propagated(idx));
        assert_eq!(s.bcp(), BcpResult::NoConflict);
        assert_eq!(s.trail.value(&n(4)), Value::True);
        assert_eq!(s.trail.level(Variable(4)), Some(DecisionLevel(1)));
        s.check_invariants();
    }

    #[test]
    fn decision_can_be_the_uip() {
        // deciding 1 forces 2 and 3, which clash
        let f = Formula::from_clauses(vec![
            Clause::new(vec![n(1), p(2)]),
            Clause::new(vec![n(1), p(3)]),
            Clause::new(vec![n(2), n(3)]),
        ]);
        let mut s = Solver::new(f);
        assert_eq!(s.enqueue_root_units(), BcpResult::NoConflict);
        decide(&mut s, p(1));
        assert_eq!(s.bcp(), BcpResult::Conflict(ClauseIdx(2)));

        let learned = s.analyze_conflict(ClauseIdx(2));
        assert_eq!(learned.clause, Clause::new(vec![n(1)]));
        assert_eq!(learned.backtrack_level, DecisionLevel::ROOT);
    }

    #[test]
    fn root_literals_stay_in_the_clause() {
        // 7 is fixed at the root; deciding 1 forces 2 and 3, which clash with it
        let f = Formula::from_clauses(vec![
            Clause::new(vec![p(7)]),
            Clause::new(vec![n(1), p(2)]),
            Clause::new(vec![n(1), p(3)]),
            Clause::new(vec![n(2), n(3), n(7)]),
        ]);
        let mut s = Solver::new(f);
        assert_eq!(s.enqueue_root_units(), BcpResult::NoConflict);
        assert_eq!(s.bcp(), BcpResult::NoConflict);
        decide(&mut s, p(1));
        assert_eq!(s.bcp(), BcpResult::Conflict(ClauseIdx(3)));

        let learned = s.analyze_conflict(ClauseIdx(3));
        assert_eq!(learned.asserting, n(1));
        assert_eq!(learned.clause, Clause::new(vec![n(1), n(7)]));
        assert_eq!(learned.backtrack_level, DecisionLevel::ROOT);
    }
}
