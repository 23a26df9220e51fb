use super::trail::Value;
use super::Solver;
use crate::formula::{Literal, Variable};

impl Solver {
    /// Picks the unassigned literal with the most occurrences across the whole
    /// database, learned clauses included. Each polarity is counted on its own.
    ///
    /// Ties go to the lowest variable id, then to the positive literal. A
    /// variable that occurs in no clause is still a candidate with count zero,
    /// so this only returns `None` once every variable is assigned.
    pub(super) fn pick_branching_literal(&self) -> Option<Literal> {
        let mut counts = vec![0usize; 2 * self.trail.num_variables()];
        for clause in &self.clauses {
            for literal in clause.literals() {
                if self.trail.value(literal) == Value::Unassigned {
                    counts[literal.code()] += 1;
                }
            }
        }

        let mut best: Option<(Literal, usize)> = None;
        for x in 1..=self.trail.num_variables() {
            let variable = Variable(x);
            if self.trail.is_assigned(variable) {
                continue;
            }
            for literal in [Literal::Positive(variable), Literal::Negative(variable)].iter() {
                let count = counts[literal.code()];
                if best.map_or(true, |(_, most)| count > most) {
                    best = Some((*literal, count));
                }
            }
        }
        best.map(|(literal, _)| literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, Clause, Formula};
    use crate::solver::trail::{DecisionLevel, Reason};
    use crate::solver::ClauseIdx;

    fn solver(num_variables: usize, clauses: Vec<Clause>) -> Solver {
        Solver::new(Formula::new(num_variables, clauses))
    }

    #[test]
    fn most_frequent_literal_wins() {
        let s = solver(
            3,
            vec![
                Clause::new(vec![n(3), p(1)]),
                Clause::new(vec![n(3), p(2)]),
                Clause::new(vec![p(3), n(1)]),
            ],
        );
        assert_eq!(s.pick_branching_literal(), Some(n(3)));
    }

    #[test]
    fn ties_prefer_low_ids_then_positive() {
        let s = solver(
            2,
            vec![
                Clause::new(vec![p(2), n(1)]),
                Clause::new(vec![n(2), p(1)]),
            ],
        );
        assert_eq!(s.pick_branching_literal(), Some(p(1)));

        let s = solver(2, vec![Clause::new(vec![p(2), n(1)]), Clause::new(vec![n(1)])]);
        assert_eq!(s.pick_branching_literal(), Some(n(1)));
    }

    #[test]
    fn assigned_variables_are_not_counted() {
        let mut s = solver(
            3,
            vec![
                Clause::new(vec![p(1), p(2)]),
                Clause::new(vec![p(1), p(3)]),
                Clause::new(vec![p(1), n(3)]),
            ],
        );
        s.trail.push(n(1), DecisionLevel(1), Reason::Decision);
        // 2, 3 and !3 now occur once each
        assert_eq!(s.pick_branching_literal(), Some(p(2)));
    }

    #[test]
    fn unmentioned_variables_are_candidates() {
        let mut s = solver(3, vec![Clause::new(vec![p(2)])]);
        s.trail.push(p(2), DecisionLevel::ROOT, Reason::Propagated(ClauseIdx(0)));
        assert_eq!(s.pick_branching_literal(), Some(p(1)));

        s.trail.push(p(1), DecisionLevel(1), Reason::Decision);
        s.trail.push(n(3), DecisionLevel(2), Reason::Decision);
        assert!(s.trail.is_complete());
        assert_eq!(s.pick_branching_literal(), None);
    }
}
