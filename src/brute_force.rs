use crate::*;

// Exhaustive search over every assignment, used as an oracle in tests
pub(crate) fn solve_brute_force(f: &Formula) -> SatResult {
    let num_variables = f.num_variables();
    assert!(num_variables <= 20); // just for safety

    fn assignment_for(assignment: u32, x: usize) -> bool {
        assignment & (1 << (x - 1)) != 0
    }

    'search: for assignment in 0..(1u32 << num_variables) {
        'clauses: for clause in f.clauses() {
            for literal in clause.literals() {
                if assignment_for(assignment, literal.id()) == literal.is_positive() {
                    // this clause is satisfied, let's go to the next one
                    continue 'clauses;
                }
            }
            // if we got here, this clause was not satisfied, so this assignment is bogus
            continue 'search;
        }
        // if we got here, every clause was satisfied, so we're done and satisfiable
        let values = (1..=num_variables).map(|x| assignment_for(assignment, x)).collect();
        return SatResult::Satisfiable(Model::new(values));
    }
    // no assignment is valid
    SatResult::Unsatisfiable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};

    #[test]
    fn solve_bcp_sat() {
        let c1 = Clause::new(vec![p(1), p(2)]);
        let c2 = Clause::new(vec![n(1)]);
        let f = Formula::from_clauses(vec![c1, c2]);

        assert_eq!(
            solve_brute_force(&f),
            SatResult::Satisfiable(Model::new(vec![false, true]))
        );
    }

    #[test]
    fn solve_conflict_unsat() {
        let c1 = Clause::new(vec![p(1), p(2)]);
        let c2 = Clause::new(vec![n(1)]);
        let c3 = Clause::new(vec![n(2)]);
        let f = Formula::from_clauses(vec![c1, c2, c3]);

        assert_eq!(solve_brute_force(&f), SatResult::Unsatisfiable);
    }

    #[test]
    fn solve_empty() {
        let f = Formula::new(0, vec![]);
        assert_eq!(solve_brute_force(&f), SatResult::Satisfiable(Model::new(vec![])));
        let f = Formula::new(0, vec![Clause::new(vec![])]);
        assert_eq!(solve_brute_force(&f), SatResult::Unsatisfiable);
    }
}
