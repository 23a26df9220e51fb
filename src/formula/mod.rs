pub mod dimacs;

use std::fmt::Debug;
use std::fmt::{self, Display, Formatter};

/// A propositional variable, identified by its DIMACS id (starting at 1).
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

impl Variable {
    /// Zero-based slot of this variable in per-variable tables.
    pub(crate) fn index(self) -> usize {
        debug_assert!(self.0 > 0, "variable ids start at 1");
        self.0 - 1
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    /// The literal asserting `variable = value`.
    pub fn new(variable: Variable, value: bool) -> Self {
        if value {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        }
    }

    /// Reads a signed DIMACS integer. Zero is the clause terminator, not a literal.
    pub fn from_dimacs(x: i64) -> Option<Self> {
        let variable = Variable(x.unsigned_abs() as usize);
        if x > 0 {
            Some(Literal::Positive(variable))
        } else if x < 0 {
            Some(Literal::Negative(variable))
        } else {
            None
        }
    }

    pub fn to_dimacs(&self) -> i64 {
        match self {
            Literal::Positive(v) => v.0 as i64,
            Literal::Negative(v) => -(v.0 as i64),
        }
    }

    pub fn variable(&self) -> Variable {
        match self {
            Literal::Positive(v) => *v,
            Literal::Negative(v) => *v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    /// The 1-based DIMACS id of this literal's variable.
    pub fn id(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }

    /// Dense index over both polarities: `2 * (id - 1)` for the positive
    /// literal, one more for the negative one.
    pub(crate) fn code(&self) -> usize {
        2 * self.variable().index() + if self.is_positive() { 0 } else { 1 }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A disjunction of literals, kept exactly as written (duplicates and
/// complementary pairs included).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("(")?;
        let mut first = true;
        for literal in &self.literals {
            if first {
                first = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        f.write_str(")")
    }
}

#[derive(Clone)]
pub struct Formula {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula over the variables `1..=num_variables`.
    ///
    /// Panics if `num_variables` exceeds [`dimacs::MAX_VARIABLES`] or a clause
    /// mentions a variable outside the range; input read from a file is
    /// checked by [`dimacs::parse`] before it gets here.
    pub fn new(num_variables: usize, conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        assert!(
            num_variables <= dimacs::MAX_VARIABLES,
            "{} variables exceed the supported maximum",
            num_variables
        );
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        for clause in &clauses {
            for literal in clause.literals() {
                assert!(
                    literal.id() >= 1 && literal.id() <= num_variables,
                    "literal {} out of range for {} variables",
                    literal,
                    num_variables
                );
            }
        }
        Self { num_variables, clauses }
    }

    /// Builds a formula whose variable count is the largest id mentioned.
    pub fn from_clauses(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = conjuncts.into_iter().collect();
        let num_variables = clauses
            .iter()
            .flat_map(|clause| clause.literals())
            .map(|literal| literal.id())
            .max()
            .unwrap_or(0);
        Self::new(num_variables, clauses)
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub(crate) fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }
}

impl Debug for Formula {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        let mut first_clause = true;
        for clause in &self.clauses {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            if clause.literals.len() > 1 {
                f.write_str("(")?;
            }
            let mut first_literal = true;
            for literal in &clause.literals {
                if first_literal {
                    first_literal = false;
                } else {
                    f.write_str(" | ")?;
                }
                match literal {
                    Literal::Positive(Variable(x)) => f.write_fmt(format_args!("{}", x))?,
                    Literal::Negative(Variable(x)) => f.write_fmt(format_args!("!{}", x))?,
                }
            }
            if clause.literals.len() > 1 {
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

/// Random formulas over at most `max_vars` variables with clause widths in
/// `1..=max_width`.
#[cfg(test)]
pub(crate) fn formula_strategy(
    max_vars: usize,
    max_clauses: usize,
    max_width: usize,
) -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (1..=max_vars).prop_flat_map(move |num_vars| {
        let literal = (1..=num_vars, any::<bool>()).prop_map(|(x, positive)| Literal::new(Variable(x), positive));
        prop::collection::vec(prop::collection::vec(literal, 1..=max_width), 0..=max_clauses)
            .prop_map(move |clauses| Formula::new(num_vars, clauses.into_iter().map(|c| Clause::new(c))))
    })
}

/// 3-SAT instances near the satisfiability threshold, where the solver has to
/// learn clauses to finish.
#[cfg(test)]
pub(crate) fn formula_3sat_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    (3..=12usize).prop_flat_map(|num_vars| {
        let literal = (1..=num_vars, any::<bool>()).prop_map(|(x, positive)| Literal::new(Variable(x), positive));
        let num_clauses = num_vars * 4 + num_vars / 4;
        prop::collection::vec(prop::collection::vec(literal, 3), num_clauses)
            .prop_map(move |clauses| Formula::new(num_vars, clauses.into_iter().map(|c| Clause::new(c))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_from_dimacs() {
        assert_eq!(Literal::from_dimacs(3), Some(p(3)));
        assert_eq!(Literal::from_dimacs(-7), Some(n(7)));
        assert_eq!(Literal::from_dimacs(0), None);
        assert_eq!(n(7).to_dimacs(), -7);
        assert_eq!(p(2).negated(), n(2));
        assert_eq!(n(2).variable(), Variable(2));
    }

    #[test]
    fn literal_id_is_one_based() {
        assert_eq!(n(1).id(), 1);
        assert_eq!(p(9).id(), 9);
        assert_eq!(p(9).variable().index(), 8);
    }

    #[test]
    fn literal_codes_are_dense() {
        assert_eq!(p(1).code(), 0);
        assert_eq!(n(1).code(), 1);
        assert_eq!(p(4).code(), 6);
        assert_eq!(n(4).code(), 7);
    }

    #[test]
    fn clause_keeps_duplicates_and_tautologies() {
        let c = Clause::new(vec![p(1), p(1), n(1)]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.to_string(), "(1 | 1 | -1)");
    }

    #[test]
    fn from_clauses_infers_variable_count() {
        let f = Formula::from_clauses(vec![Clause::new(vec![p(2), n(5)]), Clause::new(vec![n(1)])]);
        assert_eq!(f.num_variables(), 5);
        assert_eq!(f.num_clauses(), 2);
        assert_eq!(format!("{:?}", f), "(2 | !5) & !1");

        let empty = Formula::from_clauses(vec![]);
        assert_eq!(empty.num_variables(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn new_rejects_out_of_range_literals() {
        Formula::new(2, vec![Clause::new(vec![p(3)])]);
    }

    #[test]
    #[should_panic(expected = "supported maximum")]
    fn new_rejects_unindexable_variable_counts() {
        Formula::new(usize::MAX, vec![]);
    }
}
