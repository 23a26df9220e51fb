pub mod checker;
pub mod formula;
mod solver;

#[cfg(test)]
mod brute_force;

use std::fmt::{self, Display, Formatter};

/// A total assignment: one boolean per variable `1..=num_variables`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub(crate) fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, variable: Variable) -> bool {
        self.values[variable.index()]
    }

    /// The model as signed literals, one per variable in ascending id order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| Literal::new(Variable(i + 1), *value))
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for literal in self.literals() {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            write!(f, "{}", literal)?;
        }
        Ok(())
    }
}

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Model),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SatResult::Satisfiable(model) => Some(model),
            SatResult::Unsatisfiable => None,
        }
    }
}

pub use formula::{Clause, Formula, Literal, Variable};
pub use solver::{Solver, SolverConfig, SolverStats};

/// Decides `formula` with the default configuration.
pub fn solve(formula: Formula) -> SatResult {
    Solver::new(formula).solve()
}
