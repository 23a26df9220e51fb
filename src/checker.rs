//! Independent re-check of a claimed satisfying assignment. Nothing here is
//! used by the solver itself.

use crate::formula::{Clause, Formula, Literal};
use crate::Model;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("clause {index} {clause} is not satisfied")]
    UnsatisfiedClause { index: usize, clause: Clause },
    #[error("variable {variable} is assigned both true and false")]
    ContradictoryAssignment { variable: usize },
}

/// Checks that every clause of `formula` contains at least one literal of
/// `assignment`, given as a set of signed literals.
pub fn verify(formula: &Formula, assignment: impl IntoIterator<Item = Literal>) -> Result<(), VerifyError> {
    let assignment: HashSet<Literal> = assignment.into_iter().collect();
    if let Some(literal) = assignment.iter().find(|l| l.is_positive() && assignment.contains(&l.negated())) {
        return Err(VerifyError::ContradictoryAssignment {
            variable: literal.id(),
        });
    }

    for (index, clause) in formula.clauses().enumerate() {
        if !clause.literals().any(|literal| assignment.contains(literal)) {
            return Err(VerifyError::UnsatisfiedClause {
                index,
                clause: clause.clone(),
            });
        }
    }
    Ok(())
}

pub fn verify_model(formula: &Formula, model: &Model) -> Result<(), VerifyError> {
    verify(formula, model.literals())
}
