//! The assignment trail: every live assignment in the order it was made,
//! plus a per-variable index into it.

use super::ClauseIdx;
use crate::formula::{Clause, Literal, Variable};
use crate::Model;
use log::trace;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Value {
    True,
    False,
    Unassigned,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub(crate) struct DecisionLevel(pub(crate) usize);

impl DecisionLevel {
    pub(crate) const ROOT: DecisionLevel = DecisionLevel(0);

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Reason {
    Decision,
    Propagated(ClauseIdx),
}

#[derive(Clone, Debug)]
pub(crate) struct Assignment {
    /// The literal made true; its variable and polarity are the assigned variable and value.
    pub(crate) literal: Literal,
    pub(crate) level: DecisionLevel,
    pub(crate) reason: Reason,
}

impl Assignment {
    pub(crate) fn variable(&self) -> Variable {
        self.literal.variable()
    }

    pub(crate) fn value(&self) -> bool {
        self.literal.is_positive()
    }
}

#[derive(Debug)]
pub(crate) struct Trail {
    assignments: Vec<Assignment>,
    // trail position of each variable's live assignment
    positions: Vec<Option<usize>>,
    // assignments before this position have been propagated
    propagated: usize,
}

impl Trail {
    pub(crate) fn new(num_variables: usize) -> Self {
        Self {
            assignments: vec![],
            positions: vec![None; num_variables],
            propagated: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.assignments.len()
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.positions.len()
    }

    /// Every variable has a live assignment.
    pub(crate) fn is_complete(&self) -> bool {
        self.assignments.len() == self.positions.len()
    }

    pub(crate) fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub(crate) fn position(&self, variable: Variable) -> Option<usize> {
        self.positions[variable.index()]
    }

    pub(crate) fn assignment(&self, variable: Variable) -> Option<&Assignment> {
        self.position(variable).map(|i| &self.assignments[i])
    }

    pub(crate) fn level(&self, variable: Variable) -> Option<DecisionLevel> {
        self.assignment(variable).map(|a| a.level)
    }

    pub(crate) fn is_assigned(&self, variable: Variable) -> bool {
        self.position(variable).is_some()
    }

    pub(crate) fn value(&self, literal: &Literal) -> Value {
        match self.assignment(literal.variable()) {
            None => Value::Unassigned,
            Some(a) if a.value() == literal.is_positive() => Value::True,
            Some(_) => Value::False,
        }
    }

    pub(crate) fn push(&mut self, literal: Literal, level: DecisionLevel, reason: Reason) {
        assert_eq!(self.value(&literal), Value::Unassigned);
        debug_assert!(self.assignments.last().map_or(true, |a| a.level <= level));

        trace!(
            "{} {} at level {}",
            match reason {
                Reason::Propagated(c) => format!("implied({})", c.0),
                Reason::Decision => "decision".to_string(),
            },
            literal,
            level.0
        );

        self.positions[literal.variable().index()] = Some(self.assignments.len());
        self.assignments.push(Assignment { literal, level, reason });
    }

    /// Takes the oldest assignment that has not been propagated yet.
    pub(crate) fn next_pending(&mut self) -> Option<Literal> {
        let literal = self.assignments.get(self.propagated)?.literal;
        self.propagated += 1;
        Some(literal)
    }

    /// Undoes every assignment above `level`, most recent first. Returns how
    /// many were undone.
    pub(crate) fn backtrack(&mut self, level: DecisionLevel) -> usize {
        let mut undone = 0;
        while let Some(last) = self.assignments.last() {
            if last.level <= level {
                break;
            }
            self.positions[last.variable().index()] = None;
            self.assignments.pop();
            undone += 1;
        }
        self.propagated = self.propagated.min(self.assignments.len());
        undone
    }

    /// The current assignment as a model. Only meaningful once the trail is complete.
    pub(crate) fn model(&self) -> Model {
        debug_assert!(self.is_complete());
        Model::new(
            self.positions
                .iter()
                .map(|position| position.map_or(false, |i| self.assignments[i].value()))
                .collect(),
        )
    }

    /// Checks the trail invariants: decision levels never decrease, each level
    /// above the root opens with its decision, the variable index agrees with
    /// the trail, and every implied literal was the sole unassigned literal of
    /// its antecedent when it was pushed.
    pub(crate) fn validate(&self, clauses: &[Clause]) -> Result<(), TrailViolation> {
        let mut previous = DecisionLevel::ROOT;
        for (position, a) in self.assignments.iter().enumerate() {
            if a.level < previous {
                return Err(TrailViolation::LevelDecreases {
                    position,
                    from: previous.0,
                    to: a.level.0,
                });
            }
            let opens_level = a.level > previous;
            if opens_level != (a.reason == Reason::Decision) {
                return Err(TrailViolation::MisplacedDecision {
                    position,
                    literal: a.literal.to_dimacs(),
                });
            }
            previous = a.level;

            if self.position(a.variable()) != Some(position) {
                return Err(TrailViolation::StaleIndex {
                    variable: a.variable().0,
                });
            }

            if let Reason::Propagated(idx) = a.reason {
                let antecedent = &clauses[idx.0];
                let was_unit = antecedent.literals().filter(|l| l.variable() == a.variable()).count() == 1
                    && antecedent.literals().any(|l| *l == a.literal)
                    && antecedent
                        .literals()
                        .filter(|l| l.variable() != a.variable())
                        .all(|l| self.value(l) == Value::False && self.position(l.variable()) < Some(position));
                if !was_unit {
                    return Err(TrailViolation::NotUnit {
                        position,
                        literal: a.literal.to_dimacs(),
                        clause: idx.0,
                    });
                }
            }
        }

        let live = self.positions.iter().filter(|p| p.is_some()).count();
        if live != self.assignments.len() {
            return Err(TrailViolation::LiveCount {
                indexed: live,
                trail: self.assignments.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TrailViolation {
    #[error("decision level drops from {from} to {to} at trail position {position}")]
    LevelDecreases { position: usize, from: usize, to: usize },
    #[error("trail entry {literal} at position {position} must be a decision exactly when it opens a level")]
    MisplacedDecision { position: usize, literal: i64 },
    #[error("index for variable {variable} does not point at its trail entry")]
    StaleIndex { variable: usize },
    #[error("{indexed} variables are indexed but the trail holds {trail} assignments")]
    LiveCount { indexed: usize, trail: usize },
    #[error("antecedent {clause} of {literal} at trail position {position} was not unit")]
    NotUnit { position: usize, literal: i64, clause: usize },
}
