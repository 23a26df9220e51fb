//! Three-valued clause evaluation against the trail.

use super::trail::{Trail, Value};
use crate::formula::{Clause, Literal};

impl Clause {
    /// `True` if some literal holds, `False` if every literal is assigned and
    /// none holds (a conflicting clause), `Unassigned` otherwise.
    pub(crate) fn evaluate(&self, trail: &Trail) -> Value {
        let mut open = false;
        for literal in self.literals() {
            match trail.value(literal) {
                Value::True => return Value::True,
                Value::False => {}
                Value::Unassigned => open = true,
            }
        }
        if open {
            Value::Unassigned
        } else {
            Value::False
        }
    }

    /// Exactly one literal occurrence is unassigned and every other one is false.
    /// A repeated unassigned literal counts once per occurrence.
    pub(crate) fn is_unit(&self, trail: &Trail) -> bool {
        let mut unassigned = 0;
        for literal in self.literals() {
            match trail.value(literal) {
                Value::True => return false,
                Value::False => {}
                Value::Unassigned => unassigned += 1,
            }
        }
        unassigned == 1
    }

    /// The first unassigned literal in clause order.
    pub(crate) fn unit_literal(&self, trail: &Trail) -> Option<Literal> {
        self.literals()
            .find(|literal| trail.value(literal) == Value::Unassigned)
            .copied()
    }
}
