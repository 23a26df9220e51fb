use super::trail::{DecisionLevel, Reason, Value};
use super::{ClauseIdx, Solver};

#[derive(PartialEq, Eq, Clone, Debug)]
pub(crate) enum BcpResult {
    Conflict(ClauseIdx),
    NoConflict,
}

impl Solver {
    /// Scans the whole database once at the root level, assigning the
    /// literal of every unit clause. Reports an empty or already falsified
    /// clause as a conflict.
    pub(super) fn enqueue_root_units(&mut self) -> BcpResult {
        debug_assert_eq!(self.decision_level, DecisionLevel::ROOT);
        for idx in 0..self.clauses.len() {
            let clause = &self.clauses[idx];
            match clause.evaluate(&self.trail) {
                Value::False => return BcpResult::Conflict(ClauseIdx(idx)),
                Value::True => continue,
                Value::Unassigned => {}
            }
            if clause.is_unit(&self.trail) {
                if let Some(literal) = clause.unit_literal(&self.trail) {
                    self.assign(literal, Reason::Propagated(ClauseIdx(idx)));
                }
            }
        }
        BcpResult::NoConflict
    }

    /// Propagates every pending trail entry to a fixpoint.
    ///
    /// Making literal `l` true can only turn clauses containing `!l` unit or
    /// conflicting, so only those are re-examined. The first conflicting clause
    /// found is returned; pending entries after it are dropped by the backtrack
    /// that follows.
    pub(super) fn bcp(&mut self) -> BcpResult {
        while let Some(literal) = self.trail.next_pending() {
            let falsified = literal.negated().code();
            for i in 0..self.occurrences[falsified].len() {
                let idx = self.occurrences[falsified][i];
                let clause = &self.clauses[idx.0];
                match clause.evaluate(&self.trail) {
                    // false => every literal is assigned and none holds
                    Value::False => return BcpResult::Conflict(idx),
                    // true => this clause is satisfied
                    Value::True => continue,
                    Value::Unassigned => {}
                }
                if !clause.is_unit(&self.trail) {
                    continue;
                }
                match clause.unit_literal(&self.trail) {
                    Some(unit) => match self.trail.value(&unit) {
                        Value::Unassigned => self.assign(unit, Reason::Propagated(idx)),
                        Value::False => return BcpResult::Conflict(idx),
                        Value::True => continue,
                    },
                    None => continue,
                }
            }
        }
        BcpResult::NoConflict
    }
}
