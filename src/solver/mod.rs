mod analyze;
mod branch;
mod eval;
mod propagate;
mod trail;

use crate::formula::{Clause, Formula, Literal};
use crate::SatResult;
use log::{debug, trace};
use propagate::BcpResult;
use trail::{DecisionLevel, Reason, Trail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClauseIdx(usize);

#[derive(Debug, Clone, Copy, Default)]
pub struct SolverConfig {
    /// Re-validate the trail after every propagation round and panic on the
    /// first broken invariant.
    pub check_invariants: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub learned_clauses: usize,
}

/// A CDCL solver over a single formula. The clause database starts as the
/// input clauses and only ever grows by appending learned clauses.
pub struct Solver {
    clauses: Vec<Clause>,
    // clause indices containing each literal, indexed by `Literal::code`
    occurrences: Vec<Vec<ClauseIdx>>,
    trail: Trail,
    decision_level: DecisionLevel,
    config: SolverConfig,
    stats: SolverStats,
}

#[derive(Debug, PartialEq, Eq)]
enum SearchState {
    Propagating,
    Conflict(ClauseIdx),
    Deciding,
    Sat,
    Unsat,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self::with_config(formula, SolverConfig::default())
    }

    pub fn with_config(formula: Formula, config: SolverConfig) -> Self {
        let num_variables = formula.num_variables();
        let mut solver = Self {
            clauses: vec![],
            occurrences: vec![vec![]; 2 * num_variables],
            trail: Trail::new(num_variables),
            decision_level: DecisionLevel::ROOT,
            config,
            stats: SolverStats::default(),
        };
        for clause in formula.into_clauses() {
            solver.add_clause(clause);
        }
        solver
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    pub fn solve(&mut self) -> SatResult {
        self.backtrack(DecisionLevel::ROOT);

        let mut state = match self.enqueue_root_units() {
            BcpResult::Conflict(_) => SearchState::Unsat,
            BcpResult::NoConflict => SearchState::Propagating,
        };
        let result = loop {
            state = match state {
                SearchState::Propagating => {
                    let result = self.bcp();
                    self.check_invariants();
                    match result {
                        BcpResult::Conflict(_) if self.decision_level == DecisionLevel::ROOT => SearchState::Unsat,
                        BcpResult::Conflict(idx) => SearchState::Conflict(idx),
                        BcpResult::NoConflict if self.trail.is_complete() => SearchState::Sat,
                        BcpResult::NoConflict => SearchState::Deciding,
                    }
                }
                SearchState::Conflict(idx) => {
                    self.stats.conflicts += 1;
                    let learned = self.analyze_conflict(idx);
                    self.backtrack(learned.backtrack_level);
                    let idx = self.add_clause(learned.clause);
                    self.stats.learned_clauses += 1;
                    self.assign(learned.asserting, Reason::Propagated(idx));
                    SearchState::Propagating
                }
                SearchState::Deciding => {
                    let literal = match self.pick_branching_literal() {
                        Some(literal) => literal,
                        None => unreachable!("no branching candidate although the model is partial"),
                    };
                    self.stats.decisions += 1;
                    self.decision_level = self.decision_level.next();
                    self.assign(literal, Reason::Decision);
                    SearchState::Propagating
                }
                SearchState::Sat => break SatResult::Satisfiable(self.trail.model()),
                SearchState::Unsat => break SatResult::Unsatisfiable,
            };
        };
        self.log_outcome(&result);
        result
    }

    fn assign(&mut self, literal: Literal, reason: Reason) {
        if let Reason::Propagated(_) = reason {
            self.stats.propagations += 1;
        }
        self.trail.push(literal, self.decision_level, reason);
    }

    /// Appends `clause` to the database and indexes its literals.
    fn add_clause(&mut self, clause: Clause) -> ClauseIdx {
        let idx = ClauseIdx(self.clauses.len());
        for literal in clause.literals() {
            let entry = &mut self.occurrences[literal.code()];
            // a repeated literal only needs to be visited once
            if entry.last() != Some(&idx) {
                entry.push(idx);
            }
        }
        self.clauses.push(clause);
        idx
    }

    fn backtrack(&mut self, level: DecisionLevel) {
        let undone = self.trail.backtrack(level);
        trace!(
            "backtrack: level {} -> {}, undid {} assignments",
            self.decision_level.0,
            level.0,
            undone
        );
        self.decision_level = level;
    }

    fn log_outcome(&self, result: &SatResult) {
        debug!(
            "{}: {} decisions, {} propagations, {} conflicts, {} learned clauses",
            if result.is_satisfiable() { "SAT" } else { "UNSAT" },
            self.stats.decisions,
            self.stats.propagations,
            self.stats.conflicts,
            self.stats.learned_clauses
        );
        trace!("result = {:?}", result);
    }

    fn check_invariants(&self) {
        if !self.config.check_invariants {
            return;
        }
        if let Err(violation) = self.trail.validate(&self.clauses) {
            panic!("trail invariant violated: {}", violation);
        }
    }
}
