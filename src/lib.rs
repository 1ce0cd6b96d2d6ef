//! A DPLL satisfiability solver for propositional formulas in conjunctive
//! normal form. The formula keeps indices from literals to clauses, sizes
//! to clauses, and literals to occurrence counts, so unit propagation and
//! pure-literal elimination touch only the affected clauses instead of
//! rescanning the formula.

mod formula;
mod solver;

#[cfg(test)]
mod brute_force;

pub use formula::{
    dimacs, text, Assignment, Clause, Formula, IndexedFormula, InvalidIdentifier, Literal,
    ParseError, Variable,
};
pub use solver::{Observer, Solver};

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Assignment),
    Unsatisfiable,
    Unknown,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, SatResult::Unsatisfiable)
    }
}
