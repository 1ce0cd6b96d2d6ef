use crate::formula::{Formula, IndexedFormula, Literal};
use crate::SatResult;
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Receives search trace events for diagnostics. Implementations must not
// try to influence the search; the solver never reads anything back.
pub trait Observer {
    fn unit_propagated(&mut self, literal: &Literal) {
        let _ = literal;
    }
    fn pure_eliminated(&mut self, literal: &Literal) {
        let _ = literal;
    }
    fn branched(&mut self, literal: &Literal, positive: bool) {
        let _ = (literal, positive);
    }
    fn backtracked(&mut self) {}
}

pub struct Solver<'a> {
    formula: IndexedFormula,
    observer: Option<&'a mut dyn Observer>,
    node_limit: Option<u64>,
    nodes: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Solver<'a> {
    pub fn new(formula: Formula) -> Self {
        Self::from_indexed(IndexedFormula::new(formula))
    }

    pub fn from_indexed(formula: IndexedFormula) -> Self {
        Self {
            formula,
            observer: None,
            node_limit: None,
            nodes: 0,
            cancel: None,
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn solve(&mut self) -> SatResult {
        self.nodes = 0;
        let formula = self.formula.clone();
        self.search(formula)
    }

    fn search(&mut self, mut formula: IndexedFormula) -> SatResult {
        self.nodes += 1;
        if self.interrupted() {
            trace!("giving up after {} search nodes", self.nodes);
            return SatResult::Unknown;
        }

        loop {
            if formula.is_empty_sentence() {
                trace!("satisfiable with {}", formula.assignment());
                return SatResult::Satisfiable(formula.into_assignment());
            }
            if formula.has_empty_clause() {
                return SatResult::Unsatisfiable;
            }
            if let Some(literal) = formula.unit_clause_literal() {
                trace!("unit propagation: {}", literal);
                if let Some(observer) = self.observer.as_mut() {
                    observer.unit_propagated(&literal);
                }
                formula.assume(literal);
                continue;
            }
            if let Some(literal) = formula.pure_literal() {
                trace!("pure literal elimination: {}", literal);
                if let Some(observer) = self.observer.as_mut() {
                    observer.pure_eliminated(&literal);
                }
                formula.assume(literal);
                continue;
            }
            break;
        }

        // A live clause only ever mentions unassigned variables, so a
        // non-terminal formula always has something to branch on.
        let literal = formula
            .branch_literal()
            .expect("non-terminal formula must have an unassigned variable");
        trace!("branching on {}", literal);

        let mut branch = formula.clone();
        branch.assume(literal.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer.branched(&literal, true);
        }
        match self.search(branch) {
            SatResult::Satisfiable(assignment) => SatResult::Satisfiable(assignment),
            // An interrupted subtree was not exhausted, so unsatisfiability
            // cannot be claimed for the whole formula.
            SatResult::Unknown => SatResult::Unknown,
            SatResult::Unsatisfiable => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.backtracked();
                }
                let negated = literal.negated();
                if let Some(observer) = self.observer.as_mut() {
                    observer.branched(&negated, false);
                }
                formula.assume(negated);
                self.search(formula)
            }
        }
    }

    fn interrupted(&self) -> bool {
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                return true;
            }
        }
        if let Some(cancel) = &self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return true;
            }
        }
        false
    }
}
