use super::{Assignment, Clause, Formula, Literal, Variable};
use log::trace;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct ClauseId(usize);

// A CNF formula under a partial assignment, with every lookup the search
// needs maintained incrementally: clauses by literal, clauses by size,
// occurrence counts by literal, and the literals that are currently pure.
// Clause contents live in `table` and are referenced by handle, so shrinking
// a clause updates one table entry and every index keyed by that handle
// observes the change.
#[derive(Clone, Debug)]
pub struct IndexedFormula {
    table: Vec<Clause>,
    live: BTreeSet<ClauseId>,
    assignment: Assignment,
    unassigned: BTreeSet<Variable>,
    clauses_with: HashMap<Literal, BTreeSet<ClauseId>>,
    by_size: BTreeMap<usize, BTreeSet<ClauseId>>,
    occurrences: HashMap<Literal, usize>,
    by_count: BTreeMap<usize, BTreeSet<Literal>>,
    pure: BTreeSet<Literal>,
}

impl IndexedFormula {
    pub fn new(formula: Formula) -> Self {
        let table = formula.into_clauses();

        let mut live = BTreeSet::new();
        let mut unassigned = BTreeSet::new();
        let mut clauses_with: HashMap<Literal, BTreeSet<ClauseId>> = HashMap::new();
        let mut by_size: BTreeMap<usize, BTreeSet<ClauseId>> = BTreeMap::new();
        let mut occurrences: HashMap<Literal, usize> = HashMap::new();

        for (index, clause) in table.iter().enumerate() {
            let id = ClauseId(index);
            live.insert(id);
            by_size.entry(clause.size()).or_default().insert(id);
            for literal in clause.literals() {
                unassigned.insert(literal.variable().clone());
                clauses_with.entry(literal.clone()).or_default().insert(id);
                *occurrences.entry(literal.clone()).or_insert(0) += 1;
            }
        }

        let mut by_count: BTreeMap<usize, BTreeSet<Literal>> = BTreeMap::new();
        let mut pure = BTreeSet::new();
        for (literal, count) in &occurrences {
            by_count.entry(*count).or_default().insert(literal.clone());
            if !occurrences.contains_key(&literal.negated()) {
                pure.insert(literal.clone());
            }
        }

        let formula = Self {
            table,
            live,
            assignment: Assignment::default(),
            unassigned,
            clauses_with,
            by_size,
            occurrences,
            by_count,
            pure,
        };
        #[cfg(debug_assertions)]
        formula.assert_invariants();
        formula
    }

    // The formula is trivially satisfied once no clause is left.
    pub fn is_empty_sentence(&self) -> bool {
        self.live.is_empty()
    }

    // An empty clause contradicts the current assignment.
    pub fn has_empty_clause(&self) -> bool {
        self.by_size.contains_key(&0)
    }

    // The literal of a unit clause, smallest handle first.
    pub fn unit_clause_literal(&self) -> Option<Literal> {
        let id = self.by_size.get(&1)?.iter().next()?;
        self.table[id.0].literals().next().cloned()
    }

    // The smallest literal whose negation occurs in no live clause.
    pub fn pure_literal(&self) -> Option<Literal> {
        self.pure.iter().next().cloned()
    }

    // A positive literal for the lexicographically smallest unassigned
    // variable, used to branch when neither propagation rule applies.
    pub fn branch_literal(&self) -> Option<Literal> {
        self.unassigned
            .iter()
            .next()
            .map(|variable| Literal::Positive(variable.clone()))
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.live.iter().map(move |id| &self.table[id.0])
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn unassigned_variables(&self) -> impl Iterator<Item = &Variable> {
        self.unassigned.iter()
    }

    // Fix `literal` true: every clause containing it is satisfied and
    // dropped, every clause containing its negation shrinks by one literal.
    // The search never re-assumes a fixed variable, so hitting one here is
    // an index-consistency failure, not an input error.
    pub fn assume(&mut self, literal: Literal) {
        assert!(
            self.unassigned.contains(literal.variable()),
            "assume: variable '{}' is already fixed",
            literal.variable()
        );
        trace!("assuming {}", literal);

        self.unassigned.remove(literal.variable());
        self.assignment.push(literal.clone());

        let satisfied: Vec<ClauseId> = match self.clauses_with.get(&literal) {
            Some(ids) => ids.iter().cloned().collect(),
            None => vec![],
        };
        for id in satisfied {
            self.remove_clause(id);
        }

        // Snapshot taken after the satisfied clauses are gone, so a clause
        // containing both polarities is only ever removed, never shrunk.
        let negated = literal.negated();
        let shrunk: Vec<ClauseId> = match self.clauses_with.get(&negated) {
            Some(ids) => ids.iter().cloned().collect(),
            None => vec![],
        };
        for id in shrunk {
            self.remove_literal(id, &negated);
        }

        #[cfg(debug_assertions)]
        self.assert_invariants();
    }

    fn remove_clause(&mut self, id: ClauseId) {
        self.live.remove(&id);
        self.unbucket_size(self.table[id.0].size(), id);

        let literals: Vec<Literal> = self.table[id.0].literals().cloned().collect();
        for literal in literals {
            if let Some(ids) = self.clauses_with.get_mut(&literal) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.clauses_with.remove(&literal);
                }
            }
            self.decrement_occurrence(&literal);
        }
    }

    fn remove_literal(&mut self, id: ClauseId, literal: &Literal) {
        let old_size = self.table[id.0].size();
        self.unbucket_size(old_size, id);
        let removed = self.table[id.0].remove(literal);
        assert!(
            removed,
            "clause index out of sync: {} not in clause {}",
            literal, id.0
        );
        self.by_size.entry(old_size - 1).or_default().insert(id);

        if let Some(ids) = self.clauses_with.get_mut(literal) {
            ids.remove(&id);
            if ids.is_empty() {
                self.clauses_with.remove(literal);
            }
        }
        self.decrement_occurrence(literal);
    }

    fn unbucket_size(&mut self, size: usize, id: ClauseId) {
        if let Some(ids) = self.by_size.get_mut(&size) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_size.remove(&size);
            }
        }
    }

    fn decrement_occurrence(&mut self, literal: &Literal) {
        let remaining = match self.occurrences.get_mut(literal) {
            Some(count) if *count > 0 => {
                *count -= 1;
                *count
            }
            _ => panic!("inconsistent occurrence count for literal {}", literal),
        };

        if let Some(literals) = self.by_count.get_mut(&(remaining + 1)) {
            literals.remove(literal);
            if literals.is_empty() {
                self.by_count.remove(&(remaining + 1));
            }
        }
        if remaining == 0 {
            self.occurrences.remove(literal);
        } else {
            self.by_count
                .entry(remaining)
                .or_default()
                .insert(literal.clone());
        }

        self.update_purity(literal.clone());
        self.update_purity(literal.negated());
    }

    fn update_purity(&mut self, literal: Literal) {
        let occurs = self.occurrences.contains_key(&literal);
        let negation_occurs = self.occurrences.contains_key(&literal.negated());
        if occurs && !negation_occurs {
            self.pure.insert(literal);
        } else {
            self.pure.remove(&literal);
        }
    }

    // Rebuilds every index from the live clauses and compares. O(formula),
    // so only wired in for debug builds and tests.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn assert_invariants(&self) {
        let mut clauses_with: HashMap<Literal, BTreeSet<ClauseId>> = HashMap::new();
        let mut by_size: BTreeMap<usize, BTreeSet<ClauseId>> = BTreeMap::new();
        let mut occurrences: HashMap<Literal, usize> = HashMap::new();
        for id in &self.live {
            let clause = &self.table[id.0];
            by_size.entry(clause.size()).or_default().insert(*id);
            for literal in clause.literals() {
                clauses_with.entry(literal.clone()).or_default().insert(*id);
                *occurrences.entry(literal.clone()).or_insert(0) += 1;
                assert!(
                    self.unassigned.contains(literal.variable()),
                    "live clause mentions fixed variable '{}'",
                    literal.variable()
                );
            }
        }
        assert_eq!(self.by_size, by_size, "size index diverged");
        assert_eq!(self.clauses_with, clauses_with, "literal index diverged");
        assert_eq!(self.occurrences, occurrences, "occurrence counts diverged");

        let mut by_count: BTreeMap<usize, BTreeSet<Literal>> = BTreeMap::new();
        let mut pure: BTreeSet<Literal> = BTreeSet::new();
        for (literal, count) in &occurrences {
            by_count.entry(*count).or_default().insert(literal.clone());
            if !occurrences.contains_key(&literal.negated()) {
                pure.insert(literal.clone());
            }
        }
        assert_eq!(self.by_count, by_count, "count index diverged");
        assert_eq!(self.pure, pure, "pure literal set diverged");

        for literal in self.assignment.literals() {
            assert!(
                !self.assignment.contains(&literal.negated()),
                "assignment contains both polarities of '{}'",
                literal.variable()
            );
            assert!(
                !self.unassigned.contains(literal.variable()),
                "assigned variable '{}' still marked unassigned",
                literal.variable()
            );
        }
    }
}

impl Display for IndexedFormula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for clause in self.clauses() {
            if first {
                first = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}
