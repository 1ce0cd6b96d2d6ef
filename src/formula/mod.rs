pub mod dimacs;
mod indexed;
pub mod text;

pub use indexed::IndexedFormula;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdentifier(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidIdentifier(String),
    Syntax(String),
}

impl From<InvalidIdentifier> for ParseError {
    fn from(e: InvalidIdentifier) -> Self {
        ParseError::InvalidIdentifier(e.0)
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Variable(Rc<str>);

impl Variable {
    pub fn new(name: &str) -> Result<Self, InvalidIdentifier> {
        let mut chars = name.chars();
        let leading_ok = match chars.next() {
            Some(c) => c.is_alphabetic() || c == '_',
            None => false,
        };
        if leading_ok && chars.all(|c| c.is_alphanumeric() || c == '_') {
            Ok(Variable(Rc::from(name)))
        } else {
            Err(InvalidIdentifier(name.to_string()))
        }
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    pub fn new(name: &str, positive: bool) -> Result<Self, InvalidIdentifier> {
        let variable = Variable::new(name)?;
        Ok(if positive {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        })
    }

    pub fn parse(token: &str) -> Result<Self, ParseError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ParseError::Syntax("empty literal".to_string()));
        }
        let (name, positive) = match token.strip_prefix('~') {
            Some(rest) => (rest, false),
            None => (token, true),
        };
        Ok(Literal::new(name, positive)?)
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(v.clone()),
            Literal::Negative(v) => Literal::Positive(v.clone()),
        }
    }
}

// Ordered by variable name first so iteration groups the two polarities of
// one variable together; the derived order would sort all positives first.
impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.variable()
            .cmp(other.variable())
            .then(self.is_positive().cmp(&other.is_positive()))
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(v) => write!(f, "{}", v),
            Literal::Negative(v) => write!(f, "~{}", v),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clause {
    literals: BTreeSet<Literal>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: disjuncts.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            literals: BTreeSet::new(),
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literals.insert(literal);
        self
    }

    pub fn without_literal(mut self, literal: &Literal) -> Self {
        self.literals.remove(literal);
        self
    }

    pub fn size(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub(crate) fn remove(&mut self, literal: &Literal) -> bool {
        self.literals.remove(literal)
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

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            clauses: conjuncts.into_iter().collect(),
        }
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn variables(&self) -> BTreeSet<Variable> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals().map(|literal| literal.variable().clone()))
            .collect()
    }

    pub(crate) fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for clause in &self.clauses {
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

// The literals fixed true along one search branch, in decision order.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Assignment {
    literals: Vec<Literal>,
}

impl Assignment {
    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    pub fn value_of(&self, variable: &Variable) -> Option<bool> {
        self.literals
            .iter()
            .find(|literal| literal.variable() == variable)
            .map(|literal| literal.is_positive())
    }

    // A clause counts as satisfied when some literal agrees with the
    // assignment or its variable was never constrained.
    pub fn satisfies(&self, formula: &Formula) -> bool {
        formula.clauses().all(|clause| {
            clause.literals().any(|literal| {
                self.value_of(literal.variable())
                    .map_or(true, |value| value == literal.is_positive())
            })
        })
    }

    pub(crate) fn push(&mut self, literal: Literal) {
        debug_assert!(self.value_of(literal.variable()).is_none());
        self.literals.push(literal);
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("{")?;
        let mut first = true;
        for literal in &self.literals {
            if first {
                first = false;
            } else {
                f.write_str(", ")?;
            }
            write!(f, "{}", literal)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
pub(crate) mod strategy {
    use super::*;
    use proptest::prelude::*;

    pub(crate) fn literal() -> impl Strategy<Value = Literal> {
        (0..6usize, any::<bool>())
            .prop_map(|(i, positive)| Literal::new(&format!("x{}", i), positive).unwrap())
    }

    pub(crate) fn clause() -> impl Strategy<Value = Clause> {
        proptest::collection::vec(literal(), 1..4).prop_map(Clause::new)
    }

    pub(crate) fn formula() -> impl Strategy<Value = Formula> {
        proptest::collection::vec(clause(), 0..12).prop_map(Formula::new)
    }
}
