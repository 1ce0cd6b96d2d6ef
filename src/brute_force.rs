use crate::formula::{Assignment, Formula, Literal, Variable};
use crate::SatResult;

// Truth-table enumeration, used as an oracle by the solver tests.
pub(crate) fn solve_brute_force(f: &Formula) -> SatResult {
    let variables: Vec<Variable> = f.variables().into_iter().collect();
    assert!(variables.len() <= 20); // just for safety

    let value_of = |candidate: u32, variable: &Variable| -> bool {
        let index = variables
            .iter()
            .position(|v| v == variable)
            .expect("variable collected from this formula");
        candidate & (1 << index) != 0
    };

    'search: for candidate in 0..1u32 << variables.len() {
        'clauses: for clause in f.clauses() {
            for literal in clause.literals() {
                if value_of(candidate, literal.variable()) == literal.is_positive() {
                    // this clause is satisfied, let's go to the next one
                    continue 'clauses;
                }
            }
            // if we got here, this clause was not satisfied, so this candidate is bogus
            continue 'search;
        }
        // every clause was satisfied; spell the witness out as an assignment
        let mut assignment = Assignment::default();
        for variable in &variables {
            let literal = if value_of(candidate, variable) {
                Literal::Positive(variable.clone())
            } else {
                Literal::Negative(variable.clone())
            };
            assignment.push(literal);
        }
        return SatResult::Satisfiable(assignment);
    }
    SatResult::Unsatisfiable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::text;

    fn oracle(input: &str) -> SatResult {
        solve_brute_force(&text::parse(input).expect("failed to parse"))
    }

    #[test]
    fn brute_force_sat() {
        match oracle("(A|B)&(~A)") {
            SatResult::Satisfiable(assignment) => {
                let formula = text::parse("(A|B)&(~A)").unwrap();
                assert!(assignment.satisfies(&formula));
            }
            r => panic!("expected satisfiable, got {:?}", r),
        }
    }

    #[test]
    fn brute_force_unsat() {
        assert_eq!(oracle("(A|B)&(~A)&(~B)"), SatResult::Unsatisfiable);
        assert_eq!(oracle("(A)&(~A)"), SatResult::Unsatisfiable);
    }

    #[test]
    fn brute_force_empty_formula() {
        match oracle("") {
            SatResult::Satisfiable(assignment) => assert!(assignment.is_empty()),
            r => panic!("expected satisfiable, got {:?}", r),
        }
    }

    #[test]
    fn brute_force_empty_clause() {
        assert_eq!(oracle("(A)&()"), SatResult::Unsatisfiable);
    }
}
