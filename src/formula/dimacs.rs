use crate::formula::{Clause, Formula, Literal};
use std::io::{BufRead, BufReader, Read};

// DIMACS CNF front end. Integer variable k becomes the identifier `xk`, so
// a parsed formula goes through the same literal machinery as the infix
// syntax.
pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut num_clauses = None;

    for line in reader.lines() {
        let line = line?;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            Some(&"c") | None => continue,
            Some(&"p") => {
                let _ = line.next();

                if line.next() != Some("cnf") {
                    return Err(DimacsParseError::Format("missing 'cnf'".into()));
                }

                let _num_variables = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format("invalid num_variables".into()))?;

                num_clauses = Some(
                    line.next()
                        .and_then(|c| c.parse::<usize>().ok())
                        .ok_or_else(|| DimacsParseError::Format("invalid num_clauses".into()))?,
                );
            }
            Some(_) => {
                if num_clauses.is_none() {
                    return Err(DimacsParseError::Format("missing 'p' line before clauses".into()));
                }

                let mut clause = vec![];
                for x in line {
                    match parse_literal(x)? {
                        Some(l) => clause.push(l),
                        None => break,
                    }
                }
                if !clause.is_empty() {
                    clauses.push(Clause::new(clause));
                }

                if clauses.len() >= num_clauses.unwrap() {
                    break;
                }
            }
        }
    }

    if num_clauses.is_none() {
        return Err(DimacsParseError::Format("missing 'p' line before clauses".into()));
    }

    let formula = Formula::new(clauses);
    Ok(formula)
}

fn parse_literal(s: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = s
        .parse::<isize>()
        .map_err(|_| DimacsParseError::Format("invalid literal".into()))?;
    if l == 0 {
        return Ok(None);
    }
    let literal = Literal::new(&format!("x{}", l.abs()), l > 0)
        .expect("integer variables always form valid identifiers");
    Ok(Some(literal))
}

#[derive(Debug)]
pub enum DimacsParseError {
    Io(std::io::Error),
    Format(String),
}

impl From<std::io::Error> for DimacsParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SatResult, Solver};
    use std::fs::File;
    use std::io::Write;

    fn lit(token: &str) -> Literal {
        Literal::parse(token).unwrap()
    }

    #[test]
    fn parse_cnf_basic() {
        let cnf = "c  simple_v3_c2.cnf
c
p cnf 3 2
1 -3 0
2 3 -1 0";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.clauses().count(), 2);

        assert_eq!(
            f.clauses().nth(0).unwrap(),
            &Clause::new(vec![lit("x1"), lit("~x3")])
        );
        assert_eq!(
            f.clauses().nth(1).unwrap(),
            &Clause::new(vec![lit("x2"), lit("x3"), lit("~x1")])
        );
    }

    #[test]
    fn reject_clauses_before_header() {
        let cnf = "1 -3 0";
        assert!(matches!(
            parse(cnf.as_bytes()),
            Err(DimacsParseError::Format(_))
        ));
    }

    #[test]
    fn reject_bad_literal() {
        let cnf = "p cnf 2 1
1 two 0";
        assert!(matches!(
            parse(cnf.as_bytes()),
            Err(DimacsParseError::Format(_))
        ));
    }

    const QUINN: &str = "c  quinn.cnf
c
p cnf 16 18
  1    2  0
 -2   -4  0
  3    4  0
 -4   -5  0
  5   -6  0
  6   -7  0
  6    7  0
  7  -16  0
  8   -9  0
 -8  -14  0
  9   10  0
  9  -10  0
-10  -11  0
 10   12  0
 11   12  0
 13   14  0
 14  -15  0
 15   16  0
";

    #[test]
    fn solve_cnf_quinn() {
        let f = parse(QUINN.as_bytes()).expect("failed to parse");

        let mut solver = Solver::new(f.clone());
        match solver.solve() {
            SatResult::Satisfiable(assignment) => assert!(assignment.satisfies(&f)),
            r => panic!("expected satisfiable, got {:?}", r),
        }
    }

    #[test]
    fn parse_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
        file.write_all(QUINN.as_bytes()).expect("failed to write");

        let f = parse(File::open(file.path()).expect("failed to open")).expect("failed to parse");
        assert_eq!(f.clauses().count(), 18);
    }
}
