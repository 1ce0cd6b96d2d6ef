use crate::formula::{Clause, Formula, Literal, ParseError};

// Infix CNF syntax: clauses joined by `&`, each clause a parenthesized
// disjunction of literal tokens joined by `|`, e.g. (A|~B)&(~A|C)&(C).
// `()` is the explicit empty clause. Whitespace is insignificant.
pub fn parse(input: &str) -> Result<Formula, ParseError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(Formula::new(vec![]));
    }

    let mut clauses = vec![];
    for chunk in compact.split('&') {
        clauses.push(parse_clause(chunk)?);
    }
    Ok(Formula::new(clauses))
}

fn parse_clause(chunk: &str) -> Result<Clause, ParseError> {
    let inner = chunk
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| {
            ParseError::Syntax(format!("expected a parenthesized clause, found '{}'", chunk))
        })?;
    if inner.contains('(') || inner.contains(')') {
        return Err(ParseError::Syntax(format!(
            "unbalanced parentheses in clause '{}'",
            chunk
        )));
    }
    if inner.is_empty() {
        return Ok(Clause::empty());
    }

    let mut literals = vec![];
    for token in inner.split('|') {
        literals.push(Literal::parse(token)?);
    }
    Ok(Clause::new(literals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(token: &str) -> Literal {
        Literal::parse(token).unwrap()
    }

    #[test]
    fn parse_basic() {
        let formula = parse("(A|~B)&(~A|C)&(~B|~C)&(C)").expect("failed to parse");
        assert_eq!(formula.len(), 4);
        assert_eq!(
            formula.clauses().next().unwrap(),
            &Clause::new(vec![lit("A"), lit("~B")])
        );
        assert_eq!(
            formula.clauses().last().unwrap(),
            &Clause::new(vec![lit("C")])
        );
    }

    #[test]
    fn whitespace_is_insignificant() {
        let spaced = parse(" ( A | ~B )\n& ( C ) ").expect("failed to parse");
        let compact = parse("(A|~B)&(C)").expect("failed to parse");
        assert_eq!(spaced.to_string(), compact.to_string());
    }

    #[test]
    fn empty_input_is_the_empty_sentence() {
        assert!(parse("").expect("failed to parse").is_empty());
        assert!(parse("  \n ").expect("failed to parse").is_empty());
    }

    #[test]
    fn explicit_empty_clause() {
        let formula = parse("(A|B)&()").expect("failed to parse");
        assert_eq!(formula.len(), 2);
        assert!(formula.clauses().last().unwrap().is_empty());
    }

    #[test]
    fn duplicate_literals_collapse() {
        let formula = parse("(A|A|~B)").expect("failed to parse");
        assert_eq!(formula.clauses().next().unwrap().size(), 2);
    }

    #[test]
    fn reject_missing_parentheses() {
        assert!(matches!(parse("A|B"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse("(A|B"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse("A|B)"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse("((A|B))"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn reject_dangling_conjunction() {
        assert!(matches!(parse("(A)&"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse("&(A)"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn reject_empty_literal() {
        assert_eq!(
            parse("(A|)"),
            Err(ParseError::Syntax("empty literal".to_string()))
        );
    }

    #[test]
    fn reject_invalid_identifier() {
        assert_eq!(
            parse("(A|~1b)"),
            Err(ParseError::InvalidIdentifier("1b".to_string()))
        );
        assert_eq!(
            parse("(9)"),
            Err(ParseError::InvalidIdentifier("9".to_string()))
        );
    }
}
