use crate::formula::{Clause, Formula, Literal};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Largest variable count a header may declare. Every literal must fit in an
/// `i64`, and both polarities of every variable need a slot in the solver's
/// occurrence index.
pub const MAX_VARIABLES: usize = (i64::MAX / 2) as usize;

/// Reads a CNF formula in DIMACS format.
///
/// Each clause line holds one clause terminated by `0`. A line starting with
/// `%` ends the input early. The declared clause count must match the clauses
/// read, and no literal may name a variable beyond the declared count.
pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut header = None;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = number + 1;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            None => continue,
            Some(token) if token.starts_with('c') => continue,
            Some(token) if token.starts_with('%') => break,
            Some(&"p") => {
                let _ = line.next();

                if header.is_some() {
                    return Err(DimacsParseError::Format(format!("line {}: duplicate 'p' line", line_number)));
                }
                if line.next() != Some("cnf") {
                    return Err(DimacsParseError::Format(format!("line {}: missing 'cnf'", line_number)));
                }

                let num_variables = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format(format!("line {}: invalid num_variables", line_number)))?;
                if num_variables > MAX_VARIABLES {
                    return Err(DimacsParseError::TooManyVariables { num_variables });
                }
                let num_clauses = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format(format!("line {}: invalid num_clauses", line_number)))?;

                header = Some((num_variables, num_clauses));
            }
            Some(_) => {
                let (num_variables, _) = header.ok_or(DimacsParseError::MissingHeader)?;
                clauses.push(parse_clause(line, num_variables, line_number)?);
            }
        }
    }

    let (num_variables, num_clauses) = header.ok_or(DimacsParseError::MissingHeader)?;
    if clauses.len() != num_clauses {
        return Err(DimacsParseError::ClauseCount {
            declared: num_clauses,
            found: clauses.len(),
        });
    }

    Ok(Formula::new(num_variables, clauses))
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Formula, DimacsParseError> {
    let file = File::open(path)?;
    parse(file)
}

fn parse_clause<'a>(
    tokens: impl Iterator<Item = &'a str>,
    num_variables: usize,
    line_number: usize,
) -> Result<Clause, DimacsParseError> {
    let mut clause = vec![];
    let mut terminated = false;
    for token in tokens {
        if terminated {
            return Err(DimacsParseError::Format(format!(
                "line {}: unexpected '{}' after clause terminator",
                line_number, token
            )));
        }
        let x = token
            .parse::<i64>()
            .map_err(|_| DimacsParseError::Format(format!("line {}: invalid literal '{}'", line_number, token)))?;
        match Literal::from_dimacs(x) {
            Some(l) if l.id() > num_variables => {
                return Err(DimacsParseError::VariableOutOfRange {
                    literal: x,
                    num_variables,
                })
            }
            Some(l) => clause.push(l),
            None => terminated = true,
        }
    }
    if !terminated {
        return Err(DimacsParseError::Format(format!(
            "line {}: clause not terminated by 0",
            line_number
        )));
    }
    Ok(Clause::new(clause))
}

#[derive(Debug, Error)]
pub enum DimacsParseError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Format(String),
    #[error("missing 'p' line before clauses")]
    MissingHeader,
    #[error("declared {declared} clauses but found {found}")]
    ClauseCount { declared: usize, found: usize },
    #[error("{num_variables} variables declared, at most {} supported", MAX_VARIABLES)]
    TooManyVariables { num_variables: usize },
    #[error("literal {literal} exceeds the declared {num_variables} variables")]
    VariableOutOfRange { literal: i64, num_variables: usize },
}
