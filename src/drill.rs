//! Line-oriented test runner.
//!
//! Each question is printed with its options numbered in display order. The
//! learner answers with those numbers from best to worst (`3 1 4 2 5`,
//! `3,1,4,2,5`, or `31425` when there are fewer than ten options). A bad line
//! is explained and the question asked again. `q` abandons the test; so does
//! end of input.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use rankdrill_core::{Catalog, Ranking, TestSession, TestSummary};

use crate::report;

/// Why an answer line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// A token is not a number.
    #[error("'{0}' is not an option number")]
    NotANumber(String),

    /// A number outside `1..=n`.
    #[error("{value} is not between 1 and {n}")]
    OutOfRange {
        /// The number given.
        value: usize,
        /// Option count.
        n: usize,
    },

    /// The same option listed twice.
    #[error("option {0} is listed more than once")]
    Repeated(usize),

    /// Fewer numbers than options.
    #[error("ranked {given} of {n} options; rank every option")]
    Incomplete {
        /// Numbers given.
        given: usize,
        /// Option count.
        n: usize,
    },
}

/// Parse a full best-to-worst ordering of `n` options, 1-based.
///
/// # Errors
/// Returns an [`OrderError`] unless every option appears exactly once.
pub fn parse_order(line: &str, n: usize) -> Result<Ranking, OrderError> {
    let line = line.trim();
    let tokens: Vec<&str> = if n < 10
        && line.len() == n
        && line.chars().all(|c| c.is_ascii_digit())
    {
        // Compact form: one digit per option.
        (0..n).map(|i| &line[i..=i]).collect()
    } else {
        line.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect()
    };

    let mut ranking = Ranking::new();
    for token in tokens {
        let value: usize = token
            .parse()
            .map_err(|_| OrderError::NotANumber(token.to_owned()))?;
        if value == 0 || value > n {
            return Err(OrderError::OutOfRange { value, n });
        }
        if ranking.rank_of(value - 1).is_some() {
            return Err(OrderError::Repeated(value));
        }
        ranking.toggle(value - 1);
    }
    if !ranking.is_complete(n) {
        return Err(OrderError::Incomplete {
            given: ranking.len(),
            n,
        });
    }
    Ok(ranking)
}

/// Read and validate a scenario catalog from a JSON file.
///
/// # Errors
/// Fails if the file cannot be read or any scenario is malformed.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read catalog {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("invalid catalog {}", path.display()))
}

/// Walk the learner through `session`.
///
/// Returns `None` if the test was abandoned. `clock` supplies the completion
/// timestamp and is only called when the last question is answered.
///
/// # Errors
/// Propagates I/O failures on `input` or `out`.
#[tracing::instrument(skip_all, fields(questions = session.len()))]
pub fn run<R, W>(
    mut session: TestSession,
    input: &mut R,
    out: &mut W,
    clock: impl FnOnce() -> u64,
) -> Result<Option<TestSummary>>
where
    R: BufRead,
    W: Write,
{
    let total = session.len();
    for index in 0..total {
        let Some(question) = session.question(index) else {
            break;
        };
        let n = question.option_count();
        report::write_question(out, index, total, question)?;

        let ranking = loop {
            write!(
                out,
                "\nRank best to worst (e.g. {}), q to quit: ",
                example(n)
            )?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                tracing::debug!(index, "input closed; test abandoned");
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                tracing::debug!(index, "test abandoned");
                return Ok(None);
            }
            match parse_order(trimmed, n) {
                Ok(r) => break r,
                Err(e) => writeln!(out, "  {e}")?,
            }
        };

        if let Some(score) = session.answer(index, &ranking) {
            let score = score.clone();
            if let Some(question) = session.question(index) {
                report::write_feedback(out, question, &score)?;
            }
        }
    }

    let summary = session.finish(clock());
    report::write_summary(out, &summary)?;
    Ok(Some(summary))
}

fn example(n: usize) -> String {
    (1..=n)
        .rev()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use rankdrill_core::{DisplayScenario, Permutation, Scenario};

    fn question(category: &str) -> DisplayScenario {
        let s = Scenario {
            scenario: "A teammate misses a deadline.".to_owned(),
            options: ["Ask why", "Cover", "Report", "Ignore", "Blame"]
                .map(str::to_owned)
                .to_vec(),
            ideal_ranking: vec![1, 2, 3, 4, 5],
            explanations: ["e1", "e2", "e3", "e4", "e5"].map(str::to_owned).to_vec(),
            category: Some(category.to_owned()),
        };
        // Display 0 shows canonical 2, display 1 shows canonical 0, ...
        let p = Permutation::from_display_to_canonical(vec![2, 0, 4, 1, 3]).unwrap();
        DisplayScenario::with_permutation(s, p).unwrap()
    }

    fn drive(questions: Vec<DisplayScenario>, input: &str) -> (Option<TestSummary>, String) {
        let session = TestSession::from_questions(questions);
        let mut out = Vec::new();
        let summary = run(session, &mut Cursor::new(input), &mut out, || 42).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_accepts_separators() {
        let r = parse_order("3 1 4 2 5", 5).unwrap();
        assert_eq!(r.order(), &[2, 0, 3, 1, 4]);
        assert_eq!(parse_order("3,1,4,2,5", 5).unwrap(), r);
        assert_eq!(parse_order(" 3, 1  4,2 5 ", 5).unwrap(), r);
        assert_eq!(parse_order("31425", 5).unwrap(), r);
    }

    #[test]
    fn parse_rejects_bad_lines() {
        assert_eq!(
            parse_order("1 2 x 4 5", 5),
            Err(OrderError::NotANumber("x".to_owned()))
        );
        assert_eq!(
            parse_order("1 2 3 4 6", 5),
            Err(OrderError::OutOfRange { value: 6, n: 5 })
        );
        assert_eq!(
            parse_order("0 1 2 3 4", 5),
            Err(OrderError::OutOfRange { value: 0, n: 5 })
        );
        assert_eq!(parse_order("1 2 2 4 5", 5), Err(OrderError::Repeated(2)));
        assert_eq!(
            parse_order("1 2 3", 5),
            Err(OrderError::Incomplete { given: 3, n: 5 })
        );
        assert_eq!(
            parse_order("", 5),
            Err(OrderError::Incomplete { given: 0, n: 5 })
        );
    }

    #[test]
    fn ideal_answer_scores_full_marks() {
        // Canonical 0 is at display 1, canonical 1 at display 3, and so on.
        let (summary, text) = drive(vec![question("Teamwork")], "2 4 1 5 3\n");
        let summary = summary.unwrap();
        assert_eq!(summary.timestamp, 42);
        assert_eq!(summary.totals().earned, 20);
        assert!(text.contains("Score: 20/20 (100%)"));
        assert!(text.contains("excellent"));
        assert!(text.contains("Strongest: Teamwork"));
    }

    #[test]
    fn invalid_line_is_reprompted() {
        let (summary, text) = drive(vec![question("Teamwork")], "1 2\n2 4 1 5 3\n");
        assert!(summary.is_some());
        assert!(text.contains("ranked 2 of 5 options"));
        assert_eq!(text.matches("Rank best to worst").count(), 2);
    }

    #[test]
    fn quit_abandons_test() {
        let (summary, text) = drive(vec![question("A"), question("B")], "2 4 1 5 3\nq\n");
        assert!(summary.is_none());
        assert!(text.contains("Question 2/2"));
        assert!(!text.contains("=== Results ==="));
    }

    #[test]
    fn eof_abandons_test() {
        let (summary, _) = drive(vec![question("A")], "");
        assert!(summary.is_none());
    }

    #[test]
    fn empty_session_finishes_immediately() {
        let (summary, text) = drive(vec![], "");
        let summary = summary.unwrap();
        assert_eq!(summary.percentage(), 0);
        assert!(text.contains("0 questions"));
    }

    #[test]
    fn load_catalog_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_catalog(&path).unwrap().is_empty());

        let missing = dir.path().join("missing.json");
        let err = load_catalog(&missing).unwrap_err();
        assert!(format!("{err}").contains("missing.json"));
    }
}
