//! Plain-text rendering of questions, feedback, results and history.
//!
//! Every writer takes `&mut impl Write` so the same code drives the terminal
//! and the tests.

use std::io::{self, Write};

use rankdrill_core::category::CategoryReport;
use rankdrill_core::history::{HistoryEntry, HistoryStats};
use rankdrill_core::{DisplayScenario, QuestionScore, TestSummary};

/// Question header, scenario text and the options in display order.
///
/// # Errors
/// Propagates write failures.
pub fn write_question<W: Write>(
    out: &mut W,
    index: usize,
    total: usize,
    question: &DisplayScenario,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Question {}/{} [{}]",
        index + 1,
        total,
        question.category_label()
    )?;
    writeln!(out, "{}", question.original().scenario)?;
    writeln!(out)?;
    for (i, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}. {option}", i + 1)?;
    }
    Ok(())
}

/// Per-option feedback in canonical order: learner rank, ideal rank, points
/// and the explanation.
///
/// # Errors
/// Propagates write failures.
pub fn write_feedback<W: Write>(
    out: &mut W,
    question: &DisplayScenario,
    score: &QuestionScore,
) -> io::Result<()> {
    let original = question.original();
    writeln!(out)?;
    for option in &score.options {
        let i = option.option_index;
        let yours = if option.is_unranked() {
            "-".to_owned()
        } else {
            option.user_rank.to_string()
        };
        writeln!(
            out,
            "  [{}/{}] yours {yours}, ideal {}  {}",
            option.score, option.max_score, option.ideal_rank, original.options[i]
        )?;
        writeln!(out, "         {}", original.explanations[i])?;
    }
    writeln!(
        out,
        "  Score: {}/{} ({}%)",
        score.earned,
        score.possible,
        score.percentage()
    )
}

/// Final totals, performance band and category breakdown.
///
/// # Errors
/// Propagates write failures.
pub fn write_summary<W: Write>(out: &mut W, summary: &TestSummary) -> io::Result<()> {
    let totals = summary.totals();
    let level = summary.level();
    writeln!(out)?;
    writeln!(out, "=== Results ===")?;
    writeln!(
        out,
        "{} questions, {}/{} points ({}%): {level}",
        totals.question_count,
        totals.earned,
        totals.possible,
        totals.percentage()
    )?;
    writeln!(out, "{}", level.message())?;
    write_categories(out, &summary.categories())
}

/// Category table plus strongest/weakest callouts.
///
/// # Errors
/// Propagates write failures.
pub fn write_categories<W: Write>(out: &mut W, report: &CategoryReport) -> io::Result<()> {
    if report.categories.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "By category:")?;
    let width = report
        .categories
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);
    for c in &report.categories {
        writeln!(
            out,
            "  {:<width$}  {:>3}%  {}/{} over {} question{}",
            c.category,
            c.percentage,
            c.earned,
            c.possible,
            c.question_count,
            if c.question_count == 1 { "" } else { "s" }
        )?;
    }
    if let Some(s) = &report.strongest {
        writeln!(out, "Strongest: {s}")?;
    }
    if let Some(w) = &report.weakest {
        writeln!(out, "Weakest:   {w}")?;
    }
    Ok(())
}

/// History statistics followed by the most recent `recent` attempts.
///
/// # Errors
/// Propagates write failures.
pub fn write_stats<W: Write>(
    out: &mut W,
    stats: &HistoryStats,
    history: &[HistoryEntry],
    recent: usize,
) -> io::Result<()> {
    if stats.total_tests == 0 {
        return writeln!(out, "No attempts recorded yet.");
    }
    writeln!(out, "Attempts:       {}", stats.total_tests)?;
    writeln!(out, "Average score:  {}%", stats.average_score)?;
    writeln!(out, "Best score:     {}%", stats.best_score)?;
    writeln!(out, "Recent trend:   {}", stats.recent_trend)?;
    writeln!(
        out,
        "Streak (≥80%):  {} current, {} best",
        stats.streak.current, stats.streak.best
    )?;
    if !stats.category_averages.is_empty() {
        writeln!(out)?;
        writeln!(out, "Category averages:")?;
        for (category, avg) in &stats.category_averages {
            writeln!(out, "  {category}: {avg}%")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Recent attempts:")?;
    for entry in history.iter().take(recent) {
        writeln!(
            out,
            "  @{}  {}%  ({}/{} over {} questions)",
            entry.timestamp, entry.percentage, entry.earned, entry.possible, entry.question_count
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankdrill_core::history::compute_stats;
    use rankdrill_core::{Permutation, Ranking, Scenario, TestSession};

    fn question() -> DisplayScenario {
        let s = Scenario {
            scenario: "A customer is upset.".to_owned(),
            options: ["Listen", "Refund", "Escalate", "Ignore", "Argue"]
                .map(str::to_owned)
                .to_vec(),
            ideal_ranking: vec![1, 2, 3, 4, 5],
            explanations: ["e1", "e2", "e3", "e4", "e5"].map(str::to_owned).to_vec(),
            category: Some("Service".to_owned()),
        };
        let p = Permutation::from_display_to_canonical(vec![4, 3, 2, 1, 0]).unwrap();
        DisplayScenario::with_permutation(s, p).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn question_lists_display_order() {
        let q = question();
        let text = render(|out| write_question(out, 0, 3, &q));
        assert!(text.contains("Question 1/3 [Service]"));
        assert!(text.contains("  1. Argue"));
        assert!(text.contains("  5. Listen"));
    }

    #[test]
    fn feedback_is_in_canonical_order() {
        let q = question();
        let score = rankdrill_core::score::score(&Ranking::from_order([4, 3]), &q);
        let text = render(|out| write_feedback(out, &q, &score));
        let listen = text.find("Listen").unwrap();
        let argue = text.find("Argue").unwrap();
        assert!(listen < argue);
        assert!(text.contains("[4/4] yours 1, ideal 1  Listen"));
        assert!(text.contains("[0/4] yours -, ideal 5  Argue"));
        assert!(text.contains("Score: 8/20 (40%)"));
    }

    #[test]
    fn summary_reports_level_and_categories() {
        let mut session = TestSession::from_questions(vec![question()]);
        session.answer(0, &Ranking::from_order([4, 3, 2, 1, 0]));
        let summary = session.finish(1);
        let text = render(|out| write_summary(out, &summary));
        assert!(text.contains("1 questions, 20/20 points (100%): excellent"));
        assert!(text.contains("Service"));
        assert!(text.contains("Strongest: Service"));
        assert!(!text.contains("Weakest"));
    }

    #[test]
    fn empty_stats_message() {
        let text = render(|out| write_stats(out, &compute_stats(&[]), &[], 5));
        assert_eq!(text, "No attempts recorded yet.\n");
    }
}
