//! One test attempt, from selection to summary.
//!
//! ```text
//! TestSession::start(catalog, count, rng)
//!   ├── select()                 balanced subset
//!   └── DisplayScenario::randomize() per question
//! answer(i, &ranking)            score on demand (re-answer replaces)
//! finish(timestamp) → TestSummary
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryReport, PerformanceLevel, aggregate};
use crate::ranking::Ranking;
use crate::scenario::{DisplayScenario, Scenario, ScenarioError};
use crate::score::{QuestionScore, ScoreTotals, score, score_pairs};
use crate::select::select;

// ---------------------------------------------------------------------------
// TestSession
// ---------------------------------------------------------------------------

/// An in-progress test.
#[derive(Clone, Debug)]
pub struct TestSession {
    questions: Vec<DisplayScenario>,
    answers: Vec<Option<QuestionScore>>,
}

impl TestSession {
    /// Select up to `count` scenarios and shuffle each one's options.
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if a selected scenario is malformed.
    pub fn start<R: Rng + ?Sized>(
        catalog: &[Scenario],
        count: usize,
        rng: &mut R,
    ) -> Result<Self, ScenarioError> {
        let picked = select(catalog, count, rng);
        let questions = picked
            .into_iter()
            .map(|s| s.randomize(rng))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(questions = questions.len(), "test session started");
        Ok(Self::from_questions(questions))
    }

    /// Build a session from already-randomized questions.
    #[must_use]
    pub fn from_questions(questions: Vec<DisplayScenario>) -> Self {
        let answers = vec![None; questions.len()];
        Self { questions, answers }
    }

    /// The questions, in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[DisplayScenario] {
        &self.questions
    }

    /// Question `index`, if it exists.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&DisplayScenario> {
        self.questions.get(index)
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// `true` if the session has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Score `ranking` for question `index` and keep the result. Answering
    /// again replaces the earlier score. Returns `None` for an unknown index.
    pub fn answer(&mut self, index: usize, ranking: &Ranking) -> Option<&QuestionScore> {
        let question = self.questions.get(index)?;
        let result = score(ranking, question);
        let slot = self.answers.get_mut(index)?;
        *slot = Some(result);
        slot.as_ref()
    }

    /// Score `ranking` without storing it, e.g. for live partial feedback.
    #[must_use]
    pub fn live_score(&self, index: usize, ranking: &Ranking) -> Option<QuestionScore> {
        self.questions.get(index).map(|q| score(ranking, q))
    }

    /// Stored score for question `index`.
    #[must_use]
    pub fn score_for(&self, index: usize) -> Option<&QuestionScore> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Close the attempt. Unanswered questions are scored as an empty
    /// submission: every option unranked, zero out of the maximum.
    #[must_use]
    pub fn finish(self, timestamp: u64) -> TestSummary {
        let questions = self
            .questions
            .into_iter()
            .zip(self.answers)
            .map(|(display, answer)| {
                let score = answer.unwrap_or_else(|| score_pairs(&[], &display));
                ScoredQuestion { display, score }
            })
            .collect();
        TestSummary {
            questions,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// TestSummary
// ---------------------------------------------------------------------------

/// A question with its display metadata and its score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredQuestion {
    /// The question as it was shown.
    pub display: DisplayScenario,
    /// Its score, in canonical coordinates.
    pub score: QuestionScore,
}

/// One completed attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    /// Questions in presentation order.
    pub questions: Vec<ScoredQuestion>,
    /// Completion time, seconds since the Unix epoch.
    pub timestamp: u64,
}

impl TestSummary {
    /// Earned/possible totals.
    #[must_use]
    pub fn totals(&self) -> ScoreTotals {
        ScoreTotals::from_questions(self.questions.iter().map(|q| &q.score))
    }

    /// Overall percentage.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.totals().percentage()
    }

    /// Overall performance band.
    #[must_use]
    pub fn level(&self) -> PerformanceLevel {
        PerformanceLevel::from_percentage(self.percentage())
    }

    /// Per-category breakdown.
    #[must_use]
    pub fn categories(&self) -> CategoryReport {
        aggregate(
            self.questions.iter().map(|q| q.display.original()),
            self.questions.iter().map(|q| &q.score),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
