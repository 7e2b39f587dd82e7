//! Proximity scoring of a learner ranking against the ideal ranking.
//!
//! Scoring is a three-step pipeline:
//!
//! 1. **Remap** each `(display_index, rank)` pair to canonical coordinates via
//!    the scenario's shuffle map.
//! 2. **Score** every canonical option by the distance between the learner's
//!    rank and the ideal rank, using a fixed partial-credit table:
//!
//!    ```text
//!    |user - ideal|   0  1  2  3  ≥4
//!    points           4  3  2  1   0
//!    ```
//!
//! 3. **Aggregate** into a per-question total out of `N * 4`.
//!
//! The scorer never fails. An option the learner did not rank gets
//! `user_rank = 0` and zero points, so partial submissions can be scored
//! speculatively for live feedback.

use serde::{Deserialize, Serialize};

use crate::scenario::DisplayScenario;

/// Points awarded for an exact match.
pub const MAX_OPTION_SCORE: u32 = 4;

/// Points for a given rank distance.
#[must_use]
pub const fn points_for_difference(difference: u32) -> u32 {
    match difference {
        0 => 4,
        1 => 3,
        2 => 2,
        3 => 1,
        _ => 0,
    }
}

/// `round(100 * earned / possible)`, or 0 when nothing was possible.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentage(earned: u32, possible: u32) -> u32 {
    if possible == 0 {
        return 0;
    }
    let pct = (f64::from(earned) * 100.0 / f64::from(possible)).round();
    pct.clamp(0.0, f64::from(u32::MAX)) as u32
}

// ---------------------------------------------------------------------------
// OptionScore / QuestionScore
// ---------------------------------------------------------------------------

/// Result for a single option, in canonical coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionScore {
    /// Canonical option index.
    pub option_index: usize,
    /// Learner rank, 0 if unranked.
    pub user_rank: u32,
    /// Expert rank.
    pub ideal_rank: u32,
    /// `|user_rank - ideal_rank|`.
    pub difference: u32,
    /// Points earned.
    pub score: u32,
    /// Always [`MAX_OPTION_SCORE`].
    pub max_score: u32,
}

impl OptionScore {
    /// `true` if the learner left this option unranked.
    #[must_use]
    pub const fn is_unranked(&self) -> bool {
        self.user_rank == 0
    }
}

/// All option results for one question plus totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// One entry per canonical option, in canonical order.
    pub options: Vec<OptionScore>,
    /// Sum of option scores.
    pub earned: u32,
    /// `N * MAX_OPTION_SCORE`.
    pub possible: u32,
}

impl QuestionScore {
    /// Question percentage.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.earned, self.possible)
    }

    /// `true` when every option matched its ideal rank.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.possible > 0 && self.earned == self.possible
    }
}

fn max_for(n: usize) -> u32 {
    u32::try_from(n)
        .unwrap_or(u32::MAX)
        .saturating_mul(MAX_OPTION_SCORE)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score a ranking given as `(display_index, rank)` pairs.
///
/// Pairs whose index is outside the scenario are ignored. If two pairs name
/// the same option, the first wins.
#[must_use]
pub fn score_pairs(pairs: &[(usize, u32)], display: &DisplayScenario) -> QuestionScore {
    let map = display.shuffle_map();
    let ideal = &display.original().ideal_ranking;
    let n = ideal.len();

    // Step 1: canonical_index → user rank.
    let mut user_ranks: Vec<Option<u32>> = vec![None; n];
    for &(display_index, rank) in pairs {
        let Some(canonical) = map.to_canonical(display_index) else {
            tracing::warn!(display_index, n, "ignoring out-of-range ranking entry");
            continue;
        };
        if user_ranks[canonical].is_some() {
            tracing::warn!(display_index, "ignoring duplicate ranking entry");
            continue;
        }
        user_ranks[canonical] = Some(rank);
    }

    // Step 2: per-option points.
    let options: Vec<OptionScore> = ideal
        .iter()
        .zip(&user_ranks)
        .enumerate()
        .map(|(option_index, (&ideal_rank, user))| {
            let user_rank = user.unwrap_or(0);
            let difference = user_rank.abs_diff(ideal_rank);
            let score = if user.is_some() {
                points_for_difference(difference)
            } else {
                0
            };
            OptionScore {
                option_index,
                user_rank,
                ideal_rank,
                difference,
                score,
                max_score: MAX_OPTION_SCORE,
            }
        })
        .collect();

    // Step 3: totals.
    let earned = options.iter().map(|o| o.score).sum();
    QuestionScore {
        options,
        earned,
        possible: max_for(n),
    }
}

/// Score a [`Ranking`](crate::ranking::Ranking) against its display scenario.
#[must_use]
pub fn score(ranking: &crate::ranking::Ranking, display: &DisplayScenario) -> QuestionScore {
    score_pairs(&ranking.pairs(), display)
}

// ---------------------------------------------------------------------------
// Test-level totals
// ---------------------------------------------------------------------------

/// Totals across every question of a test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTotals {
    /// Number of questions.
    pub question_count: usize,
    /// Sum of earned points.
    pub earned: u32,
    /// Sum of possible points.
    pub possible: u32,
}

impl ScoreTotals {
    /// Sum a series of question scores.
    pub fn from_questions<'a>(questions: impl IntoIterator<Item = &'a QuestionScore>) -> Self {
        questions
            .into_iter()
            .fold(Self::default(), |acc, q| Self {
                question_count: acc.question_count + 1,
                earned: acc.earned + q.earned,
                possible: acc.possible + q.possible,
            })
    }

    /// Test percentage.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.earned, self.possible)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
