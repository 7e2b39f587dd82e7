//! Attempt history: persisted summaries and trend statistics.
//!
//! Each completed test is projected into a storage-safe [`HistoryEntry`] and
//! prepended to the stored list (most recent first). The list is capped at
//! [`HISTORY_LIMIT`]; older entries fall off silently.
//!
//! Persistence failures never break the scoring pipeline: [`HistoryTracker::record`]
//! always hands back the new entry and reports the write outcome alongside it.
//!
//! # Statistics
//!
//! ```text
//! recent_trend   mean(last 5) - mean(previous 5)   > +5 improving
//!                                                  < -5 declining
//!                (fewer than 10 entries → stable)
//! streak.current entries ≥ 80% counted from the most recent one
//! streak.best    longest run of entries ≥ 80% anywhere
//! ```

pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::TestSummary;

pub use store::{HistoryStore, JsonFileStore, MemoryStore, StoreError};

/// Maximum number of stored entries.
pub const HISTORY_LIMIT: usize = 50;

/// Default truncation length for scenario text in stored entries.
pub const DEFAULT_EXCERPT_CHARS: usize = 100;

/// Percentage at or above which an attempt extends a streak.
pub const STREAK_THRESHOLD: u32 = 80;

/// Entries on each side of the trend comparison.
const TREND_WINDOW: usize = 5;

/// Mean difference (percentage points) that counts as a trend.
const TREND_DELTA: f64 = 5.0;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// Category result inside a stored entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Category label.
    pub category: String,
    /// Questions in the category.
    pub question_count: usize,
    /// Points earned.
    pub earned: u32,
    /// Points possible.
    pub possible: u32,
    /// Category percentage.
    pub percentage: u32,
}

/// Question result inside a stored entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// Scenario text, possibly truncated.
    pub scenario: String,
    /// Category label.
    pub category: String,
    /// Points earned.
    pub earned: u32,
    /// Points possible.
    pub possible: u32,
}

/// Storage-safe projection of a [`TestSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Completion time, seconds since the Unix epoch.
    pub timestamp: u64,
    /// Number of questions.
    pub question_count: usize,
    /// Points earned.
    pub earned: u32,
    /// Points possible.
    pub possible: u32,
    /// Overall percentage.
    pub percentage: u32,
    /// Category results, best first.
    pub categories: Vec<CategoryResult>,
    /// Question results, in presentation order.
    pub questions: Vec<QuestionResult>,
}

impl HistoryEntry {
    /// Project `summary`, truncating scenario text to `excerpt_chars`
    /// characters.
    #[must_use]
    pub fn from_summary(summary: &TestSummary, excerpt_chars: usize) -> Self {
        let totals = summary.totals();
        let categories = summary
            .categories()
            .categories
            .into_iter()
            .map(|c| CategoryResult {
                category: c.category,
                question_count: c.question_count,
                earned: c.earned,
                possible: c.possible,
                percentage: c.percentage,
            })
            .collect();
        let questions = summary
            .questions
            .iter()
            .map(|q| QuestionResult {
                scenario: excerpt(&q.display.original().scenario, excerpt_chars),
                category: q.display.category_label().to_owned(),
                earned: q.score.earned,
                possible: q.score.possible,
            })
            .collect();
        Self {
            timestamp: summary.timestamp,
            question_count: totals.question_count,
            earned: totals.earned,
            possible: totals.possible,
            percentage: totals.percentage(),
            categories,
            questions,
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Direction of recent performance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent mean more than 5 points above the previous window.
    Improving,
    /// Within ±5 points, or not enough data.
    #[default]
    Stable,
    /// Recent mean more than 5 points below the previous window.
    Declining,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Stable => write!(f, "stable"),
            Self::Declining => write!(f, "declining"),
        }
    }
}

/// Runs of attempts at or above [`STREAK_THRESHOLD`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    /// Run length starting at the most recent attempt.
    pub current: usize,
    /// Longest run anywhere in the history.
    pub best: usize,
}

/// Aggregate statistics over a history list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of entries.
    pub total_tests: usize,
    /// Rounded mean percentage.
    pub average_score: u32,
    /// Highest percentage.
    pub best_score: u32,
    /// Recent direction.
    pub recent_trend: Trend,
    /// Rounded mean percentage per category, over entries containing it.
    pub category_averages: BTreeMap<String, u32>,
    /// Streaks.
    pub streak: StreakInfo,
}

/// Compute statistics over `history` (most recent first).
#[must_use]
#[tracing::instrument(skip_all, fields(entries = history.len()))]
pub fn compute_stats(history: &[HistoryEntry]) -> HistoryStats {
    if history.is_empty() {
        return HistoryStats::default();
    }
    let percentages: Vec<u32> = history.iter().map(|e| e.percentage).collect();

    let mut per_category: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for entry in history {
        for c in &entry.categories {
            per_category
                .entry(c.category.clone())
                .or_default()
                .push(c.percentage);
        }
    }

    HistoryStats {
        total_tests: history.len(),
        average_score: rounded_mean(&percentages),
        best_score: percentages.iter().copied().max().unwrap_or(0),
        recent_trend: trend(&percentages),
        category_averages: per_category
            .into_iter()
            .map(|(k, v)| (k, rounded_mean(&v)))
            .collect(),
        streak: streak(&percentages),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_mean(values: &[u32]) -> u32 {
    mean(values).round() as u32
}

fn trend(percentages: &[u32]) -> Trend {
    if percentages.len() < TREND_WINDOW * 2 {
        return Trend::Stable;
    }
    let recent = mean(&percentages[..TREND_WINDOW]);
    let previous = mean(&percentages[TREND_WINDOW..TREND_WINDOW * 2]);
    let delta = recent - previous;
    if delta > TREND_DELTA {
        Trend::Improving
    } else if delta < -TREND_DELTA {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn streak(percentages: &[u32]) -> StreakInfo {
    let current = percentages
        .iter()
        .take_while(|&&p| p >= STREAK_THRESHOLD)
        .count();
    let mut best = 0;
    let mut run = 0;
    for &p in percentages {
        if p >= STREAK_THRESHOLD {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    StreakInfo { current, best }
}

// ---------------------------------------------------------------------------
// HistoryTracker
// ---------------------------------------------------------------------------

/// The result of recording an attempt.
#[derive(Debug)]
pub struct RecordOutcome {
    /// The entry that was (or would have been) stored.
    pub entry: HistoryEntry,
    /// Why the write did not happen, if it did not.
    pub error: Option<StoreError>,
}

impl RecordOutcome {
    /// `true` if the entry reached the store.
    #[must_use]
    pub const fn persisted(&self) -> bool {
        self.error.is_none()
    }
}

/// Records attempts into a [`HistoryStore`] and reads statistics back.
///
/// The tracker does no locking; callers running several sessions against one
/// store must serialize calls to [`record`](Self::record).
#[derive(Debug)]
pub struct HistoryTracker<S> {
    store: S,
    excerpt_chars: usize,
}

impl<S: HistoryStore> HistoryTracker<S> {
    /// Tracker over `store` with the default excerpt length.
    pub fn new(store: S) -> Self {
        Self {
            store,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Override the scenario excerpt length.
    #[must_use]
    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Prepend `summary` to the stored history, keeping at most
    /// [`HISTORY_LIMIT`] entries.
    ///
    /// Never fails: a load or save error is carried in the outcome. If the
    /// existing history cannot be loaded, nothing is written so the stored
    /// list is not replaced by a single entry.
    #[tracing::instrument(skip_all, fields(timestamp = summary.timestamp))]
    pub fn record(&mut self, summary: &TestSummary) -> RecordOutcome {
        let entry = HistoryEntry::from_summary(summary, self.excerpt_chars);

        let mut history = match self.store.load() {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "could not load history; attempt not saved");
                return RecordOutcome {
                    entry,
                    error: Some(e),
                };
            }
        };
        history.insert(0, entry.clone());
        let dropped = history.len().saturating_sub(HISTORY_LIMIT);
        history.truncate(HISTORY_LIMIT);

        let error = match self.store.save(&history) {
            Ok(()) => {
                tracing::debug!(entries = history.len(), dropped, "attempt recorded");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not save history");
                Some(e)
            }
        };
        RecordOutcome { entry, error }
    }

    /// Every stored entry, most recent first.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the store cannot be read.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.store.load()
    }

    /// Statistics over the stored history.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the store cannot be read.
    pub fn stats(&self) -> Result<HistoryStats, StoreError> {
        Ok(compute_stats(&self.store.load()?))
    }

    /// Delete all stored history.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the store cannot be cleared.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        tracing::info!("history cleared");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
