//! Scenario records and their per-session randomized display view.
//!
//! A [`Scenario`] is an immutable catalog entry: a situation, a fixed list of
//! response options, the expert ideal rank of each option, and an explanation
//! per option. All three arrays are positionally aligned in *canonical*
//! order.
//!
//! A [`DisplayScenario`] is derived once per test session. It keeps the
//! canonical scenario untouched and adds the same arrays reordered into
//! *display* order, plus the [`Permutation`] that translates between the two.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shuffle::{Permutation, PermutationError};

/// Number of response options per scenario in the standard item format.
pub const OPTION_COUNT: usize = 5;

/// Category label used for scenarios that carry none, when mixed with
/// labelled scenarios.
pub const UNCATEGORIZED: &str = "General";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A malformed scenario. Fatal for the entry: the catalog is misconfigured.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// The scenario has no options at all.
    #[error("scenario has no options")]
    NoOptions,

    /// `options`, `idealRanking` and `explanations` differ in length.
    #[error(
        "array length mismatch: {options} options, {ranking} ideal ranks, {explanations} explanations"
    )]
    LengthMismatch {
        /// `options.len()`.
        options: usize,
        /// `ideal_ranking.len()`.
        ranking: usize,
        /// `explanations.len()`.
        explanations: usize,
    },

    /// `idealRanking` is not a permutation of `1..=N`.
    #[error("ideal ranking {ranking:?} is not a permutation of 1..={n}")]
    InvalidIdealRanking {
        /// The rejected ranking.
        ranking: Vec<u32>,
        /// Expected number of ranks.
        n: usize,
    },

    /// Building the display view failed.
    #[error(transparent)]
    Permutation(#[from] PermutationError),
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// One situational-judgment item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// The situation presented to the learner.
    pub scenario: String,
    /// Response options in canonical order.
    pub options: Vec<String>,
    /// `ideal_ranking[i]` is the correct rank (1 = best) of `options[i]`.
    pub ideal_ranking: Vec<u32>,
    /// `explanations[i]` justifies the ideal rank of `options[i]`.
    pub explanations: Vec<String>,
    /// Topic label. Many scenarios share one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Scenario {
    /// Number of options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// The category label, with unlabelled scenarios mapped to [`UNCATEGORIZED`].
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Check the structural invariants of the entry.
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let n = self.options.len();
        if n != self.ideal_ranking.len() || n != self.explanations.len() {
            return Err(ScenarioError::LengthMismatch {
                options: n,
                ranking: self.ideal_ranking.len(),
                explanations: self.explanations.len(),
            });
        }
        if n == 0 {
            return Err(ScenarioError::NoOptions);
        }
        let mut seen = vec![false; n];
        for &rank in &self.ideal_ranking {
            let slot = usize::try_from(rank)
                .ok()
                .and_then(|r| r.checked_sub(1))
                .filter(|&r| r < n);
            match slot {
                Some(r) if !seen[r] => seen[r] = true,
                _ => {
                    return Err(ScenarioError::InvalidIdealRanking {
                        ranking: self.ideal_ranking.clone(),
                        n,
                    });
                }
            }
        }
        Ok(())
    }

    /// Produce a randomized display view of this scenario.
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if the scenario is malformed.
    pub fn randomize<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DisplayScenario, ScenarioError> {
        DisplayScenario::randomize(self.clone(), rng)
    }
}

// ---------------------------------------------------------------------------
// DisplayScenario
// ---------------------------------------------------------------------------

/// A scenario as shown in one session: arrays reordered for display, the
/// canonical scenario kept verbatim, and the mapping between the two.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayScenario {
    original: Scenario,
    options: Vec<String>,
    ideal_ranking: Vec<u32>,
    explanations: Vec<String>,
    shuffle_map: Permutation,
}

impl DisplayScenario {
    /// Validate `scenario` and shuffle its options with a fresh random
    /// permutation, applied in lock-step to all three arrays.
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if the scenario is malformed.
    pub fn randomize<R: Rng + ?Sized>(scenario: Scenario, rng: &mut R) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let shuffle_map = Permutation::random(scenario.option_count(), rng);
        Self::with_permutation(scenario, shuffle_map)
    }

    /// Build a display view with a known permutation (display→canonical).
    ///
    /// # Errors
    /// Returns a [`ScenarioError`] if the scenario is malformed or the
    /// permutation length differs from the option count.
    pub fn with_permutation(scenario: Scenario, shuffle_map: Permutation) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let options = shuffle_map.apply(&scenario.options)?;
        let ideal_ranking = shuffle_map.apply(&scenario.ideal_ranking)?;
        let explanations = shuffle_map.apply(&scenario.explanations)?;
        Ok(Self {
            original: scenario,
            options,
            ideal_ranking,
            explanations,
            shuffle_map,
        })
    }

    /// The canonical scenario, unchanged.
    #[must_use]
    pub const fn original(&self) -> &Scenario {
        &self.original
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Ideal ranks in display order.
    #[must_use]
    pub fn ideal_ranking(&self) -> &[u32] {
        &self.ideal_ranking
    }

    /// Explanations in display order.
    #[must_use]
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    /// Display→canonical mapping (and its inverse).
    #[must_use]
    pub const fn shuffle_map(&self) -> &Permutation {
        &self.shuffle_map
    }

    /// Number of options.
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Category label of the underlying scenario.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.original.category_label()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
