//! Learner rankings in display coordinates.
//!
//! A [`Ranking`] is kept as the ordered sequence of display option indices
//! the learner has picked, best first. Ranks are never stored: the rank of an
//! option is its position in the sequence plus one, so deselecting an option
//! automatically closes the gap for every option picked after it.
//!
//! ```text
//! picks:  [2, 0, 3]          (display indices)
//! ranks:  2 → 1, 0 → 2, 3 → 3, others unranked
//! toggle(0)
//! picks:  [2, 3]
//! ranks:  2 → 1, 3 → 2
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An in-progress or submitted ranking for one display scenario.
///
/// Serialized as the plain pick list. Deserializing goes through
/// [`Ranking::from_order`], so repeated indices are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Ranking {
    /// Display indices, best first. Never contains duplicates.
    picks: Vec<usize>,
}

impl Ranking {
    /// An empty ranking.
    #[must_use]
    pub const fn new() -> Self {
        Self { picks: Vec::new() }
    }

    /// Build from display indices listed best to worst. Repeated indices are
    /// dropped after their first occurrence.
    #[must_use]
    pub fn from_order(order: impl IntoIterator<Item = usize>) -> Self {
        let mut ranking = Self::new();
        for index in order {
            if !ranking.picks.contains(&index) {
                ranking.picks.push(index);
            }
        }
        ranking
    }

    /// Select `display_index` as the next-best option, or deselect it if it
    /// is already ranked. Returns the option's rank after the toggle.
    pub fn toggle(&mut self, display_index: usize) -> Option<u32> {
        if let Some(pos) = self.picks.iter().position(|&i| i == display_index) {
            self.picks.remove(pos);
            None
        } else {
            self.picks.push(display_index);
            Some(rank_at(self.picks.len() - 1))
        }
    }

    /// Drop every pick.
    pub fn clear(&mut self) {
        self.picks.clear();
    }

    /// Rank currently assigned to `display_index`.
    #[must_use]
    pub fn rank_of(&self, display_index: usize) -> Option<u32> {
        self.picks
            .iter()
            .position(|&i| i == display_index)
            .map(rank_at)
    }

    /// Number of ranked options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// `true` if nothing has been ranked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// `true` when exactly the options `0..n` are ranked, each once.
    #[must_use]
    pub fn is_complete(&self, n: usize) -> bool {
        self.picks.len() == n && self.picks.iter().all(|&i| i < n)
    }

    /// Picked display indices, best first.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.picks
    }

    /// `(display_index, rank)` pairs in pick order, as consumed by the scorer.
    #[must_use]
    pub fn pairs(&self) -> Vec<(usize, u32)> {
        self.picks
            .iter()
            .enumerate()
            .map(|(pos, &i)| (i, rank_at(pos)))
            .collect()
    }

    /// `display_index → rank` view.
    #[must_use]
    pub fn ranks(&self) -> BTreeMap<usize, u32> {
        self.pairs().into_iter().collect()
    }
}

impl From<Vec<usize>> for Ranking {
    fn from(order: Vec<usize>) -> Self {
        Self::from_order(order)
    }
}

impl From<Ranking> for Vec<usize> {
    fn from(ranking: Ranking) -> Self {
        ranking.picks
    }
}

fn rank_at(position: usize) -> u32 {
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}
