//! Shuffle mapper: random permutations with a lossless display ↔ canonical
//! index mapping.
//!
//! A [`Permutation`] of length `n` is stored in both directions:
//!
//! ```text
//! display_to_canonical[d] = c    (the "shuffle map")
//! canonical_to_display[c] = d    (its inverse)
//! ```
//!
//! Applying a permutation to a canonical array yields the display array:
//! `display[d] = canonical[display_to_canonical[d]]`.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors building or applying a [`Permutation`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PermutationError {
    /// The supplied map is not a permutation of `0..len`.
    #[error("index map {map:?} is not a permutation of 0..{len}")]
    NotAPermutation {
        /// The rejected map.
        map: Vec<usize>,
        /// Its length.
        len: usize,
    },

    /// The permutation was applied to a slice of a different length.
    #[error("permutation of length {expected} applied to {actual} items")]
    LengthMismatch {
        /// Permutation length.
        expected: usize,
        /// Length of the slice it was applied to.
        actual: usize,
    },
}

// ---------------------------------------------------------------------------
// Permutation
// ---------------------------------------------------------------------------

/// A bijection between display positions and canonical positions.
///
/// Always holds a true permutation of `0..len`; both directions are kept in
/// sync by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    display_to_canonical: Vec<usize>,
    canonical_to_display: Vec<usize>,
}

impl Permutation {
    /// The identity permutation of length `n`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let ids: Vec<usize> = (0..n).collect();
        Self {
            display_to_canonical: ids.clone(),
            canonical_to_display: ids,
        }
    }

    /// Draw a uniformly random permutation of `0..n` (Fisher–Yates, O(n)).
    ///
    /// `n == 0` yields the empty permutation.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut map: Vec<usize> = (0..n).collect();
        map.shuffle(rng);
        let canonical_to_display = invert(&map);
        Self {
            display_to_canonical: map,
            canonical_to_display,
        }
    }

    /// Build from an explicit display→canonical map.
    ///
    /// # Errors
    /// Returns [`PermutationError::NotAPermutation`] if `map` repeats an index
    /// or contains one `>= map.len()`.
    pub fn from_display_to_canonical(map: Vec<usize>) -> Result<Self, PermutationError> {
        let len = map.len();
        let mut seen = vec![false; len];
        for &c in &map {
            if c >= len || seen[c] {
                return Err(PermutationError::NotAPermutation { map, len });
            }
            seen[c] = true;
        }
        let canonical_to_display = invert(&map);
        Ok(Self {
            display_to_canonical: map,
            canonical_to_display,
        })
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.display_to_canonical.len()
    }

    /// `true` for the empty permutation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_to_canonical.is_empty()
    }

    /// The shuffle map: `result[display] = canonical`.
    #[must_use]
    pub fn display_to_canonical(&self) -> &[usize] {
        &self.display_to_canonical
    }

    /// The inverse map: `result[canonical] = display`.
    #[must_use]
    pub fn canonical_to_display(&self) -> &[usize] {
        &self.canonical_to_display
    }

    /// Canonical index shown at `display`, or `None` if out of range.
    #[must_use]
    pub fn to_canonical(&self, display: usize) -> Option<usize> {
        self.display_to_canonical.get(display).copied()
    }

    /// Display position of canonical index `canonical`, or `None` if out of range.
    #[must_use]
    pub fn to_display(&self, canonical: usize) -> Option<usize> {
        self.canonical_to_display.get(canonical).copied()
    }

    /// Reorder `items` into display order: `out[d] = items[map[d]]`.
    ///
    /// # Errors
    /// Returns [`PermutationError::LengthMismatch`] if `items.len() != self.len()`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, PermutationError> {
        if items.len() != self.len() {
            return Err(PermutationError::LengthMismatch {
                expected: self.len(),
                actual: items.len(),
            });
        }
        Ok(self
            .display_to_canonical
            .iter()
            .map(|&c| items[c].clone())
            .collect())
    }

    /// Undo [`apply`](Self::apply): bring display-ordered `items` back to
    /// canonical order.
    ///
    /// # Errors
    /// Returns [`PermutationError::LengthMismatch`] if `items.len() != self.len()`.
    pub fn restore<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, PermutationError> {
        if items.len() != self.len() {
            return Err(PermutationError::LengthMismatch {
                expected: self.len(),
                actual: items.len(),
            });
        }
        Ok(self
            .canonical_to_display
            .iter()
            .map(|&d| items[d].clone())
            .collect())
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = PermutationError;

    fn try_from(map: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_display_to_canonical(map)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.display_to_canonical
    }
}

/// Draw a random permutation of `0..n` as a plain display→canonical map.
pub fn shuffle<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    Permutation::random(n, rng).display_to_canonical
}

fn invert(map: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; map.len()];
    for (display, &canonical) in map.iter().enumerate() {
        inverse[canonical] = display;
    }
    inverse
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------
