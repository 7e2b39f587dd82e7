//! Scenario catalog: the read-only list of items a test is drawn from.
//!
//! The on-disk format is a JSON array of scenario objects:
//!
//! ```json
//! [
//!   {
//!     "scenario": "A patient asks you to keep a secret…",
//!     "options": ["…", "…", "…", "…", "…"],
//!     "idealRanking": [2, 1, 5, 3, 4],
//!     "explanations": ["…", "…", "…", "…", "…"],
//!     "category": "Confidentiality"
//!   }
//! ]
//! ```
//!
//! Every entry is validated at load time; the first malformed entry aborts
//! the load with its index.

use thiserror::Error;

use crate::scenario::{Scenario, ScenarioError};

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not a JSON array of scenarios.
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry failed validation.
    #[error("catalog entry {index} is malformed: {source}")]
    InvalidEntry {
        /// Zero-based position of the entry.
        index: usize,
        /// What is wrong with it.
        source: ScenarioError,
    },
}

/// A validated, ordered list of scenarios.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// Wrap already-built scenarios, validating each.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidEntry`] for the first malformed scenario.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, CatalogError> {
        for (index, s) in scenarios.iter().enumerate() {
            s.validate()
                .map_err(|source| CatalogError::InvalidEntry { index, source })?;
        }
        Ok(Self { scenarios })
    }

    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    /// Returns [`CatalogError::Parse`] on malformed JSON or
    /// [`CatalogError::InvalidEntry`] on a structurally invalid scenario.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let scenarios: Vec<Scenario> = serde_json::from_str(json)?;
        let catalog = Self::new(scenarios)?;
        tracing::debug!(
            scenarios = catalog.len(),
            categories = catalog.categories().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// All scenarios, in catalog order.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// `true` if the catalog holds no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Distinct category labels in first-seen order. Unlabelled scenarios are
    /// not listed.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for label in self.scenarios.iter().filter_map(|s| s.category.as_deref()) {
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    }

    /// Scenario count per category label (unlabelled under
    /// [`UNCATEGORIZED`](crate::scenario::UNCATEGORIZED)), in first-seen order.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = Vec::new();
        for s in &self.scenarios {
            let label = s.category_label();
            match out.iter_mut().find(|(l, _)| *l == label) {
                Some((_, n)) => *n += 1,
                None => out.push((label, 1)),
            }
        }
        out
    }
}

impl AsRef<[Scenario]> for Catalog {
    fn as_ref(&self) -> &[Scenario] {
        &self.scenarios
    }
}
