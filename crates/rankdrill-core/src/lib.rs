//! Test assembly and scoring engine for situational-judgment ranking drills.
//!
//! Pipeline, leaf-first:
//!
//! ```text
//! select()                    balanced subset of the catalog
//!   → DisplayScenario         per-session shuffle of each scenario's options
//!   → score()                 proximity scoring, display → canonical remap
//!   → category::aggregate()   per-category rollup, strongest / weakest
//!   → HistoryTracker          persisted attempts, trend and streak stats
//! ```
//!
//! Everything except [`history::JsonFileStore`] is pure and synchronous.
//! Randomness is always passed in as an [`rand::Rng`], so seeded generators
//! give reproducible tests.

pub mod catalog;
pub mod category;
pub mod history;
pub mod ranking;
pub mod scenario;
pub mod score;
pub mod select;
pub mod session;
pub mod shuffle;

pub use catalog::{Catalog, CatalogError};
pub use category::{CategoryReport, CategoryStats, PerformanceLevel};
pub use history::{HistoryEntry, HistoryStats, HistoryStore, HistoryTracker, RecordOutcome, StoreError};
pub use ranking::Ranking;
pub use scenario::{DisplayScenario, Scenario, ScenarioError};
pub use score::{OptionScore, QuestionScore, ScoreTotals};
pub use session::{ScoredQuestion, TestSession, TestSummary};
pub use shuffle::{Permutation, PermutationError};
