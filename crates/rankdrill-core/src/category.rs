//! Per-category rollup of a completed test and performance labelling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;
use crate::score::{QuestionScore, percentage};

// ---------------------------------------------------------------------------
// PerformanceLevel
// ---------------------------------------------------------------------------

/// Coarse performance band for a percentage. Lower bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceLevel {
    /// Below 60%.
    RequiresFocus,
    /// 60% and above.
    NeedsDevelopment,
    /// 70% and above.
    Satisfactory,
    /// 80% and above.
    Good,
    /// 90% and above.
    Excellent,
}

impl PerformanceLevel {
    /// Band for `pct`.
    #[must_use]
    pub const fn from_percentage(pct: u32) -> Self {
        match pct {
            90.. => Self::Excellent,
            80..=89 => Self::Good,
            70..=79 => Self::Satisfactory,
            60..=69 => Self::NeedsDevelopment,
            _ => Self::RequiresFocus,
        }
    }

    /// One-line feedback for the band.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Outstanding judgment across the scenarios.",
            Self::Good => "Solid judgment with a few rankings to refine.",
            Self::Satisfactory => "Reasonable judgment; review the explanations for missed options.",
            Self::NeedsDevelopment => "Several rankings diverged from the ideal; focused practice will help.",
            Self::RequiresFocus => "Rankings differ substantially from the ideal; work through the explanations carefully.",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Satisfactory => write!(f, "satisfactory"),
            Self::NeedsDevelopment => write!(f, "needs development"),
            Self::RequiresFocus => write!(f, "requires focus"),
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryStats / CategoryReport
// ---------------------------------------------------------------------------

/// One question's contribution to its category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    /// Position of the question in the test.
    pub question_index: usize,
    /// Scenario text.
    pub scenario: String,
    /// Points earned.
    pub earned: u32,
    /// Points possible.
    pub possible: u32,
    /// Question percentage.
    pub percentage: u32,
}

/// Rollup for one category label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Category label.
    pub category: String,
    /// Number of questions in this category.
    pub question_count: usize,
    /// Points earned.
    pub earned: u32,
    /// Points possible.
    pub possible: u32,
    /// `round(100 * earned / possible)`.
    pub percentage: u32,
    /// The questions, in test order.
    pub questions: Vec<QuestionSummary>,
}

impl CategoryStats {
    /// Performance band of this category.
    #[must_use]
    pub const fn level(&self) -> PerformanceLevel {
        PerformanceLevel::from_percentage(self.percentage)
    }
}

/// Category breakdown of a test, sorted by percentage (best first).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Categories, highest percentage first. Equal percentages keep
    /// first-seen order.
    pub categories: Vec<CategoryStats>,
    /// Highest-scoring category, if it scored above 0%.
    pub strongest: Option<String>,
    /// Lowest-scoring category, if there are several and it is below 100%.
    pub weakest: Option<String>,
}

impl CategoryReport {
    /// Stats for `label`, if present.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == label)
    }
}

/// Group parallel `(scenario, score)` pairs by category.
///
/// `scenarios` and `scores` are zipped; any surplus on either side is
/// ignored.
#[must_use]
pub fn aggregate<'a>(
    scenarios: impl IntoIterator<Item = &'a Scenario>,
    scores: impl IntoIterator<Item = &'a QuestionScore>,
) -> CategoryReport {
    let mut categories: Vec<CategoryStats> = Vec::new();

    for (question_index, (scenario, score)) in scenarios.into_iter().zip(scores).enumerate() {
        let label = scenario.category_label();
        let idx = match categories.iter().position(|c| c.category == label) {
            Some(i) => i,
            None => {
                categories.push(CategoryStats {
                    category: label.to_owned(),
                    question_count: 0,
                    earned: 0,
                    possible: 0,
                    percentage: 0,
                    questions: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let stats = &mut categories[idx];
        stats.question_count += 1;
        stats.earned += score.earned;
        stats.possible += score.possible;
        stats.questions.push(QuestionSummary {
            question_index,
            scenario: scenario.scenario.clone(),
            earned: score.earned,
            possible: score.possible,
            percentage: score.percentage(),
        });
    }

    for stats in &mut categories {
        stats.percentage = percentage(stats.earned, stats.possible);
    }
    // Stable sort keeps first-seen order among equal percentages.
    categories.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    let strongest = categories
        .first()
        .filter(|c| c.percentage > 0)
        .map(|c| c.category.clone());
    let weakest = if categories.len() > 1 {
        categories
            .last()
            .filter(|c| c.percentage < 100)
            .map(|c| c.category.clone())
    } else {
        None
    };

    CategoryReport {
        categories,
        strongest,
        weakest,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::fixtures::titled;

    fn q(earned: u32) -> QuestionScore {
        QuestionScore {
            options: vec![],
            earned,
            possible: 20,
        }
    }

    #[test]
    fn level_thresholds_are_inclusive() {
        assert_eq!(PerformanceLevel::from_percentage(100), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_percentage(90), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_percentage(89), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_percentage(80), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_percentage(70), PerformanceLevel::Satisfactory);
        assert_eq!(PerformanceLevel::from_percentage(60), PerformanceLevel::NeedsDevelopment);
        assert_eq!(PerformanceLevel::from_percentage(59), PerformanceLevel::RequiresFocus);
        assert_eq!(PerformanceLevel::from_percentage(0), PerformanceLevel::RequiresFocus);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(PerformanceLevel::RequiresFocus < PerformanceLevel::NeedsDevelopment);
        assert!(PerformanceLevel::Good < PerformanceLevel::Excellent);
        assert_eq!(format!("{}", PerformanceLevel::NeedsDevelopment), "needs development");
    }

    #[test]
    fn groups_and_sorts_by_percentage() {
        let scenarios = [
            titled("s0", Some("Ethics")),
            titled("s1", Some("Teamwork")),
            titled("s2", Some("Ethics")),
            titled("s3", Some("Safety")),
        ];
        let scores = [q(10), q(20), q(14), q(16)];
        let report = aggregate(&scenarios, &scores);

        let labels: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(labels, vec!["Teamwork", "Safety", "Ethics"]);

        let ethics = report.get("Ethics").unwrap();
        assert_eq!(ethics.question_count, 2);
        assert_eq!(ethics.earned, 24);
        assert_eq!(ethics.possible, 40);
        assert_eq!(ethics.percentage, 60);
        assert_eq!(ethics.level(), PerformanceLevel::NeedsDevelopment);
        assert_eq!(
            ethics.questions.iter().map(|q| q.question_index).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(ethics.questions[1].percentage, 70);

        assert_eq!(report.strongest.as_deref(), Some("Teamwork"));
        assert_eq!(report.weakest.as_deref(), Some("Ethics"));
    }

    #[test]
    fn single_category_has_no_weakest() {
        let scenarios = [titled("a", Some("Ethics")), titled("b", Some("Ethics"))];
        let report = aggregate(&scenarios, &[q(5), q(5)]);
        assert_eq!(report.strongest.as_deref(), Some("Ethics"));
        assert_eq!(report.weakest, None);
    }

    #[test]
    fn all_zero_has_no_strongest() {
        let scenarios = [titled("a", Some("A")), titled("b", Some("B"))];
        let report = aggregate(&scenarios, &[q(0), q(0)]);
        assert_eq!(report.strongest, None);
        assert!(report.weakest.is_some());
    }

    #[test]
    fn all_perfect_has_no_weakest() {
        let scenarios = [titled("a", Some("A")), titled("b", Some("B"))];
        let report = aggregate(&scenarios, &[q(20), q(20)]);
        assert_eq!(report.strongest.as_deref(), Some("A"));
        assert_eq!(report.weakest, None);
    }

    #[test]
    fn unlabelled_scenarios_roll_up_as_general() {
        let scenarios = [titled("a", None)];
        let report = aggregate(&scenarios, &[q(12)]);
        assert_eq!(report.categories[0].category, "General");
        assert_eq!(report.categories[0].percentage, 60);
    }

    #[test]
    fn empty_test_is_empty_report() {
        let report = aggregate(std::iter::empty(), std::iter::empty());
        assert_eq!(report, CategoryReport::default());
    }
}
