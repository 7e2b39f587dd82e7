mod common;
use common::*;

/// One full ordering per question; any valid ordering completes the test.
const FOUR_ANSWERS: &str = "1 2 3 4 5\n5 4 3 2 1\n1 2 3 4 5\n2 1 3 4 5\n";

fn history_json(dir: &std::path::Path) -> serde_json::Value {
    let stdout = rankdrill_ok(dir, &["history", "--format", "json"]);
    serde_json::from_str(&stdout).expect("history --format json should produce valid JSON")
}

#[test]
fn validate_counts_per_category() {
    let dir = setup_drill_dir();
    let stdout = rankdrill_ok(dir.path(), &["validate"]);
    assert!(stdout.contains("6 scenarios"), "{stdout}");
    assert!(stdout.contains("Ethics: 3"), "{stdout}");
    assert!(stdout.contains("Teamwork: 3"), "{stdout}");
}

#[test]
fn validate_rejects_malformed_catalog() {
    let dir = setup_drill_dir();
    std::fs::write(
        dir.path().join("bad.json"),
        r#"[{"scenario":"x","options":["a","b"],"idealRanking":[1,1],"explanations":["",""]}]"#,
    )
    .unwrap();
    let stderr = rankdrill_fails(dir.path(), &["validate", "--catalog", "bad.json"]);
    assert!(stderr.contains("bad.json"), "{stderr}");
}

#[test]
fn validate_missing_catalog_fails() {
    let dir = setup_drill_dir();
    let stderr = rankdrill_fails(dir.path(), &["validate", "--catalog", "nope.json"]);
    assert!(stderr.contains("nope.json"), "{stderr}");
}

#[test]
fn invalid_config_fails_with_path() {
    let dir = setup_drill_dir();
    std::fs::write(dir.path().join("rankdrill.toml"), "[test]\nlimit = 3\n").unwrap();
    let stderr = rankdrill_fails(dir.path(), &["validate"]);
    assert!(stderr.contains("rankdrill.toml"), "{stderr}");
}

#[test]
fn empty_history_reports_no_attempts() {
    let dir = setup_drill_dir();
    let stdout = rankdrill_ok(dir.path(), &["history"]);
    assert!(stdout.contains("No attempts recorded yet."), "{stdout}");

    let parsed = history_json(dir.path());
    assert_eq!(parsed["stats"]["total_tests"], 0);
    assert_eq!(parsed["entries"], serde_json::json!([]));
}

#[test]
fn take_records_history() {
    let dir = setup_drill_dir();
    let stdout = rankdrill_ok_with_input(dir.path(), &["take"], FOUR_ANSWERS);
    assert!(stdout.contains("Question 4/4"), "{stdout}");
    assert!(stdout.contains("=== Results ==="), "{stdout}");
    assert!(stdout.contains("Result saved to"), "{stdout}");
    assert!(dir.path().join("data/history.json").exists());

    let parsed = history_json(dir.path());
    assert_eq!(parsed["stats"]["total_tests"], 1);
    let entry = &parsed["entries"][0];
    assert_eq!(entry["question_count"], 4);
    assert_eq!(entry["possible"], 80);
    // Balanced selection: two questions from each category.
    let categories = entry["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert!(categories.iter().all(|c| c["question_count"] == 2));
}

#[test]
fn take_same_seed_same_test() {
    let dir = setup_drill_dir();
    let a = rankdrill_ok_with_input(dir.path(), &["take", "--no-save"], FOUR_ANSWERS);
    let b = rankdrill_ok_with_input(dir.path(), &["take", "--no-save"], FOUR_ANSWERS);
    assert_eq!(a, b);
}

#[test]
fn take_no_save_leaves_history_empty() {
    let dir = setup_drill_dir();
    let stdout = rankdrill_ok_with_input(dir.path(), &["take", "--no-save"], FOUR_ANSWERS);
    assert!(stdout.contains("Result not saved"), "{stdout}");
    assert!(!dir.path().join("data/history.json").exists());
}

#[test]
fn take_reprompts_then_completes() {
    let dir = setup_drill_dir();
    let input = format!("1 1 2 3 4\n{FOUR_ANSWERS}");
    let stdout = rankdrill_ok_with_input(
        dir.path(),
        &["take", "--count", "4", "--no-save"],
        &input,
    );
    assert!(stdout.contains("option 1 is listed more than once"), "{stdout}");
    assert!(stdout.contains("=== Results ==="), "{stdout}");
}

#[test]
fn take_abandoned_records_nothing() {
    let dir = setup_drill_dir();
    let stdout = rankdrill_ok_with_input(dir.path(), &["take"], "1 2 3 4 5\nq\n");
    assert!(stdout.contains("Test abandoned"), "{stdout}");
    assert!(!dir.path().join("data/history.json").exists());
}

#[test]
fn take_count_larger_than_catalog_is_capped() {
    let dir = setup_drill_dir();
    let answers = "1 2 3 4 5\n".repeat(6);
    let stdout = rankdrill_ok_with_input(
        dir.path(),
        &["take", "--count", "20", "--seed", "3", "--no-save"],
        &answers,
    );
    assert!(stdout.contains("the test will have 6 questions"), "{stdout}");
    assert!(stdout.contains("Question 6/6"), "{stdout}");
}

#[test]
fn take_rejects_zero_count() {
    let dir = setup_drill_dir();
    let stderr = rankdrill_fails(dir.path(), &["take", "--count", "0"]);
    assert!(stderr.contains("at least 1"), "{stderr}");
}

#[test]
fn clear_history_removes_attempts() {
    let dir = setup_drill_dir();
    rankdrill_ok_with_input(dir.path(), &["take"], FOUR_ANSWERS);
    rankdrill_ok_with_input(dir.path(), &["take", "--seed", "8"], FOUR_ANSWERS);
    assert_eq!(history_json(dir.path())["stats"]["total_tests"], 2);

    let stdout = rankdrill_ok(dir.path(), &["clear-history"]);
    assert!(stdout.contains("History cleared."));
    assert_eq!(history_json(dir.path())["stats"]["total_tests"], 0);

    // Clearing again is fine.
    rankdrill_ok(dir.path(), &["clear-history"]);
}

#[test]
fn history_text_shows_stats() {
    let dir = setup_drill_dir();
    rankdrill_ok_with_input(dir.path(), &["take"], FOUR_ANSWERS);
    let stdout = rankdrill_ok(dir.path(), &["history"]);
    assert!(stdout.contains("Attempts:       1"), "{stdout}");
    assert!(stdout.contains("Recent trend:   stable"), "{stdout}");
    assert!(stdout.contains("Ethics"), "{stdout}");
}
