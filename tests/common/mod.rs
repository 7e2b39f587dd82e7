//! Shared helpers for rankdrill integration tests.
//!
//! Every test runs in its own temp directory with a small catalog, so the
//! real working directory and history are never touched.

#![allow(dead_code)]

use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Six scenarios, three in "Ethics" and three in "Teamwork".
pub fn catalog_json() -> String {
    let mut items = Vec::new();
    for category in ["Ethics", "Teamwork"] {
        for i in 1..=3 {
            items.push(serde_json::json!({
                "scenario": format!("{category} scenario {i}: a situation needs a decision."),
                "options": ["Act now", "Consult", "Wait", "Delegate", "Ignore"],
                "idealRanking": [1, 2, 3, 4, 5],
                "explanations": ["best", "good", "ok", "weak", "worst"],
                "category": category,
            }));
        }
    }
    serde_json::to_string_pretty(&items).expect("catalog serializes")
}

/// Temp dir holding `scenarios.json` and a config pointing history inside it.
pub fn setup_drill_dir() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(dir.path().join("scenarios.json"), catalog_json())
        .expect("failed to write catalog");
    std::fs::write(
        dir.path().join("rankdrill.toml"),
        "[test]\nquestion_count = 4\nseed = 7\n\n[history]\npath = \"data/history.json\"\n",
    )
    .expect("failed to write config");
    dir
}

/// Run rankdrill in `dir` with empty stdin.
pub fn rankdrill_in(dir: &Path, args: &[&str]) -> Output {
    rankdrill_with_input(dir, args, "")
}

/// Run rankdrill in `dir`, feeding `input` on stdin.
pub fn rankdrill_with_input(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rankdrill"))
        .args(args)
        .current_dir(dir)
        .env_remove("RANKDRILL_LOG")
        .env_remove("RANKDRILL_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute rankdrill");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for rankdrill")
}

/// Run rankdrill and assert it succeeds. Returns stdout as string.
pub fn rankdrill_ok(dir: &Path, args: &[&str]) -> String {
    check_ok(args, &rankdrill_in(dir, args))
}

/// Like [`rankdrill_ok`] with stdin input.
pub fn rankdrill_ok_with_input(dir: &Path, args: &[&str], input: &str) -> String {
    check_ok(args, &rankdrill_with_input(dir, args, input))
}

/// Run rankdrill and assert it fails. Returns stderr as string.
pub fn rankdrill_fails(dir: &Path, args: &[&str]) -> String {
    let out = rankdrill_in(dir, args);
    assert!(
        !out.status.success(),
        "Expected rankdrill {} to fail, but it succeeded.\nstdout: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
    );
    String::from_utf8_lossy(&out.stderr).to_string()
}

fn check_ok(args: &[&str], out: &Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "rankdrill {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}
