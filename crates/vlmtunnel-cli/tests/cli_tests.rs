//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vlmtunnel() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("vlmtunnel").unwrap();
    cmd.env_remove("VLMTUNNEL_SOURCE").env("RUST_LOG", "warn");
    cmd
}

/// A temp dir with the demo dataset written by `init`.
fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    vlmtunnel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vlmtunnel.toml"))
        .stdout(predicate::str::contains(
            "Created static/data/vlmtunnel/circuits_manifest.json",
        ));

    assert!(dir.path().join("vlmtunnel.toml").exists());
    assert!(dir
        .path()
        .join("static/data/vlmtunnel/scavenger/s1.json")
        .exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_demo_dataset() {
    let dir = initialized();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--deep")
        .assert()
        .success()
        .stdout(predicate::str::contains("object-reid manifest"))
        .stdout(predicate::str::contains("(2 entries)"))
        .stdout(predicate::str::contains("All manifests valid"));
}

#[test]
fn validate_reports_broken_metadata() {
    let dir = initialized();
    std::fs::write(
        dir.path().join("static/data/vlmtunnel/circuits/c2.json"),
        r#"{"mapping": {"A1": "U2"}, "query_port": "A1", "correct_comp": "R7"}"#,
    )
    .unwrap();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--deep")
        .assert()
        .success()
        .stdout(predicate::str::contains("[c2] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_missing_source_fails() {
    let dir = TempDir::new().unwrap();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--source")
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_without_manifests_fails() {
    let dir = TempDir::new().unwrap();

    vlmtunnel()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--source")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load manifests"));
}

#[test]
fn play_scavenger_correct_answer() {
    let dir = initialized();

    vlmtunnel()
        .current_dir(dir.path())
        .args(["play", "--quiz", "scavenger", "--seed", "7"])
        .write_stdin("blue\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Start on the red triangle and follow 3 label hops.",
        ))
        .stdout(predicate::str::contains("Nice tracking! The trail ends on Blue."))
        .stdout(predicate::str::contains("Final score: 1/1 (100%)"));
}

#[test]
fn play_counts_each_example_once() {
    let dir = initialized();

    vlmtunnel()
        .current_dir(dir.path())
        .args(["play", "--quiz", "scavenger", "--seed", "7"])
        .write_stdin("red\nblue\nn\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Close, but the trail ends on Blue."))
        .stdout(predicate::str::contains("Already answered"))
        .stdout(predicate::str::contains("Final score: 1/2 (50%)"));
}

#[test]
fn play_stops_after_rounds() {
    let dir = initialized();

    vlmtunnel()
        .current_dir(dir.path())
        .args(["play", "--quiz", "circuit", "--rounds", "1"])
        .write_stdin("1\nn\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("How you compare"))
        .stdout(predicate::str::contains("Final score: ").and(predicate::str::contains("/1 (")));
}

#[test]
fn play_rejects_unknown_quiz() {
    vlmtunnel()
        .args(["play", "--quiz", "chess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown quiz"));
}

#[test]
fn render_writes_page() {
    let dir = initialized();
    let output = dir.path().join("out/page.html");

    vlmtunnel()
        .current_dir(dir.path())
        .arg("render")
        .arg("--output")
        .arg(&output)
        .args(["--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scavenger: example s1"));

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("id=\"reid-scoreboard\""));
    assert!(html.contains("scavenger-option-blue"));
    assert!(html.contains("How you compare"));
}

#[test]
fn benchmarks_text_and_json() {
    vlmtunnel()
        .args(["benchmarks", "--quiz", "circuit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Circuit Connections"))
        .stdout(predicate::str::contains("InternVL3 (14B)"))
        .stdout(predicate::str::contains("99%"));

    let output = vlmtunnel()
        .args(["benchmarks", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["object-reid"]["top"][0]["name"], "GPT-5");
    assert_eq!(value["scavenger"]["human"], 100.0);
}

#[test]
fn benchmarks_unknown_format_fails() {
    vlmtunnel()
        .args(["benchmarks", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn help_output() {
    vlmtunnel()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Visual reasoning quizzes against VLM benchmarks",
        ));
}

#[test]
fn version_output() {
    vlmtunnel()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vlmtunnel"));
}
