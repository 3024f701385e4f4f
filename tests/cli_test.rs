use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn pbs_dash() -> Command {
    let mut cmd = Command::cargo_bin("pbs-dash").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_inline_prints_sample_table() {
    pbs_dash()
        .arg("--inline")
        .assert()
        .success()
        .stdout(predicate::str::contains("PBS Jobs as of"))
        .stdout(predicate::str::contains("104829.aqua"))
        .stdout(predicate::str::contains("Source: sample"))
        .stderr(predicate::str::contains("bundled sample data"));
}

#[test]
fn test_inline_writes_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("jobs.md");

    pbs_dash()
        .arg("--inline")
        .arg("--file")
        .arg(&report)
        .assert()
        .success();

    let markdown = fs::read_to_string(&report).unwrap();
    assert!(markdown.starts_with("### PBS Jobs as of"));
    assert!(markdown.contains("| 104829.aqua | climate_model | aurora | prod | Running | 2 | nid000001 |"));
    assert!(markdown.ends_with('\n'));
}

#[test]
fn test_file_requires_inline() {
    pbs_dash()
        .args(["--file", "report.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--inline"));
}

#[test]
fn test_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{
            "timestamp": "2024-05-10T12:00:00Z",
            "source": "qstat",
            "jobs": [
                {"id": "501.pbs", "name": "sweep", "user": "carol", "queue": "batch",
                 "state": "Q", "nodes": "gpu[01-04]:ngpus=4"}
            ]
        }"#,
    )
    .unwrap();

    pbs_dash()
        .arg("--inline")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("501.pbs"))
        .stdout(predicate::str::contains("gpu01"))
        .stdout(predicate::str::contains("Source: qstat"));
}

#[test]
fn test_missing_snapshot_fails() {
    pbs_dash()
        .args(["--inline", "--snapshot", "/nonexistent/snapshot.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read snapshot"));
}

#[test]
fn test_rejects_non_positive_refresh_interval() {
    pbs_dash()
        .args(["--inline", "--refresh-interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refresh interval"));
}

#[test]
fn test_rejects_out_of_range_refresh_interval() {
    pbs_dash()
        .args(["--refresh-interval", "1e300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refresh interval"));
}
