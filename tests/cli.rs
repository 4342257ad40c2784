//! End-to-end tests driving the `pt` binary.
//!
//! Each test gets its own workspace directory via the global `--dir`
//! flag, so no test depends on the current directory or a prior `init`.
//! Stdout is a pipe here, so the CLI emits JSON by default; assertions
//! parse it.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn pt(workspace: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pt").unwrap();
    cmd.arg("--dir").arg(workspace);
    cmd.env("PT_ACTOR", "tester");
    cmd
}

fn workspace(temp: &TempDir) -> PathBuf {
    temp.path().join(".phasetrack")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn stderr_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stderr).expect("stderr should be JSON")
}

#[test]
fn version_reports_package_version() {
    let temp = TempDir::new().unwrap();
    let output = pt(&workspace(&temp)).arg("version").output().unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn status_works_without_checkpoint_document() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws).arg("status").output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["phase"]["number"], 1);
    assert_eq!(json["phase"]["name"], "Requirements");
    assert_eq!(json["phase"]["role"], "Product Manager");

    // Reading never creates the document
    assert!(!ws.join("checkpoint.md").exists());
}

#[test]
fn phase_jump_writes_checkpoint_and_progress() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws).args(["phase", "3"]).output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["phase"], 3);
    assert_eq!(json["role"], "Senior Developer");
    assert_eq!(json["changed"], true);

    let doc = fs::read_to_string(ws.join("checkpoint.md")).unwrap();
    assert!(doc.contains("- **Current Phase**: 3"));
    assert!(doc.contains("- Phase 1: Complete"));
    assert!(doc.contains("- Phase 2: Complete"));
    assert!(doc.contains("- Phase 3: In Progress"));
    assert!(doc.contains("- Phase 4: Not Started"));
    assert!(doc.contains("- Phase 5: Not Started"));

    let status = stdout_json(&pt(&ws).arg("status").output().unwrap());
    assert_eq!(status["phase"]["number"], 3);
    assert_eq!(status["progress"][0]["status"], "complete");
    assert_eq!(status["progress"][2]["status"], "in_progress");
}

#[test]
fn phase_jump_rejects_out_of_range_input() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    for bad in ["0", "6", "abc"] {
        let output = pt(&ws).args(["phase", bad]).output().unwrap();
        assert_eq!(output.status.code(), Some(4), "input {bad:?}");

        let err = stderr_json(&output);
        assert_eq!(err["error"]["code"], "INVALID_PHASE");
        assert_eq!(err["error"]["retryable"], true);
    }

    // Rejected before any state mutation
    assert!(!ws.join("checkpoint.md").exists());
}

#[test]
fn phase_jump_to_current_phase_is_noop() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "2"]).assert().success();
    let before = fs::read_to_string(ws.join("checkpoint.md")).unwrap();

    let output = pt(&ws).args(["phase", "2"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["changed"], false);

    // Not even the timestamp moved
    let after = fs::read_to_string(ws.join("checkpoint.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn phase_jump_silent_prints_only_number() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws).args(["--silent", "phase", "4"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "4");
}

#[test]
fn phase_jump_is_reentrant_from_release() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "5"]).assert().success();
    let output = pt(&ws).args(["phase", "2"]).output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["previous"], 5);
    assert_eq!(json["phase"], 2);
}

#[test]
fn next_steps_through_tasks_then_advances_phase() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "1"]).assert().success();

    // Phase 1 has four tasks: three in-phase steps...
    for _ in 0..3 {
        let json = stdout_json(&pt(&ws).arg("next").output().unwrap());
        assert_eq!(json["step"], "task");
        assert_eq!(json["phase"], 1);
    }

    // ...then the phase advance.
    let json = stdout_json(&pt(&ws).arg("next").output().unwrap());
    assert_eq!(json["step"], "phase");
    assert_eq!(json["from"], 1);
    assert_eq!(json["to"], 2);
    assert_eq!(json["role"], "Software Architect");

    // Finished tasks accumulated as milestones.
    let show = stdout_json(&pt(&ws).args(["checkpoint", "show"]).output().unwrap());
    assert_eq!(show["milestones"].as_array().unwrap().len(), 4);
}

#[test]
fn next_saturates_at_final_phase() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "5"]).assert().success();

    // Walk the three release tasks to the end.
    for _ in 0..2 {
        let json = stdout_json(&pt(&ws).arg("next").output().unwrap());
        assert_eq!(json["step"], "task");
    }

    let json = stdout_json(&pt(&ws).arg("next").output().unwrap());
    assert_eq!(json["step"], "complete");

    // Still phase 5, no overflow.
    let status = stdout_json(&pt(&ws).arg("status").output().unwrap());
    assert_eq!(status["phase"]["number"], 5);
}

#[test]
fn checkpoint_update_is_partial() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "2"]).assert().success();
    pt(&ws)
        .args(["checkpoint", "update", "--add-blocker", "waiting on review"])
        .assert()
        .success();

    let output = pt(&ws)
        .args(["checkpoint", "update", "--task", "Pick the storage crate"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let show = stdout_json(&pt(&ws).args(["checkpoint", "show"]).output().unwrap());
    assert_eq!(show["task"], "Pick the storage crate");
    // The earlier blocker and the phase survived the task update.
    assert_eq!(show["phase"], 2);
    assert_eq!(show["blockers"][0], "waiting on review");
    assert_eq!(show["role"], "Software Architect");
}

#[test]
fn checkpoint_update_preserves_hand_edits() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "2"]).assert().success();

    // A human adds their own section between managed ones.
    let path = ws.join("checkpoint.md");
    let doc = fs::read_to_string(&path).unwrap().replace(
        "## Open Blockers",
        "## Scratchpad\nhand-written notes\n\n## Open Blockers",
    );
    fs::write(&path, doc).unwrap();

    pt(&ws)
        .args(["checkpoint", "update", "--task", "X"])
        .assert()
        .success();

    let after = fs::read_to_string(&path).unwrap();
    assert!(after.contains("## Scratchpad\nhand-written notes\n"));
    assert!(after.contains("- **Current Task**: X"));
}

#[test]
fn checkpoint_update_requires_a_field() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws).args(["checkpoint", "update"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stderr_json(&output)["error"]["code"], "INVALID_ARGUMENT");
}

#[test]
fn kb_add_then_show_round_trips() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws)
        .args([
            "kb",
            "add",
            "pattern",
            "auth-flow",
            "--title",
            "Auth flow",
            "--description",
            "JWT based login",
            "--content",
            "Use refresh rotation.",
            "--tags",
            "auth,security",
            "--phase",
            "3",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&pt(&ws).args(["kb", "show", "pattern", "auth-flow"]).output().unwrap());
    assert_eq!(json["id"], "auth-flow");
    assert_eq!(json["title"], "Auth flow");
    assert_eq!(json["description"], "JWT based login");
    assert_eq!(json["tags"][0], "auth");
    assert_eq!(json["tags"][1], "security");
    assert_eq!(json["phase"], 3);
    assert_eq!(json["content"], "Use refresh rotation.");
    assert_eq!(json["author"], "tester");

    // Entry document landed in the category directory.
    assert!(ws.join("kb/patterns/auth-flow.md").exists());
}

#[test]
fn kb_duplicate_add_fails_without_side_effects() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws)
        .args(["kb", "add", "pattern", "auth-flow", "--description", "first"])
        .assert()
        .success();
    let entry_before = fs::read_to_string(ws.join("kb/patterns/auth-flow.md")).unwrap();
    let index_before = fs::read_to_string(ws.join("kb/index.md")).unwrap();

    let output = pt(&ws)
        .args(["kb", "add", "pattern", "auth-flow", "--description", "second"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stderr_json(&output)["error"]["code"], "ENTRY_EXISTS");

    assert_eq!(
        entry_before,
        fs::read_to_string(ws.join("kb/patterns/auth-flow.md")).unwrap()
    );
    assert_eq!(index_before, fs::read_to_string(ws.join("kb/index.md")).unwrap());
}

#[test]
fn kb_category_synonyms_and_suggestions() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    // Plural synonym resolves
    pt(&ws)
        .args(["kb", "add", "decisions", "db-choice", "--description", "Why SQLite"])
        .assert()
        .success();
    assert!(ws.join("kb/decisions/db-choice.md").exists());

    // Typo gets a suggestion
    let output = pt(&ws)
        .args(["kb", "add", "patern", "x", "--description", "y"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let err = stderr_json(&output);
    assert_eq!(err["error"]["code"], "INVALID_CATEGORY");
    assert!(err["error"]["hint"].as_str().unwrap().contains("pattern"));
}

#[test]
fn kb_search_ranks_prefix_above_token_match() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws)
        .args(["kb", "add", "pattern", "auth-flow", "--description", "JWT based login"])
        .assert()
        .success();
    pt(&ws)
        .args(["kb", "add", "pattern", "payments", "--description", "auth token refresh"])
        .assert()
        .success();

    let json = stdout_json(
        &pt(&ws)
            .args(["kb", "search", "auth", "--limit", "5"])
            .output()
            .unwrap(),
    );
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"][0]["id"], "auth-flow");
    assert_eq!(json["results"][1]["id"], "payments");
    let first = json["results"][0]["relevance"].as_u64().unwrap();
    let second = json["results"][1]["relevance"].as_u64().unwrap();
    assert!(first > second);
}

#[test]
fn kb_search_without_matches_is_empty_not_an_error() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    let output = pt(&ws)
        .args(["kb", "search", "zzz-nonexistent"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["count"], 0);
}

#[test]
fn kb_list_survives_missing_and_corrupt_index() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    // No index at all
    let output = pt(&ws).args(["kb", "list"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["count"], 0);

    pt(&ws)
        .args(["kb", "add", "failure", "n-plus-one", "--description", "query storm"])
        .assert()
        .success();

    // Corrupt the index: list degrades to empty, add rebuilds
    fs::write(ws.join("kb/index.md"), "\u{0}garbage\u{0}").unwrap();
    let output = pt(&ws).args(["kb", "list"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["count"], 0);

    pt(&ws)
        .args(["kb", "add", "decision", "db-choice", "--description", "storage"])
        .assert()
        .success();
    let json = stdout_json(&pt(&ws).args(["kb", "list"]).output().unwrap());
    assert_eq!(json["count"], 1);
    assert_eq!(json["entries"][0]["id"], "db-choice");
}

#[test]
fn kb_show_missing_entry_suggests_similar() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws)
        .args(["kb", "add", "pattern", "auth-flow", "--description", "login"])
        .assert()
        .success();

    let output = pt(&ws)
        .args(["kb", "show", "pattern", "auth-flo"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let err = stderr_json(&output);
    assert_eq!(err["error"]["code"], "ENTRY_NOT_FOUND");
    assert!(err["error"]["message"].as_str().unwrap().contains("auth-flow"));
}

#[test]
fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws)
        .args(["--dry-run", "phase", "3"])
        .assert()
        .success();
    assert!(!ws.join("checkpoint.md").exists());

    pt(&ws)
        .args(["--dry-run", "kb", "add", "pattern", "x", "--description", "y"])
        .assert()
        .success();
    assert!(!ws.join("kb/patterns/x.md").exists());
}

#[test]
fn kb_commands_do_not_touch_the_checkpoint() {
    let temp = TempDir::new().unwrap();
    let ws = workspace(&temp);

    pt(&ws).args(["phase", "2"]).assert().success();
    let before = fs::read_to_string(ws.join("checkpoint.md")).unwrap();

    pt(&ws)
        .args(["kb", "add", "pattern", "auth-flow", "--description", "login"])
        .assert()
        .success();

    let after = fs::read_to_string(ws.join("checkpoint.md")).unwrap();
    assert_eq!(before, after);
}
