use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn dupsweep_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dupsweep"))
}

/// Run the binary with an empty settings file so the caller's own
/// configuration and environment cannot leak in.
fn run(settings_dir: &Path, args: &[&str]) -> Output {
    let settings = settings_dir.join("settings.toml");
    if !settings.exists() {
        fs::write(&settings, "").unwrap();
    }
    let mut cmd = Command::new(dupsweep_bin());
    cmd.arg("--config")
        .arg(&settings)
        .arg("--no-progress")
        .args(args)
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPSWEEP_") {
            cmd.env_remove(key);
        }
    }
    cmd.output().expect("failed to run dupsweep")
}

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();
    fs::write(dir.path().join("b"), "x").unwrap();
    fs::write(dir.path().join("c"), "x").unwrap();
    fs::write(dir.path().join("u"), "y").unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_lists_groups_and_exits_zero() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(scratch.path(), &[data.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Group 1 (3 file(s)"));
    assert!(!text.contains("Group 2"));
    assert!(text.contains("Scanned 4 file(s)"));
}

#[test]
fn test_no_duplicates_message() {
    let data = tempdir().unwrap();
    fs::write(data.path().join("only"), "one").unwrap();
    let scratch = tempdir().unwrap();

    let output = run(scratch.path(), &[data.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No duplicates found."));
}

#[test]
fn test_missing_root_is_configuration_error() {
    let scratch = tempdir().unwrap();
    let missing = scratch.path().join("nope");

    let output = run(scratch.path(), &[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[DS002]"));
}

#[test]
fn test_bad_size_is_rejected() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(
        scratch.path(),
        &[data.path().to_str().unwrap(), "--min-size", "-5"],
    );

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_inverted_size_range_is_rejected() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(
        scratch.path(),
        &[data.path().to_str().unwrap(), "--min-size", "10K", "--max-size", "1K"],
    );

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_negative_threads_use_default() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(scratch.path(), &[data.path().to_str().unwrap(), "--threads=-1"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Group 1 (3 file(s)"));
}

#[test]
fn test_output_file_written() {
    let data = fixture();
    let scratch = tempdir().unwrap();
    let report = scratch.path().join("dups.txt");

    let output = run(
        scratch.path(),
        &[
            data.path().to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("Duplicate files:"));
    assert!(text.contains("Group 1 (3 file(s), size: 1 bytes):"));
}

#[test]
fn test_delete_dry_run_keeps_everything() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(
        scratch.path(),
        &[data.path().to_str().unwrap(), "--delete", "--dry-run"],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output).matches("[would delete] ").count(), 2);
    assert_eq!(fs::read_dir(data.path()).unwrap().count(), 4);
}

#[test]
fn test_delete_with_yes_and_report() {
    let data = fixture();
    let scratch = tempdir().unwrap();
    let report = scratch.path().join("deleted.txt");

    let output = run(
        scratch.path(),
        &[
            data.path().to_str().unwrap(),
            "--delete",
            "-y",
            "--delete-report",
            report.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(data.path().join("a").exists());
    assert!(!data.path().join("b").exists());
    assert!(!data.path().join("c").exists());
    assert!(data.path().join("u").exists());
    assert!(stdout(&output).contains("Total deleted: 2"));

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("Duplicate File Deletion Report\n"));
}

#[test]
fn test_conflicting_modes_rejected_by_parser() {
    let data = fixture();
    let scratch = tempdir().unwrap();

    let output = run(
        scratch.path(),
        &[data.path().to_str().unwrap(), "--delete", "--interactive"],
    );

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(fs::read_dir(data.path()).unwrap().count(), 4);
}
