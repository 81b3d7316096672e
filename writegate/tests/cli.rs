use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn writegate(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_writegate"));
    cmd.arg("--config")
        .arg(dir.join("absent.toml"))
        .args(args)
        .env_remove("WRITEGATE_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    match stdin {
        None => {
            cmd.stdin(Stdio::null());
            cmd.output().unwrap()
        }
        Some(text) => {
            cmd.stdin(Stdio::piped());
            let mut child = cmd.spawn().unwrap();
            child
                .stdin
                .take()
                .unwrap()
                .write_all(text.as_bytes())
                .unwrap();
            child.wait_with_output().unwrap()
        }
    }
}

fn setup() -> (TempDir, String, String) {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("target.txt");
    let source = dir.path().join("source.txt");
    std::fs::write(&target, "one\ntwo\n").unwrap();
    std::fs::write(&source, "one\nTWO\n").unwrap();
    let pair = format!("{}={}", target.display(), source.display());
    (dir, target.display().to_string(), pair)
}

#[test]
fn without_input_the_change_is_rejected() {
    let (dir, target, pair) = setup();
    let out = writegate(dir.path(), &["--write", &pair, "--no-color"], None);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\ntwo\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("rejected"), "stderr: {stderr}");
}

#[test]
fn yes_flag_applies_without_prompting() {
    let (dir, target, pair) = setup();
    let out = writegate(dir.path(), &["--write", &pair, "--yes"], None);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\nTWO\n");
}

#[test]
fn piped_answer_is_honored() {
    let (dir, target, pair) = setup();
    let out = writegate(
        dir.path(),
        &["--write", &pair, "--interaction", "plain", "--no-color"],
        Some("y\n"),
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\nTWO\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("- 2   │ two"), "stderr: {stderr}");
    assert!(stderr.contains("+   2 │ TWO"), "stderr: {stderr}");
}

#[test]
fn piped_refusal_keeps_the_file() {
    let (dir, target, pair) = setup();
    let out = writegate(
        dir.path(),
        &["--write", &pair, "--interaction", "plain", "--no-color"],
        Some("n\n"),
    );

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "one\ntwo\n");
}

#[test]
fn no_changes_is_an_error() {
    let dir = TempDir::new().unwrap();
    let out = writegate(dir.path(), &[], None);
    assert_eq!(out.status.code(), Some(2));
}
