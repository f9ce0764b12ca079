use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn jsv(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsv"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("jsv binary should start")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_valid_file_exits_zero() {
    let output = jsv(&[&fixture("valid_syntax.java")]);
    assert_eq!(output.status.code(), Some(0));

    let lines = stdout_lines(&output);
    assert!(lines.iter().any(|l| l == "No syntax errors detected. Code is valid."));
    assert!(lines.iter().any(|l| l == "Yes, Program syntax is valid"));
    assert_eq!(lines.last().map(String::as_str), Some("Validation complete."));
    // 默认日志级别下 stderr 保持干净
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_invalid_file_lists_diagnostics_and_exits_one() {
    let output = jsv(&[&fixture("missing_semicolon.java")]);
    assert_eq!(output.status.code(), Some(1));

    let lines = stdout_lines(&output);
    assert!(lines.iter().any(|l| l == "Syntax errors found:"));
    assert!(lines.iter().any(|l| l == "- unexpected token -> }"));
    assert!(!lines.iter().any(|l| l.starts_with("Yes, ")));
}

#[test]
fn test_illegal_character_is_printed_once() {
    let output = jsv(&[&fixture("illegal_characters.java")]);
    assert_eq!(output.status.code(), Some(1));

    let lines = stdout_lines(&output);
    let reported: Vec<&String> = lines
        .iter()
        .filter(|l| l.starts_with("- Illegal character"))
        .collect();
    assert_eq!(reported, vec!["- Illegal character '@' at line 2"]);
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn test_missing_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.java");
    let output = jsv(&[&path]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be read"), "{}", stderr);
    assert!(!stdout_lines(&output).iter().any(|l| l.starts_with("----- Starting")));
}

#[test]
fn test_no_argument_is_a_usage_error() {
    let output = jsv(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}
