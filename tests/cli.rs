use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp script file");
    file.write_all(source.as_bytes()).expect("write script contents");
    file
}

/// spec §6: zero exit code and the printed output on a clean run.
#[test]
fn successful_script_exits_zero_and_prints_output() {
    let file = script("print 1 + 2 * 3;");

    Command::cargo_bin("loxrs")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("7\n");
}

/// spec §6: exit code 65 for a parse-error surface.
#[test]
fn parse_error_exits_65() {
    let file = script("break;");

    Command::cargo_bin("loxrs").unwrap().arg(file.path()).assert().code(65);
}

/// spec §6: exit code 65 for a resolve-error surface.
#[test]
fn resolve_error_exits_65() {
    let file = script("{ var a = a; }");

    Command::cargo_bin("loxrs").unwrap().arg(file.path()).assert().code(65);
}

/// spec §6: exit code 70 for a runtime error.
#[test]
fn runtime_error_exits_70() {
    let file = script("print 1 + \"a\";");

    Command::cargo_bin("loxrs").unwrap().arg(file.path()).assert().code(70);
}

/// spec §6: more than one argument prints a usage line and exits 64.
#[test]
fn too_many_arguments_exits_64_with_usage() {
    let output = Command::cargo_bin("loxrs")
        .unwrap()
        .arg("a.lox")
        .arg("b.lox")
        .output()
        .expect("loxrs should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage:"));
}
