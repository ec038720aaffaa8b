//! The `uml2grammar` binary.
#![cfg(feature = "cli")]

use std::path::Path;
use std::process::Command;

fn uml2grammar() -> Command {
    Command::new(env!("CARGO_BIN_EXE_uml2grammar"))
}

fn fixture() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fsm.uml")
}

#[test]
fn test_generate_success() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fsm.langium");

    let result = uml2grammar()
        .args(["generate", "-i", fixture(), "-o"])
        .arg(&output)
        .output()
        .unwrap();

    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains(&format!("Grammar successfully generated in \"{}\".", output.display())));
    assert!(std::fs::read_to_string(&output).unwrap().contains("interface State {"));
}

#[test]
fn test_generate_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.yaml");
    std::fs::write(&config, "grammar_name: Fsm\nentry_rule: Machine\n").unwrap();
    let output = dir.path().join("fsm.langium");

    let status = uml2grammar()
        .args(["generate", "--input", fixture(), "--output"])
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .status()
        .unwrap();

    assert!(status.success());
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("grammar Fsm\n\nentry Machine:"));
}

#[test]
fn test_missing_arguments() {
    let status = uml2grammar().args(["generate", "-i", fixture()]).status().unwrap();
    assert!(!status.success());
}

#[test]
fn test_nonexistent_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.langium");
    let result = uml2grammar()
        .args(["generate", "-i", "does/not/exist.uml", "-o"])
        .arg(&output)
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("does not exist"));
    assert!(!Path::new(&output).exists());
}

#[test]
fn test_invalid_model_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.uml");
    std::fs::write(
        &input,
        r#"<xmi:XMI><uml:Model><packagedElement xmi:type="uml:Actor" xmi:id="a" name="User"/></uml:Model></xmi:XMI>"#,
    )
    .unwrap();

    let result = uml2grammar()
        .args(["generate", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.langium"))
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("uml:Actor"));
}
