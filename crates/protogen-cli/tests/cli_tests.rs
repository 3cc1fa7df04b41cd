//! Integration tests for the protogen binary.
//!
//! Runs the built executable against schema files in temporary directories.

#![allow(non_snake_case)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCHEMA: &str = r#"
[[messages]]
id = 10
name = "Chat"

[[messages.fields]]
name = "text"
type = "string"

[[messages.fields]]
name = "mentions"
type = "set<long>"
compatible = true
"#;

fn protogen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protogen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_schema(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn generate___valid_schema___succeeds_and_prints_digest() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "schema.toml", SCHEMA);
    let out = dir.path().to_string_lossy().into_owned();

    let output = protogen(&["generate", "--schema", &schema, "--output", &out]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("Generated 4 files"));
    assert!(text.contains("Digest: "));
    assert!(dir.path().join("jsProtocol/Chat.js").is_file());
    assert!(dir.path().join("jsProtocol/ProtocolManager.js").is_file());
}

#[test]
fn generate___repeated___prints_same_digest() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "schema.toml", SCHEMA);
    let out = dir.path().to_string_lossy().into_owned();

    let first = stdout(&protogen(&["generate", "-s", &schema, "-o", &out]));
    let second = stdout(&protogen(&["generate", "-s", &schema, "-o", &out]));

    let digest = |text: &str| {
        text.lines()
            .find(|line| line.contains("Digest: "))
            .map(str::to_string)
    };
    assert!(digest(&first).is_some());
    assert_eq!(digest(&first), digest(&second));
}

#[test]
fn generate___duplicate_ids___fails_without_output() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        "dup.toml",
        "[[messages]]\nid = 1\nname = \"A\"\n\n[[messages]]\nid = 1\nname = \"B\"\n",
    );
    let out = dir.path().to_string_lossy().into_owned();

    let output = protogen(&["generate", "--schema", &schema, "--output", &out]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate protocol id 1"));
    assert!(!dir.path().join("jsProtocol").exists());
}

#[test]
fn check___valid_schema___reports_counts() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path(), "schema.toml", SCHEMA);

    let output = protogen(&["check", "--schema", &schema]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Messages: 1"));
    assert!(text.contains("Fields: 2"));
    assert!(text.contains("Schema is valid!"));
}

#[test]
fn check___unknown_type___fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        "bad.toml",
        "[[messages]]\nid = 1\nname = \"A\"\n\n[[messages.fields]]\nname = \"x\"\ntype = \"Missing\"\n",
    );

    let output = protogen(&["check", "--schema", &schema]);

    assert!(!output.status.success());
    assert!(!dir.path().join("jsProtocol").exists());
}

#[test]
fn check___nesting_over_default_limit___fails() {
    let dir = TempDir::new().unwrap();
    let deep = format!("{}int{}", "list<".repeat(33), ">".repeat(33));
    let schema = write_schema(
        dir.path(),
        "deep.toml",
        &format!("[[messages]]\nid = 1\nname = \"B\"\n\n[[messages.fields]]\nname = \"x\"\ntype = \"{deep}\"\n"),
    );

    let output = protogen(&["check", "--schema", &schema]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("B.x"));
}

#[test]
fn check___reserved_field_name___fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        dir.path(),
        "reserved.toml",
        "[[messages]]\nid = 1\nname = \"Login\"\n\n[[messages.fields]]\nname = \"protocolId\"\ntype = \"int\"\n",
    );

    let output = protogen(&["check", "--schema", &schema]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("reserved"));
}
