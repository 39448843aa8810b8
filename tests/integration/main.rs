//! Integration tests for Modgraph
//!
//! These tests run the built binary against small projects on disk.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[[module]]
path = "src/base.nim"
includes = ["src/base_impl.inc"]

[[module]]
path = "src/util.nim"
imports = ["src/base.nim"]

[[module]]
path = "src/app.nim"
imports = ["src/util.nim"]

[[module]]
path = "src/tool.nim"
"#;

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("modgraph.toml"), MANIFEST).unwrap();
    for file in ["base.nim", "base_impl.inc", "util.nim", "app.nim", "tool.nim"] {
        fs::write(root.join("src").join(file), "").unwrap();
    }
    temp_dir
}

fn modgraph(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modgraph"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute modgraph")
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_modgraph"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Module dependency tracking for incremental recompilation"));
}

#[test]
fn test_dirty_marks_transitive_clients() {
    let project = project();
    let output = modgraph(project.path(), &["dirty", "src/base.nim"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("src/base.nim changed"));
    assert!(stdout.contains("  dirty: src/util.nim"));
    assert!(stdout.contains("  dirty: src/app.nim"));
    assert!(!stdout.contains("src/tool.nim"));
    assert!(stdout.contains("3 modules need recompiling"));
}

#[test]
fn test_dirty_leaf_module_only_marks_itself() {
    let project = project();
    let output = modgraph(project.path(), &["dirty", "src/app.nim"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 modules need recompiling"));
}

#[test]
fn test_dirty_unknown_file_fails() {
    let project = project();
    let output = modgraph(project.path(), &["dirty", "src/missing.nim"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not listed in the manifest"));
}

#[test]
fn test_deps_command() {
    let project = project();
    let output = modgraph(project.path(), &["deps", "src/app.nim"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("depends on (3):"));
    assert!(stdout.contains("depended on by (0):"));
}

#[test]
fn test_dot_command() {
    let project = project();
    let output = modgraph(project.path(), &["dot"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("digraph {"));
    assert!(stdout.contains("->"));
}

#[test]
fn test_missing_manifest_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = modgraph(temp_dir.path(), &["dot"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read manifest"));
}
