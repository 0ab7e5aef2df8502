use assert_cmd::Command;
use indoc::indoc;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// $0=--project $1=<project> $2=--outdir $3=<outdir>
const FAKE_COMPILER: &str = r#"mkdir -p "$3" && touch "$3/runtime.js" "$3/server.js" "$3/messages.js" && echo run >> "$3/compile.log""#;

fn glossa_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("glossa"));
    cmd.arg("--root").arg(root);
    cmd
}

fn build_cmd(root: &Path) -> Command {
    let mut cmd = glossa_cmd(root);
    cmd.args(["build", "--compiler", "sh", "--compiler-arg", "-c", "--compiler-arg"])
        .arg(FAKE_COMPILER);
    cmd
}

fn create_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("messages")).unwrap();
    fs::write(temp_dir.path().join("messages/en.json"), r#"{"hello":"Hello"}"#).unwrap();
    fs::write(temp_dir.path().join("messages/zh.json"), r#"{"hello":"你好"}"#).unwrap();
    fs::write(
        temp_dir.path().join("i18n.config.yaml"),
        indoc! {r#"
            pathPattern: ./messages/{locale}.json
            baseLocale: en
            locales: [en, zh]
            cookieName: locale
        "#},
    )
    .unwrap();
    temp_dir
}

fn compile_count(root: &Path) -> usize {
    fs::read_to_string(root.join("src/i18n/generated/compile.log"))
        .map(|log| log.lines().count())
        .unwrap_or(0)
}

/// Test that a second build with unchanged messages skips the compiler
#[cfg(unix)]
#[test]
fn test_build_is_incremental() {
    let project = create_project();

    build_cmd(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled messages"));
    assert_eq!(compile_count(project.path()), 1);

    build_cmd(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Messages up to date"));
    assert_eq!(compile_count(project.path()), 1);

    build_cmd(project.path()).arg("--force").assert().success();
    assert_eq!(compile_count(project.path()), 2);
}

/// Test that the cache record lands in the default cache directory
#[cfg(unix)]
#[test]
fn test_build_writes_cache_record() {
    let project = create_project();

    build_cmd(project.path()).assert().success();

    let record: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(project.path().join(".glossa-cache/i18n.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(record["config"]["cookieName"], "locale");
    assert_eq!(record["files"].as_array().unwrap().len(), 2);
}

/// Test that a failing compiler fails the build and leaves no cache behind
#[cfg(unix)]
#[test]
fn test_compiler_failure_fails_build() {
    let project = create_project();

    glossa_cmd(project.path())
        .args(["build", "--compiler", "sh", "--compiler-arg", "-c", "--compiler-arg"])
        .arg("echo 'settings.json not found' >&2; exit 1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings.json not found"));

    assert!(!project.path().join(".glossa-cache/i18n.json").exists());
}

#[cfg(unix)]
#[test]
fn test_status_and_clean() {
    let project = create_project();

    glossa_cmd(project.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache not found"))
        .stdout(predicate::str::contains("rebuild needed"));

    build_cmd(project.path()).assert().success();

    glossa_cmd(project.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    glossa_cmd(project.path()).arg("clean").assert().success();
    assert!(!project.path().join(".glossa-cache/i18n.json").exists());
}

#[test]
fn test_modules_lists_ids() {
    let project = create_project();

    glossa_cmd(project.path())
        .args(["modules", "--scope", "@acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@acme/i18n/runtime"))
        .stdout(predicate::str::contains("@acme/i18n/server"))
        .stdout(predicate::str::contains("@acme/i18n/messages"));
}

#[test]
fn test_modules_prints_shim() {
    let project = create_project();

    glossa_cmd(project.path())
        .args(["modules", "@repo/i18n/server"])
        .assert()
        .success()
        .stdout(predicate::str::contains("import \"urlpattern-polyfill\";"))
        .stdout(predicate::str::contains("/src/i18n/generated/server.js"));
}

#[test]
fn test_modules_rejects_unknown_id() {
    let project = create_project();

    glossa_cmd(project.path())
        .args(["modules", "unrelated/id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a virtual module id"));
}

#[test]
fn test_missing_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();

    glossa_cmd(temp_dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"))
        .stderr(predicate::str::contains("Failed to load i18n config from"))
        .stderr(predicate::str::contains(
            temp_dir.path().join("i18n.config.yaml").display().to_string(),
        ));
}
