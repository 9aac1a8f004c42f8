//! Tests running the compiled binary

mod common;

use assert_cmd::Command;
use common::{read_json, write_json, TestEnv};
use predicates::prelude::*;
use serde_json::json;

fn docport(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("docport").unwrap();
    cmd.env("DOCPORT_CONFIG", env.config_path())
        .env("DOCPORT_STORE_ROOT", env.store_root())
        .env_remove("RUST_LOG")
        .arg("--no-progress");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    docport(&env)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export-collection"))
        .stdout(predicate::str::contains("delete-collection"))
        .stdout(predicate::str::contains("blocklist"));
}

#[test]
fn test_blocklist_add_and_list() {
    let env = TestEnv::new();
    docport(&env)
        .args(["blocklist", "-a", "prod,staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    docport(&env)
        .args(["blacklist", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("staging"));

    assert_eq!(
        read_json(&env.config_path()),
        json!({ "blocklist": ["prod", "staging"] })
    );
}

#[test]
fn test_forced_import_then_export() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    let input = write_json(
        env.path(),
        "input.json",
        &json!({ "users": { "u1": { "name": "a" } } }),
    );
    let output = env.path().join("output.json");

    docport(&env)
        .args(["import-collection", input.to_str().unwrap(), "-s", sa.to_str().unwrap(), "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "== You are currently working on the project:",
        ))
        .stdout(predicate::str::contains("alpha"));

    docport(&env)
        .args([
            "export-collection",
            "-a",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-f",
        ])
        .assert()
        .success();

    assert_eq!(read_json(&output), json!({ "users": { "u1": { "name": "a" } } }));
}

#[test]
fn test_missing_service_account_exits_with_error() {
    let env = TestEnv::new();
    docport(&env)
        .args(["delete-collection", "-a", "-s", "nowhere.json", "-f"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found: nowhere.json"));
}

#[test]
fn test_corrupted_config_exits_with_error() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.config_path().parent().unwrap()).unwrap();
    std::fs::write(env.config_path(), "{ broken").unwrap();

    docport(&env)
        .args(["blocklist", "-l"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Config file corrupted, please fix it or delete it",
        ));
}

#[test]
fn test_existing_output_file_without_overwrite_is_fatal_when_forced() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));
    let output = write_json(env.path(), "taken.json", &json!({}));

    docport(&env)
        .args([
            "export-collection",
            "-a",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-f",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File already exists"));

    docport(&env)
        .args([
            "export-collection",
            "-a",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-f",
            "-w",
        ])
        .assert()
        .success();
    assert_eq!(read_json(&output), json!({ "users": { "u1": {} } }));
}

#[test]
fn test_config_with_legacy_and_current_blocklist_keys() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.config_path().parent().unwrap()).unwrap();
    std::fs::write(
        env.config_path(),
        r#"{"blocklist":["prod"],"blacklist":["legacy"]}"#,
    )
    .unwrap();

    docport(&env)
        .args(["blocklist", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("legacy"));
}
