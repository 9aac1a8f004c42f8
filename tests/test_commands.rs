//! End-to-end tests of the command handlers on a local store

mod common;

use clap::Parser;
use common::{read_json, write_json, TestEnv};
use docport::cli::{Answer, Cli, ScriptedPrompter};
use docport::commands;
use docport::error::Abort;
use docport::preferences::PreferenceStore;
use serde_json::json;

fn run(env: &TestEnv, args: &[&str], prompter: &mut ScriptedPrompter) -> anyhow::Result<()> {
    let config = env.config_path();
    let root = env.store_root();
    let mut argv = vec![
        "docport".to_string(),
        "--no-progress".to_string(),
        "--config-file".to_string(),
        config.display().to_string(),
        "--store-root".to_string(),
        root.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    let cli = Cli::parse_from(argv);
    commands::run(&cli, prompter)
}

fn abort(result: anyhow::Result<()>) -> Abort {
    result
        .unwrap_err()
        .downcast::<Abort>()
        .expect("command should stop with an abort")
}

#[test]
fn test_forced_export_writes_selected_collections() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({ "name": "a" }));
    env.seed_document("alpha", "logs", "l1", &json!({ "level": "info" }));
    let out = env.path().join("exports").join("users.json");

    let mut prompter = ScriptedPrompter::new([]);
    run(
        &env,
        &[
            "export-collection",
            "users",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-f",
        ],
        &mut prompter,
    )
    .unwrap();

    assert_eq!(read_json(&out), json!({ "users": { "u1": { "name": "a" } } }));
    assert!(prompter.asked.is_empty(), "forced runs never prompt");
}

#[test]
fn test_declined_export_writes_nothing() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));
    let out = env.path().join("out.json");

    let mut prompter = ScriptedPrompter::new([Answer::Confirm(false)]);
    let result = run(
        &env,
        &[
            "export-collection",
            "-a",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ],
        &mut prompter,
    );

    assert_eq!(abort(result), Abort::Cancelled);
    assert!(!out.exists());
}

#[test]
fn test_forced_export_with_unknown_collection_is_fatal() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));

    let mut prompter = ScriptedPrompter::new([]);
    let result = run(
        &env,
        &["export-collection", "ghost", "-s", sa.to_str().unwrap(), "-f"],
        &mut prompter,
    );

    match abort(result) {
        Abort::Fatal(message) => {
            assert!(message.contains("cannot be found in the alpha project"));
            assert!(message.contains("ghost"));
        }
        other => panic!("expected a fatal abort, got {:?}", other),
    }
}

#[test]
fn test_typed_cancel_does_not_delete() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));

    let mut prompter = ScriptedPrompter::new([Answer::text("yes"), Answer::text("cancel")]);
    let result = run(
        &env,
        &["delete-collection", "-c", "users", "-s", sa.to_str().unwrap()],
        &mut prompter,
    );

    assert_eq!(abort(result), Abort::Cancelled);
    assert_eq!(prompter.hints.len(), 1);
    assert!(prompter.hints[0].contains("to continue"));
    assert!(env.document_path("alpha", "users", "u1").exists());
}

#[test]
fn test_typing_project_id_deletes() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));
    env.seed_document("alpha", "users", "u2", &json!({}));
    env.seed_document("alpha", "logs", "l1", &json!({}));

    let mut prompter = ScriptedPrompter::new([Answer::text("alpha")]);
    run(
        &env,
        &["delete-collection", "-c", "users", "-s", sa.to_str().unwrap()],
        &mut prompter,
    )
    .unwrap();

    assert!(!env.document_path("alpha", "users", "u1").exists());
    assert!(!env.document_path("alpha", "users", "u2").exists());
    assert!(env.document_path("alpha", "logs", "l1").exists());
}

#[test]
fn test_blocklisted_project_is_refused_even_when_forced() {
    let env = TestEnv::new();
    let sa = env.service_account("prod");
    env.seed_document("prod", "users", "u1", &json!({}));

    let mut prompter = ScriptedPrompter::new([]);
    run(&env, &["blocklist", "-a", "prod"], &mut prompter).unwrap();
    let result = run(
        &env,
        &["delete-collection", "-a", "-s", sa.to_str().unwrap(), "-f"],
        &mut prompter,
    );

    assert_eq!(
        abort(result),
        Abort::fatal("The project 'prod' is blocklisted")
    );
    assert!(env.document_path("prod", "users", "u1").exists());

    run(&env, &["blocklist", "-r", "prod"], &mut prompter).unwrap();
    run(
        &env,
        &["delete-collection", "-a", "-s", sa.to_str().unwrap(), "-f"],
        &mut prompter,
    )
    .unwrap();
    assert!(!env.document_path("prod", "users", "u1").exists());
}

#[test]
fn test_prompted_service_account_becomes_default() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    let data = write_json(
        env.path(),
        "import.json",
        &json!({ "users": { "u1": { "name": "a" } }, "skipped": null }),
    );

    let mut prompter = ScriptedPrompter::new([
        Answer::text("missing.json"),
        Answer::text(sa.to_str().unwrap()),
        Answer::Confirm(true),
    ]);
    run(
        &env,
        &["import-collection", data.to_str().unwrap()],
        &mut prompter,
    )
    .unwrap();

    assert_eq!(prompter.hints, vec!["File not found: missing.json"]);
    assert_eq!(
        read_json(&env.document_path("alpha", "users", "u1")),
        json!({ "name": "a" })
    );
    let preferences = PreferenceStore::new(env.config_path()).load().unwrap();
    assert_eq!(preferences.default_service_account(), Some(sa.as_path()));

    // The stored default is used without asking again
    let mut prompter = ScriptedPrompter::new([]);
    run(
        &env,
        &["import-collection", data.to_str().unwrap(), "-b", "-f"],
        &mut prompter,
    )
    .unwrap();
    assert!(prompter.asked.is_empty());
}

#[test]
fn test_forced_copy_between_projects() {
    let env = TestEnv::new();
    let source = env.service_account("alpha");
    let destination = env.service_account("beta");
    env.seed_document("alpha", "users", "u1", &json!({ "name": "a" }));
    env.seed_document("alpha", "users", "u2", &json!({ "name": "b" }));
    env.seed_document("beta", "users", "u9", &json!({ "name": "z" }));

    let mut prompter = ScriptedPrompter::new([]);
    run(
        &env,
        &[
            "copy-collection",
            destination.to_str().unwrap(),
            "-s",
            source.to_str().unwrap(),
            "-c",
            "users",
            "-f",
        ],
        &mut prompter,
    )
    .unwrap();

    for id in ["u1", "u2", "u9"] {
        assert!(env.document_path("beta", "users", id).exists(), "{id}");
    }
    assert_eq!(
        read_json(&env.document_path("beta", "users", "u2")),
        json!({ "name": "b" })
    );
}

#[test]
fn test_interactive_copy_selects_collections() {
    let env = TestEnv::new();
    let source = env.service_account("alpha");
    let destination = env.service_account("beta");
    env.seed_document("alpha", "logs", "l1", &json!({}));
    env.seed_document("alpha", "users", "u1", &json!({}));

    // Collections are listed sorted: logs, users
    let mut prompter =
        ScriptedPrompter::new([Answer::MultiSelect(vec![1]), Answer::Confirm(true)]);
    run(
        &env,
        &[
            "copy-collection",
            destination.to_str().unwrap(),
            "-s",
            source.to_str().unwrap(),
        ],
        &mut prompter,
    )
    .unwrap();

    assert!(env.document_path("beta", "users", "u1").exists());
    assert!(!env.document_path("beta", "logs", "l1").exists());
    assert_eq!(prompter.remaining(), 0);
}

#[test]
fn test_remote_config_export_and_import() {
    let env = TestEnv::new();
    let source = env.service_account("alpha");
    let destination = env.service_account("beta");
    let template = write_json(
        env.path(),
        "template.json",
        &json!({
            "conditions": [{ "name": "ios", "expression": "device.os == 'ios'" }],
            "parameters": { "welcome": { "defaultValue": { "value": "hello" } } }
        }),
    );
    let exported = env.path().join("exported.json");
    let mut prompter = ScriptedPrompter::new([]);

    run(
        &env,
        &["import-remote-config", template.to_str().unwrap(), "-s", source.to_str().unwrap(), "-f"],
        &mut prompter,
    )
    .unwrap();
    run(
        &env,
        &[
            "export-remote-config",
            "-s",
            source.to_str().unwrap(),
            "-o",
            exported.to_str().unwrap(),
            "-f",
        ],
        &mut prompter,
    )
    .unwrap();
    run(
        &env,
        &["import-remote-config", exported.to_str().unwrap(), "-s", destination.to_str().unwrap(), "-f"],
        &mut prompter,
    )
    .unwrap();

    let published = read_json(&env.store_root().join("beta").join("remote_config.json"));
    assert_eq!(published["parameters"]["welcome"]["defaultValue"]["value"], "hello");
    assert_eq!(published["version"]["versionNumber"], "1");
}

#[test]
fn test_existing_output_file_keep_both() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");
    env.seed_document("alpha", "users", "u1", &json!({}));
    let out = write_json(env.path(), "out.json", &json!({ "keep": true }));

    let mut prompter = ScriptedPrompter::new([Answer::Select(1), Answer::Confirm(true)]);
    run(
        &env,
        &[
            "export-collection",
            "-a",
            "-s",
            sa.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ],
        &mut prompter,
    )
    .unwrap();

    assert_eq!(read_json(&out), json!({ "keep": true }));
    assert_eq!(
        read_json(&env.path().join("out-1.json")),
        json!({ "users": { "u1": {} } })
    );
}

#[test]
fn test_config_sets_default_service_account() {
    let env = TestEnv::new();
    let sa = env.service_account("alpha");

    let mut prompter = ScriptedPrompter::new([]);
    run(&env, &["config", "-s", sa.to_str().unwrap()], &mut prompter).unwrap();

    let preferences = PreferenceStore::new(env.config_path()).load().unwrap();
    assert_eq!(preferences.default_service_account(), Some(sa.as_path()));
}
