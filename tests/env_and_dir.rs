#![cfg(unix)]

mod common;
use crate::common::{init_tracing, recorded, with_timeout};

use std::path::PathBuf;

use tempfile::tempdir;

#[tokio::test]
async fn extra_env_is_visible_to_the_command() {
    init_tracing();
    let (mut exec, out, _err) = recorded("echo \"$SHELLRUN_TEST_GREETING\"");
    exec.add_env("SHELLRUN_TEST_GREETING", "hi there");

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec!["hi there"]);
}

#[tokio::test]
async fn later_duplicate_env_entry_wins() {
    init_tracing();
    let (mut exec, out, _err) = recorded("echo \"$SHELLRUN_TEST_DUP\"");
    exec.add_env("SHELLRUN_TEST_DUP", "first")
        .add_env("SHELLRUN_TEST_DUP", "second");

    assert_eq!(
        exec.extra_env_entries(),
        vec!["SHELLRUN_TEST_DUP=first", "SHELLRUN_TEST_DUP=second"]
    );

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec!["second"]);
}

#[tokio::test]
async fn inherited_environment_is_kept() {
    init_tracing();
    let Ok(path) = std::env::var("PATH") else {
        return;
    };
    let (mut exec, out, _err) = recorded("echo \"$PATH\"");
    exec.add_env("SHELLRUN_TEST_UNRELATED", "x");

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec![path]);
}

#[tokio::test]
async fn working_dir_override_is_used() {
    init_tracing();
    let dir = tempdir().unwrap();
    let expected = std::fs::canonicalize(dir.path()).unwrap();
    let (mut exec, out, _err) = recorded("pwd -P");
    exec.set_working_dir(dir.path());

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec![expected.to_string_lossy().to_string()]);
}

#[tokio::test]
async fn working_dir_defaults_to_callers_directory() {
    init_tracing();
    let expected = std::fs::canonicalize(std::env::current_dir().unwrap()).unwrap();
    let (exec, out, _err) = recorded("pwd -P");
    assert!(exec.working_dir().is_none());

    with_timeout(exec.run()).await.unwrap();

    assert_eq!(out.lines(), vec![expected.to_string_lossy().to_string()]);
}

#[test]
fn empty_working_dir_clears_override() {
    let (mut exec, _out, _err) = recorded("pwd");
    exec.set_working_dir("/tmp");
    assert_eq!(exec.working_dir(), Some(PathBuf::from("/tmp").as_path()));

    exec.set_working_dir("");
    assert!(exec.working_dir().is_none());
}
