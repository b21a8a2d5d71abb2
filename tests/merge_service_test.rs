//! Tests for MergeService: merge and --download

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use common::{container, test_settings, CannedInput, MockRunner};
use modelctl::application::services::{release_asset, DownloadOutcome};
use modelctl::application::ApplicationError;
use modelctl::config::{Settings, LLAMA_CPP_VERSION};

/// Create the merge tool where the settings expect it.
fn install_fake_tool(settings: &Settings) -> PathBuf {
    let tool = settings.merge_tool();
    std::fs::create_dir_all(tool.parent().unwrap()).unwrap();
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    tool
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"GGUF").unwrap();
    path
}

// ============================================================
// merge() tests
// ============================================================

#[test]
fn given_missing_first_file_when_merge_then_error_and_no_delegation() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    install_fake_tool(&settings);
    touch(temp.path(), "b.gguf");
    let runner = Arc::new(MockRunner::new());
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let err = c
        .merge_service()
        .merge(Path::new("a.gguf"), Path::new("b.gguf"))
        .unwrap_err();

    match err {
        ApplicationError::FileNotFound { path, .. } => assert_eq!(path, PathBuf::from("a.gguf")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(runner.calls().is_empty());
}

#[test]
fn given_missing_second_file_when_merge_then_error_names_it() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    install_fake_tool(&settings);
    touch(temp.path(), "a.gguf");
    let runner = Arc::new(MockRunner::new());
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let err = c
        .merge_service()
        .merge(Path::new("a.gguf"), Path::new("b.gguf"))
        .unwrap_err();

    assert_eq!(err.to_string(), "file not found: b.gguf");
    assert!(runner.calls().is_empty());
}

#[test]
fn given_directory_instead_of_file_when_merge_then_error() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    install_fake_tool(&settings);
    std::fs::create_dir(temp.path().join("a.gguf")).unwrap();
    touch(temp.path(), "b.gguf");
    let c = container(
        settings,
        Arc::new(MockRunner::new()),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let err = c
        .merge_service()
        .merge(Path::new("a.gguf"), Path::new("b.gguf"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::FileNotFound { .. }));
}

#[test]
fn given_tool_not_installed_when_merge_then_hints_download() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "a.gguf");
    touch(temp.path(), "b.gguf");
    let runner = Arc::new(MockRunner::new());
    let c = container(
        test_settings(temp.path(), None),
        runner.clone(),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let err = c
        .merge_service()
        .merge(Path::new("a.gguf"), Path::new("b.gguf"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::ProgramNotFound { .. }));
    assert!(err.hints().iter().any(|h| h.contains("--download")));
    assert!(runner.calls().is_empty());
}

#[test]
fn given_both_files_when_merge_then_delegates_to_gguf_split() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    let tool = install_fake_tool(&settings);
    touch(temp.path(), "model-00001-of-00002.gguf");
    touch(temp.path(), "model-00002-of-00002.gguf");
    let runner = Arc::new(MockRunner::new());
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let merged = c
        .merge_service()
        .merge(
            Path::new("model-00001-of-00002.gguf"),
            Path::new("model-00002-of-00002.gguf"),
        )
        .unwrap();

    assert_eq!(merged, temp.path().join("merged-model.gguf"));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, tool.to_string_lossy());
    assert_eq!(
        calls[0].args,
        vec![
            "--merge".to_string(),
            temp.path()
                .join("model-00001-of-00002.gguf")
                .to_string_lossy()
                .into_owned(),
            merged.to_string_lossy().into_owned(),
        ]
    );
}

#[test]
fn given_tool_fails_when_merge_then_propagates_exit_code() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    install_fake_tool(&settings);
    touch(temp.path(), "a.gguf");
    touch(temp.path(), "b.gguf");
    let c = container(
        settings,
        Arc::new(MockRunner::new().respond(5, "", "")),
        Arc::new(CannedInput::defaults()),
        temp.path().to_path_buf(),
    );

    let err = c
        .merge_service()
        .merge(Path::new("a.gguf"), Path::new("b.gguf"))
        .unwrap_err();

    assert!(matches!(err, ApplicationError::CommandFailed { code: 5, .. }));
}

// ============================================================
// install() tests
// ============================================================

#[test]
fn given_user_declines_when_install_then_nothing_happens() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    let install_dir = settings.install_dir();
    let runner = Arc::new(MockRunner::new());
    let input = Arc::new(CannedInput::defaults());
    let c = container(
        settings,
        runner.clone(),
        input.clone(),
        temp.path().to_path_buf(),
    );

    let outcome = c.merge_service().install("llama-bin.zip").unwrap();

    assert_eq!(outcome, DownloadOutcome::Declined);
    assert_eq!(input.questions().len(), 1);
    assert!(input.questions()[0].contains(LLAMA_CPP_VERSION));
    assert!(runner.calls().is_empty());
    assert!(!install_dir.exists());
}

#[test]
fn given_user_confirms_when_install_then_downloads_and_unpacks() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    let install_dir = settings.install_dir();
    // curl/unzip are mocked: pre-stage what they would produce
    let tool = install_fake_tool(&settings);
    let archive = touch(&install_dir, "llama-bin.zip");
    let runner = Arc::new(MockRunner::new());
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::new(&[Some("y")])),
        temp.path().to_path_buf(),
    );

    let outcome = c.merge_service().install("llama-bin.zip").unwrap();

    assert_eq!(outcome, DownloadOutcome::Installed(tool));
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].program, "curl");
    assert!(calls[0]
        .args
        .last()
        .unwrap()
        .ends_with(&format!("{LLAMA_CPP_VERSION}/llama-bin.zip")));
    assert_eq!(calls[1].program, "unzip");
    assert!(calls[1].args.contains(&install_dir.to_string_lossy().into_owned()));
    assert!(!archive.exists(), "archive should be removed");
}

#[test]
fn given_curl_fails_when_install_then_stops_before_unzip() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    let runner = Arc::new(MockRunner::new().respond(22, "", ""));
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::new(&[Some("yes")])),
        temp.path().to_path_buf(),
    );

    let err = c.merge_service().install("llama-bin.zip").unwrap_err();

    assert!(matches!(err, ApplicationError::CommandFailed { code: 22, .. }));
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn given_unzip_fails_when_install_then_archive_removed_and_code_propagated() {
    let temp = TempDir::new().unwrap();
    let settings = test_settings(temp.path(), None);
    let install_dir = settings.install_dir();
    std::fs::create_dir_all(&install_dir).unwrap();
    // curl is mocked: stage the archive it would have written
    let archive = touch(&install_dir, "llama-bin.zip");
    let runner = Arc::new(MockRunner::new().respond(0, "", "").respond(9, "", ""));
    let c = container(
        settings,
        runner.clone(),
        Arc::new(CannedInput::new(&[Some("y")])),
        temp.path().to_path_buf(),
    );

    let err = c.merge_service().install("llama-bin.zip").unwrap_err();

    assert!(matches!(err, ApplicationError::CommandFailed { code: 9, .. }), "{err:?}");
    assert_eq!(runner.calls().len(), 2);
    assert!(!archive.exists(), "archive should be removed after failed unzip");
}

#[test]
fn given_supported_host_when_release_asset_then_pinned_zip() {
    if let Some(asset) = release_asset(std::env::consts::OS, std::env::consts::ARCH) {
        assert!(asset.starts_with(&format!("llama-{LLAMA_CPP_VERSION}-bin-")));
        assert!(asset.ends_with(".zip"));
    }
}
