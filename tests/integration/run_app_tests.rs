use super::common::write_file;
use bigdupe::cli::Cli;
use bigdupe::error::{ExitCode, StructuredError};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// An empty config file, so the user's own config.toml never leaks in.
fn empty_config(home: &TempDir) -> PathBuf {
    let path = home.path().join("config.toml");
    fs::write(&path, "").unwrap();
    path
}

fn cli_for(dir: &Path, config: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "bigdupe",
        "-d",
        dir.to_str().unwrap(),
        "--min-size",
        "0",
        "--no-progress",
        "--config",
        config.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_exit_code_success_with_duplicates() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"dup");
    write_file(dir.path(), "b.bin", b"dup");

    let cli = cli_for(dir.path(), &empty_config(&home), &["--json"]);
    assert_eq!(bigdupe::run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_exit_code_success_without_duplicates() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    write_file(dir.path(), "unique.bin", b"unique");

    let cli = cli_for(dir.path(), &empty_config(&home), &[]);
    assert_eq!(bigdupe::run_app(cli).unwrap(), ExitCode::Success);
}

#[cfg(unix)]
#[test]
fn test_exit_code_partial_success_on_skipped_entry() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    write_file(dir.path(), "a.bin", b"dup");
    std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();

    let cli = cli_for(dir.path(), &empty_config(&home), &["--binary-units"]);
    assert_eq!(bigdupe::run_app(cli).unwrap(), ExitCode::PartialSuccess);
}

#[test]
fn test_general_error_on_invalid_path() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    let cli = cli_for(&dir.path().join("not/there"), &empty_config(&home), &[]);

    let err = bigdupe::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);

    let structured = StructuredError::new(&err, ExitCode::for_error(&err));
    assert_eq!(structured.code, "BD001");
    assert!(structured.message.contains("not/there"));
    assert!(!structured.interrupted);
}

#[test]
fn test_general_error_on_missing_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("absent.toml");
    let cli = cli_for(dir.path(), &config, &[]);

    let err = bigdupe::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("Config file not found"));
}

#[test]
fn test_config_file_excludes_apply() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    write_file(&root, "a.bin", b"dup");
    write_file(&root, "b.bin", b"dup");
    let config = dir.path().join("config.toml");
    fs::write(&config, "exclude = [\"a.bin\"]\n").unwrap();

    let cli = cli_for(&root, &config, &["--json"]);
    assert_eq!(bigdupe::run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_user_config_does_not_override_empty_config() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    let config = empty_config(&home);
    let cli = cli_for(dir.path(), &config, &[]);

    let mut settings = bigdupe::config::Settings::load(cli.config.as_deref()).unwrap();
    settings.apply_cli(&cli);
    assert_eq!(settings.min_size, 0);
    assert_eq!(settings.io_threads, bigdupe::config::DEFAULT_IO_THREADS);
    assert_eq!(settings.exclude, vec![".git", ".terraform", "node_modules"]);
}
