use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated `FEEBOOK_HOME`, optionally disabling the sample data.
pub fn setup_home(seed_sample_data: bool) -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    if !seed_sample_data {
        fs::write(base.join("config.json"), r#"{ "seed_sample_data": false }"#)
            .expect("write config");
    }
    base
}

/// `feebook_cli` bound to `home`, with logs silenced.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("feebook_cli").expect("binary built");
    cmd.env("FEEBOOK_HOME", home).env("RUST_LOG", "off");
    cmd
}

/// `feebook_cli` in script mode, reading commands from stdin.
pub fn script(home: &Path, input: &str) -> Command {
    let mut cmd = cli(home);
    cmd.env("FEEBOOK_CLI_SCRIPT", "1").write_stdin(input.to_string());
    cmd
}
