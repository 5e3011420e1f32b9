#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Command with its config dir pointed at a per-test temp folder,
/// so a user's own `~/.rpomodoro` is never read.
pub fn rpo(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("rpomodoro");
    cmd.env("RPOMODORO_CONFIG_DIR", config_dir(name));
    cmd.env_remove("RPOMODORO_LOG");
    cmd
}

pub fn config_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpomodoro_cfg", name));
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rpomodoro.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize an empty DB
pub fn init_db(name: &str, db_path: &str) {
    rpo(name)
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Initialize DB and add the given tasks, in order (ids 1..=n)
pub fn init_db_with_tasks(name: &str, db_path: &str, tasks: &[&str]) {
    init_db(name, db_path);
    for t in tasks {
        rpo(name)
            .args(["--db", db_path, "add", t])
            .assert()
            .success();
    }
}
