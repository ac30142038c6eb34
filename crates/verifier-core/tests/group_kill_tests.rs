//! Timeout cleanup with a minimal PATH
//!
//! Lives in its own test binary because it rewrites PATH for the process.
#![cfg(unix)]

use std::env;
use std::os::unix::fs::symlink;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use verifier_core::ProcessRunner;

fn locate(tool: &str) -> PathBuf {
    let path = env::var_os("PATH").unwrap();
    env::split_paths(&path)
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| panic!("{} not found on PATH", tool))
}

#[test]
fn test_timeout_kills_background_children_without_kill_on_path() {
    let bin = TempDir::new().unwrap();
    for tool in ["sh", "sleep", "touch"] {
        symlink(locate(tool), bin.path().join(tool)).unwrap();
    }
    let work = TempDir::new().unwrap();
    let marker = work.path().join("marker");

    env::set_var("PATH", bin.path());

    let program = format!("(sleep 1; touch '{}') & sleep 30", marker.display());
    let runner = ProcessRunner::new(program).with_timeout(Duration::from_millis(200));
    assert!(runner.run("").unwrap_err().is_timeout());

    thread::sleep(Duration::from_millis(1500));
    assert!(!marker.exists(), "background child survived the timeout");
}
