#![allow(dead_code)]

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

pub fn run_cli<S: AsRef<OsStr>>(args: &[S]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_transcript-changelog"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn binary");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// A temp dir holding `raw.json` and the two output paths.
/// The `TempDir` must be kept alive for the duration of the test.
pub struct Job {
    pub dir: tempfile::TempDir,
    pub raw: PathBuf,
    pub stdout: PathBuf,
    pub changelog: PathBuf,
}

impl Job {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            raw: dir.path().join("raw.json"),
            stdout: dir.path().join("stdout.txt"),
            changelog: dir.path().join("changelog.txt"),
            dir,
        }
    }

    pub fn with_raw(contents: &str) -> Self {
        let job = Self::new();
        fs::write(&job.raw, contents).unwrap();
        job
    }

    pub fn with_json(value: &serde_json::Value) -> Self {
        Self::with_raw(&serde_json::to_string(value).unwrap())
    }

    /// Run the binary with the three standard arguments.
    pub fn run(&self) -> (i32, String, String) {
        run_cli(&[&self.raw, &self.stdout, &self.changelog])
    }

    pub fn read_stdout(&self) -> String {
        fs::read_to_string(&self.stdout).unwrap()
    }

    pub fn read_changelog(&self) -> String {
        fs::read_to_string(&self.changelog).unwrap()
    }
}

/// Transcript with a single assistant message carrying one tool_use block.
pub fn one_tool_use(name: &str, input: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "result": "done",
        "messages": [{
            "role": "assistant",
            "content": [{ "type": "tool_use", "name": name, "input": input }]
        }]
    })
}
