// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `runway` binary over temp schedule files and captures
//! the transcript it prints to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolve the path to the compiled `runway` binary.
pub fn runway_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("runway")
}

/// Captured result of one binary run.
pub struct SimOutput {
    pub stdout: String,
    pub code: Option<i32>,
}

impl SimOutput {
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    pub fn count(&self, needle: &str) -> usize {
        self.stdout.matches(needle).count()
    }

    /// Byte offset of the first occurrence, for ordering assertions.
    pub fn offset(&self, needle: &str) -> Option<usize> {
        self.stdout.find(needle)
    }
}

/// Run the binary with raw arguments and capture stdout plus the exit code.
pub fn run_args(args: &[&str]) -> anyhow::Result<SimOutput> {
    let binary = runway_binary();
    anyhow::ensure!(binary.exists(), "runway binary not found at {}", binary.display());

    let output = Command::new(&binary).args(args).output()?;
    Ok(SimOutput { stdout: String::from_utf8(output.stdout)?, code: output.status.code() })
}

/// Write `schedule` to a temp file and simulate it with fast timings
/// (10 ms tick, 1 s switches and rests) and a fixed fuel seed, so smoke
/// tests finish in wall-clock seconds.
pub fn run_schedule(schedule: &str) -> anyhow::Result<SimOutput> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(schedule.as_bytes())?;
    let path = file.path().to_string_lossy().into_owned();
    run_args(&[
        &path,
        "--tick-ms",
        "10",
        "--switch-secs",
        "1",
        "--rest-secs",
        "1",
        "--seed",
        "11",
    ])
}
