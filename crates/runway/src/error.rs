// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::path::PathBuf;

/// Fatal simulation errors with their process exit codes.
///
/// Assertion violations are deliberately absent: an invariant breach is a
/// scheduler bug and panics the offending task instead of unwinding as a
/// recoverable error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Wrong number of command-line arguments.
    BadInvocation,
    /// The input file could not be opened or read.
    InputUnreadable { path: PathBuf },
    /// The input file yielded zero descriptors, or more than the cap.
    BadAircraftCount { count: usize },
    /// An aircraft task could not be spawned or was lost by the runtime.
    SpawnFailure { id: u32 },
}

impl SimError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // EINVAL
            Self::BadInvocation => 22,
            Self::InputUnreadable { .. } => 1,
            Self::BadAircraftCount { .. } => 1,
            Self::SpawnFailure { .. } => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadInvocation => "BAD_INVOCATION",
            Self::InputUnreadable { .. } => "INPUT_UNREADABLE",
            Self::BadAircraftCount { .. } => "BAD_AIRCRAFT_COUNT",
            Self::SpawnFailure { .. } => "SPAWN_FAILURE",
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadInvocation => f.write_str("Usage: runway <name of inputfile>"),
            Self::InputUnreadable { path } => {
                write!(f, "Cannot open input file {} for reading.", path.display())
            }
            Self::BadAircraftCount { .. } => f.write_str(
                "Error:  Bad number of aircraft threads. \
                 Maybe there was a problem with your input file?",
            ),
            Self::SpawnFailure { id } => {
                write!(f, "runway: task spawn failed for aircraft {id}")
            }
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
