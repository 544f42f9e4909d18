// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Single-runway air traffic control simulation.
#[derive(Debug, Parser)]
#[command(name = "runway", version, about)]
pub struct Config {
    /// Path to the aircraft schedule input file.
    #[arg(value_name = "INPUTFILE")]
    pub input: PathBuf,

    /// Controller decision-loop interval in milliseconds.
    #[arg(long, env = "RUNWAY_TICK_MS", default_value = "100")]
    pub tick_ms: u64,

    /// Seconds a runway direction switch takes.
    #[arg(long, env = "RUNWAY_SWITCH_SECS", default_value = "5")]
    pub switch_secs: u64,

    /// Seconds the controller rests after eight admissions.
    #[arg(long, env = "RUNWAY_REST_SECS", default_value = "5")]
    pub rest_secs: u64,

    /// Seed for the fuel-reserve RNG (random when omitted).
    #[arg(long, env = "RUNWAY_SEED")]
    pub seed: Option<u64>,

    /// Log level for diagnostics (trace, debug, info, warn, error).
    #[arg(long, env = "RUNWAY_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format for diagnostics (json or text).
    #[arg(long, env = "RUNWAY_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_ms == 0 {
            anyhow::bail!("--tick-ms must be at least 1");
        }
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other}"),
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn switch_time(&self) -> Duration {
        Duration::from_secs(self.switch_secs)
    }

    pub fn rest_time(&self) -> Duration {
        Duration::from_secs(self.rest_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
