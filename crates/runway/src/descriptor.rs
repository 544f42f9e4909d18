// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aircraft descriptors and the line-oriented schedule loader.

use std::fs;
use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::error::SimError;

/// Hard cap on the number of aircraft in one simulation.
pub const MAX_AIRCRAFT: usize = 1000;
/// Minimum fuel reserve assigned at load time, in seconds.
pub const FUEL_MIN_SECS: u64 = 20;
/// Maximum fuel reserve assigned at load time, in seconds.
pub const FUEL_MAX_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AircraftClass {
    Commercial,
    Cargo,
    Emergency,
}

impl AircraftClass {
    /// Numeric class code used by the input file format.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Commercial),
            1 => Some(Self::Cargo),
            2 => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Label used in the runway transcript lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::Cargo => "Cargo",
            Self::Emergency => "EMERGENCY",
        }
    }
}

/// One scheduled aircraft, immutable after load.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    /// Dense index in schedule order.
    pub id: u32,
    pub class: AircraftClass,
    /// Delay after the previous descriptor before this aircraft arrives.
    pub inter_arrival: Duration,
    /// Time spent occupying the runway once admitted.
    pub runway_time: Duration,
    /// Wait budget before the aircraft escalates to the low-fuel tier.
    pub fuel_reserve: Duration,
}

/// Load a schedule file.
///
/// Fails with [`SimError::InputUnreadable`] if the file cannot be read and
/// [`SimError::BadAircraftCount`] if it yields zero descriptors or more than
/// [`MAX_AIRCRAFT`].
pub fn load(path: &Path, rng: &mut impl Rng) -> anyhow::Result<Vec<Descriptor>> {
    let text = fs::read_to_string(path)
        .map_err(|_| SimError::InputUnreadable { path: path.to_path_buf() })?;
    let descriptors = parse(&text, rng);
    if descriptors.is_empty() || descriptors.len() > MAX_AIRCRAFT {
        return Err(SimError::BadAircraftCount { count: descriptors.len() }.into());
    }
    Ok(descriptors)
}

/// Parse schedule text: `class inter_arrival runway_time` per line.
///
/// Lines starting with `#` and blank lines are ignored; lines that do not
/// parse as three in-range integers are skipped silently. Fuel reserves are
/// drawn here so the RNG stream lines up with accepted lines.
pub fn parse(text: &str, rng: &mut impl Rng) -> Vec<Descriptor> {
    let mut out = Vec::new();
    for line in text.lines() {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let Some((class, inter_arrival, runway_time)) = parse_line(line) else {
            continue;
        };
        let fuel = rng.random_range(FUEL_MIN_SECS..=FUEL_MAX_SECS);
        out.push(Descriptor {
            id: out.len() as u32,
            class,
            inter_arrival: Duration::from_secs(inter_arrival),
            runway_time: Duration::from_secs(runway_time),
            fuel_reserve: Duration::from_secs(fuel),
        });
    }
    out
}

fn parse_line(line: &str) -> Option<(AircraftClass, u64, u64)> {
    let mut fields = line.split_whitespace();
    let class = AircraftClass::from_code(fields.next()?.parse().ok()?)?;
    let inter_arrival: u64 = fields.next()?.parse().ok()?;
    let runway_time: u64 = fields.next()?.parse().ok()?;
    if runway_time == 0 {
        return None;
    }
    Some((class, inter_arrival, runway_time))
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
