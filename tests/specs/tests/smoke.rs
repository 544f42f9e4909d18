// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `runway` binary: exit codes,
//! transcript lines, and their ordering.

use serial_test::serial;

use runway::descriptor::{FUEL_MAX_SECS, FUEL_MIN_SECS};
use runway_specs::{run_args, run_schedule};

// -- exit codes ---------------------------------------------------------------

#[test]
fn missing_argument_exits_einval() -> anyhow::Result<()> {
    let out = run_args(&[])?;
    assert_eq!(out.code, Some(22));
    assert!(out.contains("Usage: runway <name of inputfile>"));
    Ok(())
}

#[test]
fn extra_arguments_exit_einval() -> anyhow::Result<()> {
    let out = run_args(&["a.txt", "b.txt"])?;
    assert_eq!(out.code, Some(22));
    assert!(out.contains("Usage: runway <name of inputfile>"));
    Ok(())
}

#[test]
fn unreadable_input_exits_one() -> anyhow::Result<()> {
    let out = run_args(&["/no/such/schedule.txt"])?;
    assert_eq!(out.code, Some(1));
    assert!(out.contains("Cannot open input file /no/such/schedule.txt for reading."));
    Ok(())
}

#[test]
fn empty_schedule_exits_one() -> anyhow::Result<()> {
    let out = run_schedule("# comments only\n\n")?;
    assert_eq!(out.code, Some(1));
    assert!(out.contains("Error:  Bad number of aircraft threads."));
    Ok(())
}

// -- transcripts --------------------------------------------------------------

#[test]
#[serial]
fn commercial_and_emergency_complete() -> anyhow::Result<()> {
    let out = run_schedule("0 0 1\n2 0 1\n")?;
    assert_eq!(out.code, Some(0));

    assert!(out.contains("Starting runway simulation with 2 aircraft ..."));
    assert!(out.contains("The air traffic controller arrived and is beginning operations"));
    assert!(out.contains("Commercial aircraft 0 (fuel: "));
    assert!(out.contains(") is now on the runway (direction: NORTH)"));
    assert!(out.contains("Commercial aircraft 0 begins runway operations for 1 seconds"));
    assert!(out.contains("EMERGENCY aircraft 1 (fuel: "));
    assert_eq!(out.count("has cleared the runway"), 2);
    assert!(out.contains("Runway simulation done."));

    // Assigned fuel reserves land in the documented range.
    for (idx, _) in out.stdout.match_indices("(fuel: ") {
        let rest = &out.stdout[idx + "(fuel: ".len()..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        let fuel: u64 = digits.parse()?;
        assert!(
            (FUEL_MIN_SECS..=FUEL_MAX_SECS).contains(&fuel),
            "fuel out of range: {fuel}"
        );
    }

    // Lifecycle ordering for aircraft 0.
    let on_runway = out.offset("Commercial aircraft 0 (fuel: ").unwrap();
    let begins = out.offset("Commercial aircraft 0 begins runway operations").unwrap();
    let completes = out.offset("Commercial aircraft 0 completes runway operations").unwrap();
    let cleared = out.offset("Commercial aircraft 0 has cleared the runway").unwrap();
    assert!(on_runway < begins && begins < completes && completes < cleared);

    Ok(())
}

#[test]
#[serial]
fn lone_cargo_switches_the_runway_south() -> anyhow::Result<()> {
    let out = run_schedule("1 0 1\n")?;
    assert_eq!(out.code, Some(0));

    assert!(out.contains("Switching runway direction from NORTH to SOUTH"));
    assert!(out.contains("Runway direction switched to SOUTH"));
    assert!(out.contains(") is now on the runway (direction: SOUTH)"));
    assert!(out.contains("Cargo aircraft 0 has cleared the runway"));

    let switched = out.offset("Runway direction switched to SOUTH").unwrap();
    let admitted = out.offset("Cargo aircraft 0 (fuel: ").unwrap();
    assert!(switched < admitted);
    Ok(())
}
