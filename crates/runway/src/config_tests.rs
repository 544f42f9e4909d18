// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::*;

#[test]
fn defaults_cover_the_one_argument_invocation() {
    let config = Config::try_parse_from(["runway", "schedule.txt"]).unwrap();
    assert_eq!(config.input, PathBuf::from("schedule.txt"));
    assert_eq!(config.tick(), Duration::from_millis(100));
    assert_eq!(config.switch_time(), Duration::from_secs(5));
    assert_eq!(config.rest_time(), Duration::from_secs(5));
    assert_eq!(config.seed, None);
    config.validate().unwrap();
}

#[test]
fn input_file_is_required() {
    assert!(Config::try_parse_from(["runway"]).is_err());
}

#[test]
fn extra_positional_arguments_are_rejected() {
    assert!(Config::try_parse_from(["runway", "a.txt", "b.txt"]).is_err());
}

#[test]
fn flags_override_defaults() {
    let config = Config::try_parse_from([
        "runway",
        "schedule.txt",
        "--tick-ms",
        "10",
        "--switch-secs",
        "1",
        "--rest-secs",
        "2",
        "--seed",
        "99",
    ])
    .unwrap();
    assert_eq!(config.tick(), Duration::from_millis(10));
    assert_eq!(config.switch_time(), Duration::from_secs(1));
    assert_eq!(config.rest_time(), Duration::from_secs(2));
    assert_eq!(config.seed, Some(99));
}

#[test]
fn zero_tick_fails_validation() {
    let config = Config::try_parse_from(["runway", "schedule.txt", "--tick-ms", "0"]).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn bogus_log_format_fails_validation() {
    let config =
        Config::try_parse_from(["runway", "schedule.txt", "--log-format", "yaml"]).unwrap();
    assert!(config.validate().is_err());
}
