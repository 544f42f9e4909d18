// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: builders and an event-stream auditor.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::descriptor::{AircraftClass, Descriptor};
use crate::event::SimEvent;
use crate::queue::Tier;
use crate::tower::{Direction, CONTROLLER_LIMIT, MAX_RUNWAY_CAPACITY};

/// Config with production timings, no input file, and a fixed seed.
/// Tests run under paused tokio time, so real-scale durations stay cheap.
pub fn test_config() -> Config {
    Config {
        input: PathBuf::from("unused.txt"),
        tick_ms: 100,
        switch_secs: 5,
        rest_secs: 5,
        seed: Some(7),
        log_level: "warn".to_owned(),
        log_format: "text".to_owned(),
    }
}

/// Shorthand descriptor builder for scenario scripts.
pub fn aircraft(
    id: u32,
    class: AircraftClass,
    inter_arrival_secs: u64,
    runway_secs: u64,
    fuel_secs: u64,
) -> Descriptor {
    Descriptor {
        id,
        class,
        inter_arrival: Duration::from_secs(inter_arrival_secs),
        runway_time: Duration::from_secs(runway_secs),
        fuel_reserve: Duration::from_secs(fuel_secs),
    }
}

/// Drain every buffered event, panicking if the subscriber lagged (which
/// would make any ordering assertion meaningless).
pub fn drain(rx: &mut broadcast::Receiver<SimEvent>) -> Vec<SimEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                // OK to panic in test-only code — a lagged subscriber makes
                // every ordering assertion meaningless.
                #[allow(clippy::panic)]
                panic!("event subscriber lagged by {n}");
            }
        }
    }
    events
}

/// Tallies produced by [`audit`].
#[derive(Debug, Default)]
pub struct StreamAudit {
    pub enqueued: usize,
    pub admissions: usize,
    pub departures: usize,
    pub switches: usize,
    pub rests: usize,
    pub fuel_emergencies: usize,
    /// Admissions in commit order, for scenario-specific assertions.
    pub admitted: Vec<(u32, AircraftClass, Tier)>,
}

/// Replay an event stream and check every externally observable runway
/// property:
///
/// - occupancy stays within capacity, classes never mix, occupants match
///   the direction, nothing is admitted mid-switch or mid-rest;
/// - at most seven admissions precede each admission since the last rest,
///   switches and rests start on an empty runway;
/// - each aircraft is admitted exactly once and departs exactly once, in
///   that order;
/// - within a (class, tier) pair, admission order equals enqueue order.
pub fn audit(events: &[SimEvent]) -> StreamAudit {
    let mut summary = StreamAudit::default();

    let mut commercial = 0u32;
    let mut cargo = 0u32;
    let mut emergency = 0u32;
    let mut direction = Direction::North;
    let mut switching = false;
    let mut resting = false;
    let mut since_rest = 0u32;

    let mut enqueue_pos: HashMap<u32, usize> = HashMap::new();
    let mut promoted: HashSet<u32> = HashSet::new();
    let mut admitted_ids: HashSet<u32> = HashSet::new();
    let mut departed_ids: HashSet<u32> = HashSet::new();
    // Highest enqueue position admitted so far, per (class, tier).
    let mut fifo_front: HashMap<(AircraftClass, Tier), usize> = HashMap::new();

    for event in events {
        match *event {
            SimEvent::Enqueued { id, .. } => {
                assert!(
                    enqueue_pos.insert(id, summary.enqueued).is_none(),
                    "aircraft {id} enqueued twice"
                );
                summary.enqueued += 1;
            }
            SimEvent::FuelEmergency { id, class } => {
                assert_ne!(class, AircraftClass::Emergency, "emergency aircraft track no fuel");
                assert!(promoted.insert(id), "aircraft {id} promoted twice");
                summary.fuel_emergencies += 1;
            }
            SimEvent::Admitted { id, class, tier, direction: at } => {
                assert!(!switching, "admission during a direction switch");
                assert!(!resting, "admission during the controller rest");
                assert!(since_rest < CONTROLLER_LIMIT, "admission past the rest limit");
                assert_eq!(at, direction, "admission direction diverged from runway state");
                if tier == Tier::LowFuel {
                    assert!(promoted.contains(&id), "low-fuel admission without promotion");
                }

                match class {
                    AircraftClass::Commercial => commercial += 1,
                    AircraftClass::Cargo => cargo += 1,
                    AircraftClass::Emergency => emergency += 1,
                }
                assert!(
                    commercial + cargo + emergency <= MAX_RUNWAY_CAPACITY,
                    "runway over capacity after admitting {id}"
                );
                assert!(commercial == 0 || cargo == 0, "commercial and cargo mixed");
                assert!(commercial == 0 || direction == Direction::North);
                assert!(cargo == 0 || direction == Direction::South);

                assert!(admitted_ids.insert(id), "aircraft {id} admitted twice");
                let pos = enqueue_pos[&id];
                // Emergencies have a single queue; normalize their tier.
                let tier_key = if class == AircraftClass::Emergency { Tier::Normal } else { tier };
                if let Some(&front) = fifo_front.get(&(class, tier_key)) {
                    assert!(
                        pos > front,
                        "aircraft {id} admitted out of enqueue order within its tier"
                    );
                }
                fifo_front.insert((class, tier_key), pos);

                since_rest += 1;
                summary.admissions += 1;
                summary.admitted.push((id, class, tier));
            }
            SimEvent::Departed { id, class } => {
                assert!(admitted_ids.contains(&id), "aircraft {id} departed before admission");
                assert!(departed_ids.insert(id), "aircraft {id} departed twice");
                match class {
                    AircraftClass::Commercial => {
                        assert!(commercial > 0);
                        commercial -= 1;
                    }
                    AircraftClass::Cargo => {
                        assert!(cargo > 0);
                        cargo -= 1;
                    }
                    AircraftClass::Emergency => {
                        assert!(emergency > 0);
                        emergency -= 1;
                    }
                }
                summary.departures += 1;
            }
            SimEvent::SwitchStarted { from, to } => {
                assert!(!switching && !resting);
                assert_eq!(commercial + cargo + emergency, 0, "switch on an occupied runway");
                assert_eq!(from, direction);
                assert_eq!(to, direction.opposite());
                switching = true;
            }
            SimEvent::SwitchCompleted { to } => {
                assert!(switching, "switch completed without starting");
                assert_eq!(commercial + cargo + emergency, 0);
                direction = to;
                switching = false;
                summary.switches += 1;
            }
            SimEvent::RestStarted => {
                assert!(!switching && !resting);
                assert_eq!(commercial + cargo + emergency, 0, "rest on an occupied runway");
                assert_eq!(since_rest, CONTROLLER_LIMIT, "rest before the admission limit");
                resting = true;
            }
            SimEvent::RestCompleted => {
                assert!(resting, "rest completed without starting");
                since_rest = 0;
                resting = false;
                summary.rests += 1;
            }
        }
    }

    summary
}
