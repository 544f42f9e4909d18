// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runway monitor.
//!
//! One lock guards the occupancy counts, the direction, the rest counter,
//! and every admission queue, so the capacity/mixing/direction invariants
//! can be checked at each mutation instead of being smeared across a dozen
//! independently-locked fields. Admission accounting is committed *before*
//! the waiter is signalled; the controller's next decision pass always
//! observes committed state.
//!
//! The lock is never held across an `.await`. Blocking phases (direction
//! switches, rests) are driven by the controller, which brackets its sleep
//! with the `begin_*`/`complete_*` pairs below; both edges assert that the
//! runway is empty.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

use crate::descriptor::AircraftClass;
use crate::event::SimEvent;
use crate::queue::{Tier, WaitQueues};

/// Aircraft that can occupy the runway simultaneously.
pub const MAX_RUNWAY_CAPACITY: u32 = 2;
/// Admissions the controller handles before a mandatory rest.
pub const CONTROLLER_LIMIT: u32 = 8;
/// Consecutive same-direction admissions before a switch is considered.
pub const DIRECTION_LIMIT: u32 = 3;
/// Value the direction counter relaxes to when nothing wants the opposite
/// direction: under the switch threshold, but close enough that a long
/// same-direction run still drains the runway regularly.
pub const CONSECUTIVE_RELAX_VALUE: u32 = 2;

const EVENT_BUFFER: usize = 4096;

/// Runway orientation. Commercial aircraft require north, cargo require
/// south, emergencies accept either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consistent view of the runway, taken inside the monitor.
#[derive(Debug, Clone, Copy)]
pub struct RunwaySnapshot {
    pub commercial: u32,
    pub cargo: u32,
    pub emergency: u32,
    pub direction: Direction,
    pub consecutive_in_direction: u32,
    pub since_rest: u32,
}

impl RunwaySnapshot {
    pub fn occupants(&self) -> u32 {
        self.commercial + self.cargo + self.emergency
    }

    /// Check the runway invariants; a breach is a scheduler bug and fatal.
    pub fn assert_valid(&self) {
        assert!(
            self.occupants() <= MAX_RUNWAY_CAPACITY,
            "runway over capacity: {self:?}"
        );
        assert!(
            self.commercial == 0 || self.cargo == 0,
            "commercial and cargo share the runway: {self:?}"
        );
        assert!(
            self.commercial == 0 || self.direction == Direction::North,
            "commercial aircraft on a southbound runway: {self:?}"
        );
        assert!(
            self.cargo == 0 || self.direction == Direction::South,
            "cargo aircraft on a northbound runway: {self:?}"
        );
        assert!(
            self.since_rest <= CONTROLLER_LIMIT,
            "rest counter past its limit: {self:?}"
        );
    }
}

/// Payload delivered to a waiter at the moment of admission.
#[derive(Debug)]
pub struct AdmissionSlip {
    /// Runway direction at admission time, for the transcript line.
    pub direction: Direction,
    /// State as committed by the admission, for the agent-side assertions.
    pub snapshot: RunwaySnapshot,
}

/// Outcome of a successful admission, reported to the controller.
#[derive(Debug, Clone, Copy)]
pub struct Admitted {
    pub id: u32,
    /// Time the aircraft spent queued, across both tiers.
    pub waited: Duration,
}

/// Everything the controller reads to make one scheduling decision.
#[derive(Debug, Clone, Copy)]
pub struct Survey {
    pub commercial_waiting: usize,
    pub cargo_waiting: usize,
    pub emergency_waiting: usize,
    pub low_fuel_commercial: usize,
    pub low_fuel_cargo: usize,
    pub occupants: u32,
    pub commercial_on_runway: u32,
    pub cargo_on_runway: u32,
    pub direction: Direction,
    pub consecutive_in_direction: u32,
    pub since_rest: u32,
}

#[derive(Debug)]
struct TowerInner {
    commercial_on_runway: u32,
    cargo_on_runway: u32,
    emergency_on_runway: u32,
    direction: Direction,
    consecutive_in_direction: u32,
    since_rest: u32,
    queues: WaitQueues,
}

impl TowerInner {
    fn occupants(&self) -> u32 {
        self.commercial_on_runway + self.cargo_on_runway + self.emergency_on_runway
    }

    fn snapshot(&self) -> RunwaySnapshot {
        RunwaySnapshot {
            commercial: self.commercial_on_runway,
            cargo: self.cargo_on_runway,
            emergency: self.emergency_on_runway,
            direction: self.direction,
            consecutive_in_direction: self.consecutive_in_direction,
            since_rest: self.since_rest,
        }
    }
}

/// Shared state hub for the whole simulation: runway counters, admission
/// queues, and the event broadcast channel.
pub struct Tower {
    inner: Mutex<TowerInner>,
    events_tx: broadcast::Sender<SimEvent>,
}

impl Default for Tower {
    fn default() -> Self {
        Self::new()
    }
}

impl Tower {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            inner: Mutex::new(TowerInner {
                commercial_on_runway: 0,
                cargo_on_runway: 0,
                emergency_on_runway: 0,
                direction: Direction::North,
                consecutive_in_direction: 0,
                since_rest: 0,
                queues: WaitQueues::new(),
            }),
            events_tx,
        }
    }

    /// Subscribe to scheduler events. Events sent with no subscribers are
    /// dropped, so production runs pay nothing for this.
    pub fn subscribe(&self) -> broadcast::Receiver<SimEvent> {
        self.events_tx.subscribe()
    }

    /// Join the class queue. The returned receiver resolves when the
    /// controller admits this aircraft; the ticket identifies the waiter for
    /// a later low-fuel promotion.
    pub fn enqueue(
        &self,
        class: AircraftClass,
        id: u32,
    ) -> (u64, oneshot::Receiver<AdmissionSlip>) {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock();
        let ticket = inner.queues.push(class, id, tx, Instant::now());
        let _ = self.events_tx.send(SimEvent::Enqueued { id, class });
        (ticket, rx)
    }

    /// Escalate a waiter to the low-fuel tier. Returns false when the
    /// admission signal already raced ahead of the fuel deadline; a promoted
    /// waiter never regresses to the normal tier.
    pub fn promote_to_low_fuel(&self, class: AircraftClass, ticket: u64) -> bool {
        let mut inner = self.inner.lock();
        match inner.queues.promote(class, ticket) {
            Some(id) => {
                let _ = self.events_tx.send(SimEvent::FuelEmergency { id, class });
                true
            }
            None => false,
        }
    }

    /// Admit the longest-waiting aircraft of the given class and tier.
    ///
    /// Controller-only. All accounting is committed and the invariants are
    /// checked before the waiter is signalled. Returns `None` when the queue
    /// is empty.
    pub fn admit(&self, class: AircraftClass, tier: Tier) -> Option<Admitted> {
        let mut inner = self.inner.lock();
        let waiter = inner.queues.pop(class, tier)?;
        assert!(
            inner.occupants() < MAX_RUNWAY_CAPACITY,
            "admission on a full runway"
        );
        assert!(
            inner.since_rest < CONTROLLER_LIMIT,
            "admission past the rest limit"
        );
        match class {
            AircraftClass::Commercial => inner.commercial_on_runway += 1,
            AircraftClass::Cargo => inner.cargo_on_runway += 1,
            AircraftClass::Emergency => inner.emergency_on_runway += 1,
        }
        inner.consecutive_in_direction += 1;
        inner.since_rest += 1;

        let snapshot = inner.snapshot();
        snapshot.assert_valid();
        let _ = self.events_tx.send(SimEvent::Admitted {
            id: waiter.id,
            class,
            tier,
            direction: snapshot.direction,
        });

        let waited = Instant::now().duration_since(waiter.enqueued_at);
        // A dropped receiver means the aircraft task died; that surfaces as a
        // join error in the driver, so the send result carries nothing new.
        let _ = waiter.tx.send(AdmissionSlip { direction: snapshot.direction, snapshot });
        Some(Admitted { id: waiter.id, waited })
    }

    /// Release this aircraft's slot on the runway. Direction and the rest
    /// counter are untouched.
    pub fn depart(&self, class: AircraftClass, id: u32) -> RunwaySnapshot {
        let mut inner = self.inner.lock();
        match class {
            AircraftClass::Commercial => {
                assert!(inner.commercial_on_runway > 0, "commercial departure from an empty runway");
                inner.commercial_on_runway -= 1;
            }
            AircraftClass::Cargo => {
                assert!(inner.cargo_on_runway > 0, "cargo departure from an empty runway");
                inner.cargo_on_runway -= 1;
            }
            AircraftClass::Emergency => {
                assert!(inner.emergency_on_runway > 0, "emergency departure from an empty runway");
                inner.emergency_on_runway -= 1;
            }
        }
        let snapshot = inner.snapshot();
        snapshot.assert_valid();
        let _ = self.events_tx.send(SimEvent::Departed { id, class });
        snapshot
    }

    pub fn survey(&self) -> Survey {
        let inner = self.inner.lock();
        Survey {
            commercial_waiting: inner.queues.waiting(AircraftClass::Commercial, Tier::Normal),
            cargo_waiting: inner.queues.waiting(AircraftClass::Cargo, Tier::Normal),
            emergency_waiting: inner.queues.waiting(AircraftClass::Emergency, Tier::Normal),
            low_fuel_commercial: inner.queues.waiting(AircraftClass::Commercial, Tier::LowFuel),
            low_fuel_cargo: inner.queues.waiting(AircraftClass::Cargo, Tier::LowFuel),
            occupants: inner.occupants(),
            commercial_on_runway: inner.commercial_on_runway,
            cargo_on_runway: inner.cargo_on_runway,
            direction: inner.direction,
            consecutive_in_direction: inner.consecutive_in_direction,
            since_rest: inner.since_rest,
        }
    }

    pub fn direction(&self) -> Direction {
        self.inner.lock().direction
    }

    /// Start a direction switch, returning the target direction. The runway
    /// must be empty and stays empty until [`Tower::complete_direction_switch`]
    /// because only the controller admits.
    pub fn begin_direction_switch(&self) -> Direction {
        let inner = self.inner.lock();
        assert_eq!(inner.occupants(), 0, "direction switch on an occupied runway");
        let to = inner.direction.opposite();
        let _ = self.events_tx.send(SimEvent::SwitchStarted { from: inner.direction, to });
        to
    }

    pub fn complete_direction_switch(&self, to: Direction) {
        let mut inner = self.inner.lock();
        assert_eq!(inner.occupants(), 0, "runway occupied during a direction switch");
        inner.direction = to;
        inner.consecutive_in_direction = 0;
        let _ = self.events_tx.send(SimEvent::SwitchCompleted { to });
    }

    /// Start the mandatory rest; the runway must be empty.
    pub fn begin_rest(&self) {
        let inner = self.inner.lock();
        assert_eq!(inner.occupants(), 0, "rest on an occupied runway");
        let _ = self.events_tx.send(SimEvent::RestStarted);
    }

    pub fn complete_rest(&self) {
        let mut inner = self.inner.lock();
        assert_eq!(inner.occupants(), 0, "runway occupied during the rest");
        inner.since_rest = 0;
        let _ = self.events_tx.send(SimEvent::RestCompleted);
    }

    /// Direction-exhaustion fallback when nothing wants the opposite
    /// direction: pull the counter back under the switch threshold without
    /// zeroing it.
    pub fn relax_consecutive(&self) {
        self.inner.lock().consecutive_in_direction = CONSECUTIVE_RELAX_VALUE;
    }
}

#[cfg(test)]
#[path = "tower_tests.rs"]
mod tests;
