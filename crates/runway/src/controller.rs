// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The controller decision loop.
//!
//! One logical actor ticks every ~100 ms and performs at most one action per
//! pass, first true-and-actionable rule winning:
//!
//! 1. mandatory rest (eight admissions, empty runway)
//! 2. direction exhaustion (switch, or relax the counter)
//! 3. admission window gate
//! 4. low-fuel admissions (preempt everything below)
//! 5. class-streak forced switch
//! 6. emergency admission
//! 7. normal admission, current direction first
//!
//! Blocking phases (switches, rests) happen inline in the pass; since only
//! the controller admits, the runway stays empty for their whole duration.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::descriptor::AircraftClass;
use crate::queue::Tier;
use crate::tower::{
    Direction, Survey, Tower, CONTROLLER_LIMIT, DIRECTION_LIMIT, MAX_RUNWAY_CAPACITY,
};

/// Consecutive same-class admissions allowed before the opposite class is
/// forced ahead of further admissions of the streaking class.
pub const CLASS_STREAK_LIMIT: u32 = 4;
/// Advisory admission deadline for a waiting emergency aircraft.
pub const EMERGENCY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Controller {
    tower: Arc<Tower>,
    tick: Duration,
    switch_time: Duration,
    rest_time: Duration,
    commercial_streak: u32,
    cargo_streak: u32,
}

impl Controller {
    pub fn new(config: &Config, tower: Arc<Tower>) -> Self {
        Self {
            tower,
            tick: config.tick(),
            switch_time: config.switch_time(),
            rest_time: config.rest_time(),
            commercial_streak: 0,
            cargo_streak: 0,
        }
    }

    /// Run decision passes until the driver cancels the token. The loop
    /// never holds a lock at a suspension point, so cancellation cannot
    /// strand a waiter.
    pub async fn run(mut self, shutdown: CancellationToken) {
        println!("The air traffic controller arrived and is beginning operations");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(self.tick) => self.step().await,
            }
        }
        debug!("controller cancelled");
    }

    async fn step(&mut self) {
        let s = self.tower.survey();

        // 1. Mandatory rest once eight admissions have accumulated.
        if s.since_rest == CONTROLLER_LIMIT && s.occupants == 0 {
            self.take_break().await;
            return;
        }

        // 2. Direction exhaustion: switch when the opposite class is waiting,
        //    otherwise relax the counter back under the threshold.
        if s.consecutive_in_direction > DIRECTION_LIMIT && s.occupants == 0 {
            let opposite_wanted = match s.direction {
                Direction::South => s.commercial_waiting > 0,
                Direction::North => s.cargo_waiting > 0,
            };
            if opposite_wanted {
                self.switch_direction().await;
            } else {
                debug!(
                    consecutive = s.consecutive_in_direction,
                    "no waiter for the opposite direction, relaxing"
                );
                self.tower.relax_consecutive();
            }
            return;
        }

        // 3. Admission window.
        if s.occupants >= MAX_RUNWAY_CAPACITY
            || s.since_rest >= CONTROLLER_LIMIT
            || s.consecutive_in_direction > DIRECTION_LIMIT
        {
            return;
        }

        // 4. Low-fuel waiters preempt every rule below, whether or not one
        //    is admissible right now.
        if s.low_fuel_cargo > 0 || s.low_fuel_commercial > 0 {
            self.admit_low_fuel(&s).await;
            return;
        }

        // 5. Streak cap: force one admission of the opposite class.
        if self.commercial_streak >= CLASS_STREAK_LIMIT && s.cargo_waiting > 0 {
            self.break_streak(AircraftClass::Cargo, &s).await;
            return;
        }
        if self.cargo_streak >= CLASS_STREAK_LIMIT && s.commercial_waiting > 0 {
            self.break_streak(AircraftClass::Commercial, &s).await;
            return;
        }

        // 6. Emergencies accept either direction.
        if s.emergency_waiting > 0 {
            if let Some(admitted) = self.tower.admit(AircraftClass::Emergency, Tier::Normal) {
                self.commercial_streak = 0;
                self.cargo_streak = 0;
                if admitted.waited > EMERGENCY_TIMEOUT {
                    warn!(
                        id = admitted.id,
                        waited_secs = admitted.waited.as_secs(),
                        "emergency aircraft exceeded the 30s admission target"
                    );
                }
            }
            return;
        }

        // 7. Normal admission, current direction's class first.
        self.admit_normal(&s).await;
    }

    /// The cargo tier is checked first; when both tiers hold waiters the
    /// direction guards keep the two branches from fighting. A tier that
    /// cannot act right now (wrong direction with an occupied runway) leaves
    /// the pass empty; the runway drains and a later pass switches.
    async fn admit_low_fuel(&mut self, s: &Survey) {
        if s.low_fuel_cargo > 0 && s.commercial_on_runway == 0 {
            if s.direction == Direction::North && s.occupants == 0 && s.low_fuel_commercial == 0 {
                self.switch_direction().await;
            }
            if self.tower.direction() == Direction::South
                && self.tower.admit(AircraftClass::Cargo, Tier::LowFuel).is_some()
            {
                self.commercial_streak = 0;
                self.cargo_streak = 0;
                return;
            }
        }
        if s.low_fuel_commercial > 0 && s.cargo_on_runway == 0 {
            if s.direction == Direction::South && s.occupants == 0 && s.low_fuel_cargo == 0 {
                self.switch_direction().await;
            }
            if self.tower.direction() == Direction::North
                && self.tower.admit(AircraftClass::Commercial, Tier::LowFuel).is_some()
            {
                self.commercial_streak = 0;
                self.cargo_streak = 0;
            }
        }
    }

    /// One class has been admitted four times running while the other class
    /// waits: switch as soon as the runway drains — even if the streaking
    /// class still has waiters — and admit one of the opposite class.
    async fn break_streak(&mut self, class: AircraftClass, s: &Survey) {
        let wanted = match class {
            AircraftClass::Commercial => Direction::North,
            AircraftClass::Cargo => Direction::South,
            AircraftClass::Emergency => return,
        };
        if s.direction != wanted {
            if s.occupants > 0 {
                return; // wait for the runway to drain
            }
            self.switch_direction().await;
        }
        if self.tower.direction() == wanted && self.tower.admit(class, Tier::Normal).is_some() {
            match class {
                AircraftClass::Commercial => {
                    self.commercial_streak = 1;
                    self.cargo_streak = 0;
                }
                AircraftClass::Cargo => {
                    self.cargo_streak = 1;
                    self.commercial_streak = 0;
                }
                AircraftClass::Emergency => {}
            }
        }
    }

    async fn admit_normal(&mut self, s: &Survey) {
        let order = match s.direction {
            Direction::North => [AircraftClass::Commercial, AircraftClass::Cargo],
            Direction::South => [AircraftClass::Cargo, AircraftClass::Commercial],
        };
        for class in order {
            if self.try_admit_normal(class, s).await {
                return;
            }
        }
    }

    async fn try_admit_normal(&mut self, class: AircraftClass, s: &Survey) -> bool {
        match class {
            AircraftClass::Commercial => {
                if s.commercial_waiting == 0 || s.cargo_on_runway > 0 {
                    return false;
                }
                // Never extend a capped streak while the other class waits.
                if self.commercial_streak >= CLASS_STREAK_LIMIT && s.cargo_waiting > 0 {
                    return false;
                }
                if s.direction != Direction::North {
                    // Switching toward commercial only makes sense once no
                    // cargo could use the current direction.
                    if s.occupants > 0 || s.cargo_waiting > 0 {
                        return false;
                    }
                    self.switch_direction().await;
                }
                if self.tower.direction() == Direction::North
                    && self.tower.admit(AircraftClass::Commercial, Tier::Normal).is_some()
                {
                    self.commercial_streak = (self.commercial_streak + 1).min(CLASS_STREAK_LIMIT);
                    self.cargo_streak = 0;
                    return true;
                }
                false
            }
            AircraftClass::Cargo => {
                if s.cargo_waiting == 0 || s.commercial_on_runway > 0 {
                    return false;
                }
                if self.cargo_streak >= CLASS_STREAK_LIMIT && s.commercial_waiting > 0 {
                    return false;
                }
                if s.direction != Direction::South {
                    if s.occupants > 0 || s.commercial_waiting > 0 {
                        return false;
                    }
                    self.switch_direction().await;
                }
                if self.tower.direction() == Direction::South
                    && self.tower.admit(AircraftClass::Cargo, Tier::Normal).is_some()
                {
                    self.cargo_streak = (self.cargo_streak + 1).min(CLASS_STREAK_LIMIT);
                    self.commercial_streak = 0;
                    return true;
                }
                false
            }
            AircraftClass::Emergency => false,
        }
    }

    async fn take_break(&self) {
        println!("The air traffic controller is taking a break now.");
        self.tower.begin_rest();
        sleep(self.rest_time).await;
        self.tower.complete_rest();
        debug!("rest complete");
    }

    async fn switch_direction(&self) {
        let from = self.tower.direction();
        println!("Switching runway direction from {from} to {}", from.opposite());
        let to = self.tower.begin_direction_switch();
        sleep(self.switch_time).await;
        self.tower.complete_direction_switch(to);
        println!("Runway direction switched to {to}");
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
