// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::VecDeque;

use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::descriptor::AircraftClass;
use crate::tower::AdmissionSlip;

/// Priority tier within a class queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Normal,
    LowFuel,
}

/// A parked aircraft task waiting for its admission signal.
#[derive(Debug)]
pub struct Waiter {
    pub ticket: u64,
    pub id: u32,
    pub enqueued_at: Instant,
    pub tx: oneshot::Sender<AdmissionSlip>,
}

/// Per-class FIFO admission queues with a low-fuel priority tier for
/// commercial and cargo.
///
/// Tickets come from a single monotone counter, so ordering within a
/// (class, tier) pair is a total order fixed at enqueue time rather than an
/// artifact of task wake-up timing.
#[derive(Debug, Default)]
pub struct WaitQueues {
    next_ticket: u64,
    commercial: VecDeque<Waiter>,
    commercial_low_fuel: VecDeque<Waiter>,
    cargo: VecDeque<Waiter>,
    cargo_low_fuel: VecDeque<Waiter>,
    emergency: VecDeque<Waiter>,
}

impl WaitQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a waiter to the normal tier of its class queue, returning the
    /// ticket that identifies it for promotion.
    pub fn push(
        &mut self,
        class: AircraftClass,
        id: u32,
        tx: oneshot::Sender<AdmissionSlip>,
        now: Instant,
    ) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let waiter = Waiter { ticket, id, enqueued_at: now, tx };
        match class {
            AircraftClass::Commercial => self.commercial.push_back(waiter),
            AircraftClass::Cargo => self.cargo.push_back(waiter),
            AircraftClass::Emergency => self.emergency.push_back(waiter),
        }
        ticket
    }

    /// Move a waiter from the normal tier to its class's low-fuel tier,
    /// preserving ticket order within the tier.
    ///
    /// Returns the waiter's id, or `None` when the ticket is no longer queued
    /// (the admission signal raced ahead of the fuel deadline). Emergency
    /// aircraft have no fuel tier.
    pub fn promote(&mut self, class: AircraftClass, ticket: u64) -> Option<u32> {
        let (normal, low_fuel) = match class {
            AircraftClass::Commercial => (&mut self.commercial, &mut self.commercial_low_fuel),
            AircraftClass::Cargo => (&mut self.cargo, &mut self.cargo_low_fuel),
            AircraftClass::Emergency => return None,
        };
        let pos = normal.iter().position(|w| w.ticket == ticket)?;
        let waiter = normal.remove(pos)?;
        let id = waiter.id;
        let at = low_fuel.partition_point(|w| w.ticket < waiter.ticket);
        low_fuel.insert(at, waiter);
        Some(id)
    }

    /// Remove and return the longest-waiting aircraft of the given class and
    /// tier. The tier is ignored for emergencies, which have a single queue.
    pub fn pop(&mut self, class: AircraftClass, tier: Tier) -> Option<Waiter> {
        match (class, tier) {
            (AircraftClass::Commercial, Tier::Normal) => self.commercial.pop_front(),
            (AircraftClass::Commercial, Tier::LowFuel) => self.commercial_low_fuel.pop_front(),
            (AircraftClass::Cargo, Tier::Normal) => self.cargo.pop_front(),
            (AircraftClass::Cargo, Tier::LowFuel) => self.cargo_low_fuel.pop_front(),
            (AircraftClass::Emergency, _) => self.emergency.pop_front(),
        }
    }

    pub fn waiting(&self, class: AircraftClass, tier: Tier) -> usize {
        match (class, tier) {
            (AircraftClass::Commercial, Tier::Normal) => self.commercial.len(),
            (AircraftClass::Commercial, Tier::LowFuel) => self.commercial_low_fuel.len(),
            (AircraftClass::Cargo, Tier::Normal) => self.cargo.len(),
            (AircraftClass::Cargo, Tier::LowFuel) => self.cargo_low_fuel.len(),
            (AircraftClass::Emergency, _) => self.emergency.len(),
        }
    }

}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
