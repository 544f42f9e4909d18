// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One task per aircraft: enqueue, wait for admission (watching the fuel
//! deadline), occupy the runway, depart.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, error};

use crate::descriptor::{AircraftClass, Descriptor};
use crate::tower::{AdmissionSlip, Tower};

/// Run one aircraft through the full protocol, printing the transcript
/// lines and asserting the runway invariants at admission and departure.
pub async fn fly(tower: Arc<Tower>, desc: Descriptor) {
    let arrival = Instant::now();
    let (ticket, rx) = tower.enqueue(desc.class, desc.id);

    let slip = match desc.class {
        // Emergencies do not track fuel; they block on the signal directly.
        AircraftClass::Emergency => rx.await.ok(),
        AircraftClass::Commercial | AircraftClass::Cargo => {
            wait_watching_fuel(&tower, &desc, ticket, rx, arrival + desc.fuel_reserve).await
        }
    };
    let Some(slip) = slip else {
        // Only reachable if the tower is torn down with waiters queued,
        // which the driver's join-before-cancel ordering rules out.
        error!(id = desc.id, "admission channel closed while waiting");
        return;
    };

    let label = desc.class.label();
    println!(
        "{label} aircraft {} (fuel: {}s) is now on the runway (direction: {})",
        desc.id,
        desc.fuel_reserve.as_secs(),
        slip.direction
    );
    slip.snapshot.assert_valid();

    println!(
        "{label} aircraft {} begins runway operations for {} seconds",
        desc.id,
        desc.runway_time.as_secs()
    );
    sleep(desc.runway_time).await;
    println!("{label} aircraft {} completes runway operations and prepares to depart", desc.id);

    let snapshot = tower.depart(desc.class, desc.id);
    println!("{label} aircraft {} has cleared the runway", desc.id);
    snapshot.assert_valid();
}

/// Wait for the admission signal, escalating to the low-fuel tier when the
/// deadline passes first. The waiter keeps its original channel across the
/// promotion, so an aircraft never regresses to the normal tier and never
/// misses a signal sent mid-promotion.
async fn wait_watching_fuel(
    tower: &Tower,
    desc: &Descriptor,
    ticket: u64,
    mut rx: oneshot::Receiver<AdmissionSlip>,
    deadline: Instant,
) -> Option<AdmissionSlip> {
    tokio::select! {
        biased;
        slip = &mut rx => return slip.ok(),
        _ = sleep_until(deadline) => {}
    }

    if tower.promote_to_low_fuel(desc.class, ticket) {
        println!(
            "EMERGENCY: {} Aircraft {} has ran out of reserved fuel and will land imminently!",
            desc.class.label(),
            desc.id
        );
    } else {
        debug!(id = desc.id, "fuel deadline crossed after admission was already signalled");
    }
    rx.await.ok()
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
