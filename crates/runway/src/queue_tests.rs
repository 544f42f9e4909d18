// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio::sync::oneshot;

use super::*;

fn push(queues: &mut WaitQueues, class: AircraftClass, id: u32) -> u64 {
    let (tx, _rx) = oneshot::channel();
    queues.push(class, id, tx, Instant::now())
}

#[tokio::test]
async fn pop_is_fifo_within_a_class() {
    let mut queues = WaitQueues::new();
    push(&mut queues, AircraftClass::Commercial, 1);
    push(&mut queues, AircraftClass::Cargo, 2);
    push(&mut queues, AircraftClass::Commercial, 3);

    let first = queues.pop(AircraftClass::Commercial, Tier::Normal).unwrap();
    let second = queues.pop(AircraftClass::Commercial, Tier::Normal).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 3);
    assert!(queues.pop(AircraftClass::Commercial, Tier::Normal).is_none());
    assert_eq!(queues.pop(AircraftClass::Cargo, Tier::Normal).unwrap().id, 2);
}

#[tokio::test]
async fn tickets_are_monotone_across_classes() {
    let mut queues = WaitQueues::new();
    let a = push(&mut queues, AircraftClass::Commercial, 0);
    let b = push(&mut queues, AircraftClass::Emergency, 1);
    let c = push(&mut queues, AircraftClass::Cargo, 2);
    assert!(a < b && b < c);
}

#[tokio::test]
async fn promote_moves_to_low_fuel_tier() {
    let mut queues = WaitQueues::new();
    let ticket = push(&mut queues, AircraftClass::Cargo, 7);
    push(&mut queues, AircraftClass::Cargo, 8);

    assert_eq!(queues.promote(AircraftClass::Cargo, ticket), Some(7));
    assert_eq!(queues.waiting(AircraftClass::Cargo, Tier::Normal), 1);
    assert_eq!(queues.waiting(AircraftClass::Cargo, Tier::LowFuel), 1);
    assert_eq!(queues.pop(AircraftClass::Cargo, Tier::LowFuel).unwrap().id, 7);
}

#[tokio::test]
async fn promote_keeps_enqueue_order_in_the_low_fuel_tier() {
    let mut queues = WaitQueues::new();
    let early = push(&mut queues, AircraftClass::Commercial, 10);
    let late = push(&mut queues, AircraftClass::Commercial, 11);

    // Promotion in reverse arrival order must not reorder the tier.
    assert!(queues.promote(AircraftClass::Commercial, late).is_some());
    assert!(queues.promote(AircraftClass::Commercial, early).is_some());

    assert_eq!(queues.pop(AircraftClass::Commercial, Tier::LowFuel).unwrap().id, 10);
    assert_eq!(queues.pop(AircraftClass::Commercial, Tier::LowFuel).unwrap().id, 11);
}

#[tokio::test]
async fn promote_after_pop_returns_none() {
    let mut queues = WaitQueues::new();
    let ticket = push(&mut queues, AircraftClass::Commercial, 5);
    queues.pop(AircraftClass::Commercial, Tier::Normal).unwrap();
    assert_eq!(queues.promote(AircraftClass::Commercial, ticket), None);
}

#[tokio::test]
async fn emergencies_have_no_fuel_tier() {
    let mut queues = WaitQueues::new();
    let ticket = push(&mut queues, AircraftClass::Emergency, 9);
    assert_eq!(queues.promote(AircraftClass::Emergency, ticket), None);
    assert_eq!(queues.pop(AircraftClass::Emergency, Tier::LowFuel).unwrap().id, 9);
}
