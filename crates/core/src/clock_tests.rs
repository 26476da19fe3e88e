// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_starts_at_configured_epoch() {
    let clock = FakeClock::new(1_000_000);
    assert_eq!(clock.epoch_ms(), 1_000_000);
    assert_eq!(clock.epoch_secs(), 1_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(0);
    clock.advance(Duration::from_secs(5));
    assert_eq!(clock.epoch_ms(), 5_000);
}

#[test]
fn fake_clock_set_is_absolute() {
    let clock = FakeClock::new(0);
    clock.advance(Duration::from_secs(5));
    clock.set(42);
    assert_eq!(clock.epoch_ms(), 42);
}

#[test]
fn fake_clock_clone_shares_state() {
    let clock = FakeClock::new(0);
    let other = clock.clone();
    clock.advance(Duration::from_secs(1));
    assert_eq!(other.epoch_ms(), 1_000);
}

#[test]
fn system_clock_is_plausible() {
    let clock = SystemClock;
    // Should be well after this spec's authoring date.
    assert!(clock.epoch_ms() > 1_700_000_000_000);
}
