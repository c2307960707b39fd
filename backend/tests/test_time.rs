//! Tests for SimClock

use call_center_sim_core::{SchedulerError, SimClock};

#[test]
fn test_clock_starts_at_zero() {
    let clock = SimClock::new();
    assert_eq!(clock.now(), 0.0);
}

#[test]
fn test_advance_to_moves_forward() {
    let mut clock = SimClock::new();

    clock.advance_to(1.5).unwrap();
    assert_eq!(clock.now(), 1.5);

    clock.advance_to(42.0).unwrap();
    assert_eq!(clock.now(), 42.0);
}

#[test]
fn test_advance_to_same_time_is_noop() {
    let mut clock = SimClock::new();
    clock.advance_to(3.0).unwrap();
    clock.advance_to(3.0).unwrap();
    assert_eq!(clock.now(), 3.0);
}

#[test]
fn test_clock_never_rewinds() {
    let mut clock = SimClock::new();
    clock.advance_to(8.0).unwrap();

    let result = clock.advance_to(7.0);
    assert!(matches!(result, Err(SchedulerError::ClockRewind { .. })));
    assert_eq!(clock.now(), 8.0);
}
