//! Checkpoint Tests - Save/Load Simulation State
//!
//! Critical invariants tested:
//! - Determinism: a restored run produces identical results
//! - Queue integrity: waiting calls survive the round trip in FIFO order
//! - Config matching: state from a different config is rejected
//! - Corruption: malformed or inconsistent snapshots are rejected

use call_center_sim_core::orchestrator::{
    validate_snapshot, Orchestrator, RunConfig, SimulationError, StateSnapshot,
};
use serde_json::Value;

// ============================================================================
// Test Helpers
// ============================================================================

/// One agent under heavy load so snapshots carry queued calls
fn busy_config(seed: u64) -> RunConfig {
    RunConfig {
        num_agents: 1,
        arrival_rate: 0.5,
        mean_service: 4.0,
        horizon: 200.0,
        rng_seed: seed,
    }
}

fn orchestrator_at(config: RunConfig, t: f64) -> Orchestrator {
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run_until(t).unwrap();
    orchestrator
}

fn tamper(json: &str, edit: impl FnOnce(&mut Value)) -> String {
    let mut value: Value = serde_json::from_str(json).unwrap();
    edit(&mut value);
    serde_json::to_string(&value).unwrap()
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_resume_matches_uninterrupted_run() {
    let config = busy_config(42);

    let mut uninterrupted = Orchestrator::new(config.clone()).unwrap();
    let expected = uninterrupted.run().unwrap();

    let saved = orchestrator_at(config.clone(), 50.0).save_state().unwrap();
    let mut restored = Orchestrator::load_state(config, &saved).unwrap();
    let actual = restored.run().unwrap();

    assert_eq!(actual, expected);
    assert_eq!(restored.event_log().events(), uninterrupted.event_log().events());
    assert_eq!(restored.metrics(), uninterrupted.metrics());
}

#[test]
fn test_resume_from_several_points() {
    let config = busy_config(7);
    let expected = Orchestrator::new(config.clone()).unwrap().run().unwrap();

    for t in [0.0, 1.0, 33.3, 120.0, 200.0] {
        let saved = orchestrator_at(config.clone(), t).save_state().unwrap();
        let actual = Orchestrator::load_state(config.clone(), &saved)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(actual, expected, "diverged after resuming at t={}", t);
    }
}

#[test]
fn test_chained_checkpoints() {
    let config = busy_config(99);
    let expected = Orchestrator::new(config.clone()).unwrap().run().unwrap();

    let mut orchestrator = Orchestrator::new(config.clone()).unwrap();
    for t in [40.0, 80.0, 160.0] {
        orchestrator.run_until(t).unwrap();
        let saved = orchestrator.save_state().unwrap();
        orchestrator = Orchestrator::load_state(config.clone(), &saved).unwrap();
    }

    assert_eq!(orchestrator.run().unwrap(), expected);
}

// ============================================================================
// State preservation
// ============================================================================

#[test]
fn test_snapshot_preserves_queue_and_clock() {
    let config = busy_config(42);
    let original = orchestrator_at(config.clone(), 100.0);
    assert!(
        original.pool().queue_len() > 0,
        "scenario should have calls waiting at t=100"
    );

    let saved = original.save_state().unwrap();
    let restored = Orchestrator::load_state(config, &saved).unwrap();

    assert_eq!(restored.now(), original.now());
    assert_eq!(
        restored.pool().waiting().collect::<Vec<_>>(),
        original.pool().waiting().collect::<Vec<_>>()
    );
    assert_eq!(restored.pool().in_use(), original.pool().in_use());
    assert_eq!(restored.calls_waiting(), original.calls_waiting());
    assert_eq!(restored.calls_in_service(), original.calls_in_service());
    assert_eq!(restored.task_count(), original.task_count());
    assert_eq!(restored.scheduler().pending(), original.scheduler().pending());
}

#[test]
fn test_save_is_stable() {
    let orchestrator = orchestrator_at(busy_config(3), 60.0);
    assert_eq!(
        orchestrator.save_state().unwrap(),
        orchestrator.save_state().unwrap()
    );
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn test_config_mismatch_rejected() {
    let saved = orchestrator_at(busy_config(42), 50.0).save_state().unwrap();

    let other = RunConfig {
        rng_seed: 43,
        ..busy_config(42)
    };
    assert!(matches!(
        Orchestrator::load_state(other, &saved),
        Err(SimulationError::StateValidationError(_))
    ));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        Orchestrator::load_state(busy_config(42), "{not json"),
        Err(SimulationError::SerializationError(_))
    ));
}

#[test]
fn test_invalid_config_rejected_on_load() {
    let saved = orchestrator_at(busy_config(42), 50.0).save_state().unwrap();
    let invalid = RunConfig {
        num_agents: 0,
        ..busy_config(42)
    };
    assert!(matches!(
        Orchestrator::load_state(invalid, &saved),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_orphaned_requester_rejected() {
    let config = busy_config(42);
    let saved = orchestrator_at(config.clone(), 100.0).save_state().unwrap();

    let corrupted = tamper(&saved, |state| {
        state["pool"]["wait_queue"]
            .as_array_mut()
            .unwrap()
            .push(Value::from(1_000_000u64));
    });

    let snapshot: StateSnapshot = serde_json::from_str(&corrupted).unwrap();
    assert!(matches!(
        validate_snapshot(&snapshot, &config),
        Err(SimulationError::StateValidationError(_))
    ));
    assert!(Orchestrator::load_state(config, &corrupted).is_err());
}

#[test]
fn test_overbooked_pool_rejected() {
    let config = busy_config(42);
    let saved = orchestrator_at(config.clone(), 100.0).save_state().unwrap();

    let corrupted = tamper(&saved, |state| {
        state["pool"]["in_use"] = Value::from(2u64);
    });

    assert!(matches!(
        Orchestrator::load_state(config, &corrupted),
        Err(SimulationError::StateValidationError(_))
    ));
}

#[test]
fn test_event_for_unknown_task_rejected() {
    let config = busy_config(42);
    let saved = orchestrator_at(config.clone(), 100.0).save_state().unwrap();

    let corrupted = tamper(&saved, |state| {
        state["tasks"] = Value::Array(Vec::new());
    });

    assert!(matches!(
        Orchestrator::load_state(config, &corrupted),
        Err(SimulationError::StateValidationError(_))
    ));
}
