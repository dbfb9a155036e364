/*!
 * Scenario Tests
 * Staged deadlock replay under both strategies
 */

use osviz_kernel::simulation::{circular_wait, DeadlockRun, ScenarioStep, StepEffect, Strategy, Verdict};
use osviz_kernel::{ProcessRecord, SimError};
use pretty_assertions::assert_eq;

#[test]
fn test_circular_wait_detection() {
    let mut run = DeadlockRun::new(circular_wait(), Strategy::Detection).unwrap();

    let mut effects = Vec::new();
    while let Some(record) = run.step().unwrap() {
        effects.push(record.effect);
    }
    assert!(run.is_complete());
    assert_eq!(&effects[..4], &[StepEffect::Acquired; 4]);
    assert_eq!(&effects[4..], &[StepEffect::Waiting; 4]);

    let verdict = run.verdict().unwrap();
    assert!(verdict.is_hazard());
    assert_eq!(
        verdict.to_string(),
        "deadlock detected: circular wait 101 -> 102 -> 103 -> 104"
    );
}

#[test]
fn test_cycle_only_closes_on_last_step() {
    let mut run = DeadlockRun::new(circular_wait(), Strategy::Detection).unwrap();
    for _ in 0..7 {
        run.step().unwrap();
    }
    assert!(!run.state().detect_cycle());

    run.step().unwrap();
    assert!(run.state().detect_cycle());
}

#[test]
fn test_circular_wait_avoidance() {
    let report = DeadlockRun::new(circular_wait(), Strategy::Avoidance)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.strategy, Strategy::Avoidance);
    assert_eq!(
        report.verdict.to_string(),
        "safe sequence found: 103 -> 101 -> 104 -> 102"
    );
    assert!(report.log[4].message.starts_with("ALPHA requests MEMORY_BANK_A (held by BETA)"));
}

#[test]
fn test_avoidance_surfaces_negative_need() {
    let mut scenario = circular_wait();
    // DELTA declares no need for CPU_CORE_1 but is handed one anyway
    scenario.steps.push(ScenarioStep::allocate(104, 1, 1));

    let err = DeadlockRun::new(scenario, Strategy::Avoidance)
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, SimError::Banker(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_invalid_initial_state() {
    let mut scenario = circular_wait();
    scenario.processes.push(ProcessRecord::new(101, "ALPHA-2"));
    assert!(matches!(
        DeadlockRun::new(scenario, Strategy::Detection),
        Err(SimError::Resource(_))
    ));
}

#[test]
fn test_report_serializes_verdict() {
    let report = DeadlockRun::new(circular_wait(), Strategy::Detection)
        .unwrap()
        .run()
        .unwrap();
    let json = serde_json::to_value(&report.verdict).unwrap();
    assert_eq!(json["strategy"], "detection");
    assert_eq!(json["deadlocked"], true);

    let back: Verdict = serde_json::from_value(json).unwrap();
    assert_eq!(back, report.verdict);
}
