/*!
 * Stepping Tests
 * Tick-driven scheduling runs, cancellation and comparison
 */

use osviz_kernel::scheduler::Completeness;
use osviz_kernel::simulation::{compare_algorithms, default_workload, SchedulingRun, SimulationConfig};
use osviz_kernel::Algorithm;
use pretty_assertions::assert_eq;

#[test]
fn test_ticks_cover_whole_run() {
    let mut run = SchedulingRun::new(&default_workload(), Algorithm::Fcfs, 0).unwrap();

    let mut ticks = Vec::new();
    while let Some(tick) = run.tick() {
        ticks.push(tick);
    }
    assert_eq!(ticks.len(), 26);
    assert_eq!(ticks.last().unwrap().completed, Some(4));
    assert!(run.is_finished());
    assert!(run.finish().metrics.is_final());
}

#[test]
fn test_cancel_mid_run() {
    let mut run = SchedulingRun::new(&default_workload(), Algorithm::Sjf, 0).unwrap();
    for _ in 0..12 {
        run.tick();
    }

    let outcome = run.cancel();
    assert_eq!(
        outcome.metrics.completeness,
        Completeness::Incomplete { completed: 2, total: 4 }
    );
    // P1 (wait 0) and P2 (wait 7) finished
    assert_eq!(outcome.metrics.avg_waiting, 3.5);
    assert!(run.is_cancelled());
}

#[test]
fn test_restart_after_cancel() {
    let config = SimulationConfig {
        algorithm: Algorithm::RoundRobin,
        quantum: 4,
        ..Default::default()
    };
    let mut run = SchedulingRun::from_config(&default_workload(), &config).unwrap();
    run.tick();
    run.cancel();

    run.restart().unwrap();
    assert!(!run.is_cancelled());
    let replayed = run.finish();
    assert_eq!(replayed.metrics.makespan, 26);
    assert!(replayed.metrics.is_final());
}

#[test]
fn test_compare_matches_individual_runs() {
    let workload = default_workload();
    let outcomes = compare_algorithms(&workload, 4).unwrap();

    for outcome in outcomes {
        let single = osviz_kernel::run_schedule(&workload, outcome.algorithm, 4).unwrap();
        assert_eq!(outcome.trace, single.trace);
    }
}

#[test]
fn test_compare_rejects_invalid_workload() {
    assert!(compare_algorithms(&[], 4).is_err());
    assert!(compare_algorithms(&default_workload(), 0).is_err());
}
