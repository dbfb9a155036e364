/*!
 * OS Visualizer - Main Entry Point
 *
 * Batch host for the simulation engines:
 * - Paced replay of the configured scheduling algorithm
 * - Comparison of every algorithm on the default workload
 * - Paced replay of the circular-wait deadlock scenario
 * - Banker's safety checks on the built-in matrices
 */

use std::error::Error;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use osviz_kernel::simulation::{circular_wait, classic_bankers, default_workload, unsafe_bankers};
use osviz_kernel::{
    check_safety, init_tracing, run_schedule, Algorithm, DeadlockRun, SchedulingRun, SimulationConfig,
};

fn paced_interval(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize structured tracing
    init_tracing();

    info!("OS visualizer starting...");
    info!("================================================");

    let config = SimulationConfig::load()?;
    let workload = default_workload();

    // Replay the configured algorithm one tick per interval
    info!(algorithm = %config.algorithm, "Replaying scheduling run");
    let mut run = SchedulingRun::from_config(&workload, &config)?;
    let mut interval = paced_interval(config.tick_interval());
    loop {
        interval.tick().await;
        let Some(tick) = run.tick() else {
            break;
        };
        match (tick.running, tick.completed) {
            (_, Some(pid)) => info!(time = tick.time, pid = pid, "process completed"),
            (None, _) => info!(time = tick.time, "cpu idle"),
            _ => {}
        }
    }
    let replay = run.finish();
    if let Some(warning) = &replay.starvation {
        warn!("{}", warning);
    }

    // Compare every algorithm, one blocking task and snapshot each
    info!("Comparing scheduling algorithms...");
    let handles: Vec<_> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let processes = workload.clone();
            let quantum = config.quantum;
            tokio::task::spawn_blocking(move || run_schedule(&processes, algorithm, quantum))
        })
        .collect();

    let mut comparison = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.await??;
        info!(
            algorithm = %outcome.algorithm,
            avg_waiting = outcome.metrics.avg_waiting,
            avg_turnaround = outcome.metrics.avg_turnaround,
            avg_response = outcome.metrics.avg_response,
            "algorithm finished"
        );
        comparison.push(serde_json::json!({
            "algorithm": outcome.algorithm,
            "metrics": outcome.metrics,
            "completion_order": outcome.completion_order(),
            "trace": outcome.trace,
        }));
    }

    // Staged deadlock scenario
    info!(strategy = %config.strategy, "Replaying circular-wait scenario");
    let mut deadlock = DeadlockRun::new(circular_wait(), config.strategy)?;
    let mut interval = paced_interval(config.tick_interval());
    loop {
        interval.tick().await;
        match deadlock.step()? {
            Some(record) => info!("{}", record),
            None => break,
        }
    }
    let verdict = deadlock.verdict()?;

    // Banker's catalogue
    let mut bankers = Vec::new();
    for example in [classic_bankers(), unsafe_bankers()] {
        let state = example.to_state()?;
        info!(example = %example.name, "Banker's state\n{}", state);
        let report = check_safety(state.allocation(), state.max(), state.available())?;
        bankers.push(serde_json::json!({
            "example": example.name,
            "safe": report.safe,
            "sequence": report.sequence,
        }));
    }

    let summary = serde_json::json!({
        "config": config,
        "replay": {
            "algorithm": replay.algorithm,
            "metrics": replay.metrics,
            "stats": replay.stats,
        },
        "comparison": comparison,
        "deadlock": {
            "strategy": deadlock.strategy(),
            "log": deadlock.log(),
            "verdict": verdict,
            "summary": verdict.to_string(),
        },
        "bankers": bankers,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("OS visualizer finished");
    Ok(())
}
