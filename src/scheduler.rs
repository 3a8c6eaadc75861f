use crate::pipeline::{Pipeline, RunOutcome};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Runs the pipeline every `period` until Ctrl-C.
///
/// The first run starts immediately. Each run is awaited before the next
/// tick is taken, and ticks missed while a run was in progress are skipped,
/// so two runs never touch the snapshot at the same time.
pub async fn run_every(pipeline: &Pipeline, period: Duration) {
    run_until(pipeline, period, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await;
}

/// Runs the pipeline every `period` until `shutdown` completes, returning
/// the outcomes of the runs that finished
pub async fn run_until<F>(pipeline: &Pipeline, period: Duration, shutdown: F) -> Vec<RunOutcome>
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    ::log::info!("Scheduling runs every {} seconds", period.as_secs());

    tokio::pin!(shutdown);
    let mut outcomes = Vec::new();
    let mut run = 0u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                ::log::info!("Shutdown requested, stopping scheduler after {} runs", run);
                break;
            }
            _ = interval.tick() => {
                run += 1;
                ::log::debug!("Starting run {}", run);
                outcomes.push(pipeline.run().await);
            }
        }
    }

    outcomes
}
