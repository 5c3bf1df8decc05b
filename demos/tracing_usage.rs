//! Tracing integration
//!
//! Demonstrates the `tracing` feature: the executor loop, job pickup and
//! pool lifecycle all emit structured events once a subscriber is installed.
//!
//! Run with: `cargo run --example tracing_usage --features tracing`
//!
//! Set RUST_LOG to control log levels:
//! - `RUST_LOG=debug` - show job pickup and executor details
//! - `RUST_LOG=info` - show pool start/join
//! - `RUST_LOG=prioritask=debug` - show only this crate's debug logs

use prioritask::prelude::*;
use std::thread;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> prioritask::Result<()> {
    // Set up a tracing subscriber with an environment filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,prioritask=debug")),
        )
        .init();

    tracing::info!("starting tracing demo");

    let mut pool = ThreadPool::with_threads(4)?;

    tracing::info!("submitting compute tasks");
    let mut futures = Vec::new();
    for i in 0..5u64 {
        let future = post(&pool, move || {
            tracing::info!(task_id = i, "starting computation");
            thread::sleep(Duration::from_millis(50));
            tracing::info!(task_id = i, "computation completed");
            i * i
        })?;
        futures.push(future);
    }

    // Urgent work shows up in the executor's pickup events first.
    let mut urgent = post_with_priority(&pool, Priority::HIGHEST, || {
        tracing::info!("urgent task ran");
    })?;

    for mut future in futures {
        tracing::info!(result = future.get()?, "collected result");
    }
    urgent.get()?;

    // A panicking task is contained by the executor and logged.
    tracing::info!("submitting a failing task");
    let mut failing = post(&pool, || -> u64 { panic!("deliberate failure") })?;
    if let Err(e) = failing.get() {
        tracing::warn!(error = %e, "task failed as expected");
    }

    pool.join()?;
    tracing::info!(jobs_done = pool.jobs_done(), "tracing demo completed");

    Ok(())
}
