//! Priority ordering and age-boost
//!
//! Shows a caller-driven context draining in priority order, and a patient
//! low-priority task overtaking later urgent submissions once it has aged.
//!
//! Run with: cargo run --example priority_ageing

use prioritask::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> prioritask::Result<()> {
    println!("=== prioritask - Priority Ageing ===\n");

    println!("1. Caller-driven drain happens in priority order:");
    let ctx = TaskContext::new();
    for (label, prio) in [
        ("lowest", Priority::LOWEST),
        ("medium", Priority::MEDIUM),
        ("highest", Priority::HIGHEST),
        ("low", Priority::LOW),
        ("high", Priority::HIGH),
    ] {
        post_with_priority(&ctx, prio, move || println!("   ran {}", label))?;
    }
    ctx.run();

    println!("\n2. Ageing: a queued task gains urgency every second.");
    let mut pool = ThreadPool::with_threads(1)?;

    // Occupy the single worker so the probes stay queued.
    let _blocker = post_with_priority(&pool, Priority::HIGHEST, || {
        thread::sleep(Duration::from_millis(2500));
    })?;

    post_with_priority(&pool, Priority(3), || {
        println!("   patient task (submitted first, priority 3)");
    })?;

    thread::sleep(Duration::from_millis(2200));
    post_with_priority(&pool, Priority(2), || {
        println!("   latecomer task (submitted last, priority 2)");
    })?;

    println!("   ... the patient task has aged below the latecomer:");
    pool.join()?;

    Ok(())
}
