//! Basic worker pool usage
//!
//! Demonstrates pool creation, task submission with priorities, result
//! futures and graceful shutdown.
//!
//! Run with: cargo run --example basic_usage

use prioritask::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> prioritask::Result<()> {
    println!("=== prioritask - Basic Usage ===\n");

    let mut pool = ThreadPool::with_threads(4)?;
    println!("1. Started a pool with {} threads", pool.thread_count());

    println!("\n2. Submitting tasks:");
    let mut futures = Vec::new();
    for i in 0..10u64 {
        let future = post(&pool, move || {
            println!(
                "   task {} running on {:?}",
                i,
                thread::current().name().unwrap_or("?")
            );
            thread::sleep(Duration::from_millis(50));
            i * i
        })?;
        futures.push(future);
    }

    println!("\n3. Collecting results:");
    for (i, mut future) in futures.into_iter().enumerate() {
        println!("   task {} -> {}", i, future.get()?);
    }

    println!("\n4. A panicking task surfaces as an error:");
    let mut failing = post(&pool, || -> u64 { panic!("deliberate failure") })?;
    match failing.get() {
        Err(e) => println!("   received: {}", e),
        Ok(_) => unreachable!(),
    }

    pool.join()?;
    println!("\n5. Pool drained; {} tasks done", pool.jobs_done());

    Ok(())
}
