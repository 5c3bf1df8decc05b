//! Property-based tests using proptest

use proptest::prelude::*;
use prioritask::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

proptest! {
    /// Every successful post is executed exactly once before join returns
    #[test]
    fn test_drain_completeness(threads in 1usize..4, jobs in 0usize..40) {
        let mut pool = ThreadPool::with_threads(threads).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..jobs {
            let counter = Arc::clone(&counter);
            post(&pool, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }).unwrap();
        }

        pool.join().unwrap();

        prop_assert_eq!(counter.load(Ordering::SeqCst), jobs);
        prop_assert_eq!(pool.jobs_done(), jobs as u64);
    }

    /// Values pass through the future unchanged
    #[test]
    fn test_value_fidelity(values in prop::collection::vec(any::<i64>(), 1..20)) {
        let mut pool = ThreadPool::with_threads(2).unwrap();

        let futures: Vec<_> = values
            .iter()
            .map(|&v| post(&pool, move || v).unwrap())
            .collect();

        for (mut future, &expected) in futures.into_iter().zip(values.iter()) {
            prop_assert_eq!(future.get().unwrap(), expected);
        }

        pool.join().unwrap();
    }

    /// A single-threaded drain pops strictly by priority when all
    /// priorities are distinct (ageing is negligible at test timescales)
    #[test]
    fn test_context_drains_by_priority(prios in prop::collection::btree_set(any::<u8>(), 1..15)) {
        let ctx = TaskContext::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        // Submit most-patient first so the heap has to reorder everything.
        for &p in prios.iter().rev() {
            let order = Arc::clone(&order);
            post_with_priority(&ctx, Priority(p), move || order.lock().push(p)).unwrap();
        }

        ctx.run();

        let executed = order.lock().clone();
        let expected: Vec<u8> = prios.into_iter().collect();
        prop_assert_eq!(executed, expected);
    }

    /// jobs_done never decreases and settles at the number of posts
    #[test]
    fn test_jobs_done_monotonic(batches in prop::collection::vec(1usize..10, 1..5)) {
        let mut pool = ThreadPool::with_threads(2).unwrap();
        let mut last = 0;
        let mut total = 0u64;

        for batch in batches {
            let futures: Vec<_> = (0..batch).map(|_| post(&pool, || ()).unwrap()).collect();
            for mut future in futures {
                future.get().unwrap();
            }
            total += batch as u64;

            let done = pool.jobs_done();
            prop_assert!(done >= last);
            last = done;
        }

        pool.join().unwrap();
        prop_assert_eq!(pool.jobs_done(), total);
    }

    /// Submission to a stopped pool is always rejected with Stopped
    #[test]
    fn test_stopped_pool_rejects(_seed in 0u32..50) {
        let mut pool = ThreadPool::with_threads(1).unwrap();
        pool.join().unwrap();

        let result = post(&pool, || ());
        prop_assert!(matches!(result, Err(SchedulerError::Stopped)));
    }
}
