// tests/limiter/concurrency_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::{limiter_at_zero, limiter_with};
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn simultaneous_checks_admit_exactly_once() {
        // repeat to give the race a chance to show up
        for round in 0..50 {
            let (limiter, _) = limiter_at_zero();
            let barrier = Barrier::new(2);
            let admitted = AtomicUsize::new(0);

            thread::scope(|s| {
                for _ in 0..2 {
                    s.spawn(|| {
                        barrier.wait();
                        if limiter.check(1, "9.9.9.9").is_ok() {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            assert_eq!(admitted.load(Ordering::SeqCst), 1, "round {round}");
        }
    }

    #[test]
    fn many_threads_never_exceed_the_quota() {
        let (limiter, _) = limiter_at_zero();
        let threads = 8;
        let attempts_per_thread = 50;
        let limit = 25;
        let barrier = Barrier::new(threads);
        let admitted = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    barrier.wait();
                    for _ in 0..attempts_per_thread {
                        if limiter.check(limit, "shared").is_ok() {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(admitted.load(Ordering::SeqCst), limit as usize);
        assert_eq!(limiter.admitted_in_window("shared").unwrap(), limit as usize);
    }

    #[test]
    fn concurrent_distinct_clients_respect_soft_capacity() {
        let (limiter, _) = limiter_with(60.0, 16);

        thread::scope(|s| {
            for t in 0..4 {
                let limiter = limiter.clone();
                s.spawn(move || {
                    for i in 0..100 {
                        limiter.check(1, &format!("t{t}-c{i}")).unwrap();
                    }
                });
            }
        });

        // evictions can interleave; one uncontended insert settles the count
        limiter.check(1, "settle").unwrap();
        assert!(limiter.tracked_clients() <= 16);
    }

    #[test]
    fn cleanup_runs_alongside_checks() {
        let (limiter, clock) = limiter_with(1.0, 1_000);

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    let _ = limiter.check(3, &format!("client{}", i % 20));
                }
            });
            s.spawn(|| {
                for _ in 0..50 {
                    limiter.cleanup_stale_clients().unwrap();
                }
            });
        });

        clock.advance(2.0);
        limiter.cleanup_stale_clients().unwrap();
        assert_eq!(limiter.tracked_clients(), 0);
    }
}
