//! Shared fixtures for barrier integration tests.

#![allow(dead_code)]

use std::thread;

use gkel_sync::BarrierHandle;

/// Run `cycles` complete rendezvous on `barrier` with `participants`
/// threads, each calling `wait` once per cycle, and return the total
/// number of leader outcomes observed across all threads.
pub fn run_rendezvous_cycles(barrier: &BarrierHandle, participants: u32, cycles: usize) -> usize {
    thread::scope(|scope| {
        let mut workers = Vec::new();
        for _ in 0..participants {
            let handle = barrier.clone();
            workers.push(scope.spawn(move || {
                let mut led = 0usize;
                for _ in 0..cycles {
                    if handle.wait().unwrap().is_leader() {
                        led += 1;
                    }
                }
                led
            }));
        }
        workers.into_iter().map(|w| w.join().unwrap()).sum()
    })
}

/// Spin until at least `count` threads are blocked inside the barrier.
///
/// Used to sequence a test action after followers have provably entered
/// their blocking wait, without sleeping.
pub fn wait_for_blocked_waiters(barrier: &BarrierHandle, count: u32) {
    while barrier.waiters().unwrap() < count {
        thread::yield_now();
    }
}
