use foundation_sync::{BarrierWaitResult, Broken, CyclicBarrier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn run_round(barrier: &CyclicBarrier) -> Vec<BarrierWaitResult> {
    let handles: Vec<_> = (0..barrier.parties())
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.wait().unwrap())
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

/// WHY: Two of three parties block, the third releases the round, and the
/// next round's generation is exactly one higher
#[test]
#[ntest::timeout(10000)]
fn test_three_parties_two_rounds() {
    let barrier = CyclicBarrier::new(3);

    let early: Vec<_> = (0..2)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || barrier.wait().unwrap())
        })
        .collect();

    while barrier.n_waiting() < 2 {
        thread::sleep(Duration::from_millis(1));
    }
    assert!(early.iter().all(|h| !h.is_finished()));

    let last = barrier.wait().unwrap();
    assert!(last.is_leader());
    let first_round = last.generation();
    for handle in early {
        let result = handle.join().unwrap();
        assert!(!result.is_leader());
        assert_eq!(result.generation(), first_round);
    }

    let second = run_round(&barrier);
    assert!(second.iter().all(|r| r.generation() == first_round + 1));
    assert_eq!(second.iter().filter(|r| r.is_leader()).count(), 1);
}

/// WHY: No party leaves a round before the last one has arrived
#[test]
#[ntest::timeout(20000)]
fn test_no_party_leaves_early() {
    const PARTIES: usize = 5;
    const ROUNDS: usize = 50;

    let barrier = CyclicBarrier::new(PARTIES);
    let arrivals = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..PARTIES)
        .map(|_| {
            let barrier = barrier.clone();
            let arrivals = Arc::clone(&arrivals);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    arrivals.fetch_add(1, Ordering::AcqRel);
                    barrier.wait().unwrap();
                    assert!(arrivals.load(Ordering::Acquire) >= (round + 1) * PARTIES);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(barrier.generation(), ROUNDS as u64);
}

/// WHY: Arrival indexes within a round are a permutation of 0..parties
#[test]
#[ntest::timeout(10000)]
fn test_arrival_indexes_are_unique() {
    let barrier = CyclicBarrier::new(4);

    let mut indexes: Vec<usize> = run_round(&barrier)
        .iter()
        .map(BarrierWaitResult::arrival_index)
        .collect();
    indexes.sort_unstable();

    assert_eq!(indexes, vec![0, 1, 2, 3]);
}

/// WHY: A broken barrier fails newcomers immediately until reset
#[test]
#[ntest::timeout(10000)]
fn test_broken_barrier_rejects_arrivals() {
    let barrier = CyclicBarrier::new(2);
    assert!(barrier
        .wait_timeout(Duration::from_millis(5))
        .unwrap_err()
        .is_timeout());

    assert!(barrier.is_broken());
    assert_eq!(barrier.wait(), Err(Broken));

    barrier.reset();
    assert_eq!(run_round(&barrier).len(), 2);
}
