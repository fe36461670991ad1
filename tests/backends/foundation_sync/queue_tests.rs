use foundation_sync::{BoundedQueue, PutTimeoutError};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

fn wait_until_full<T>(queue: &BoundedQueue<T>) {
    while !queue.is_full() {
        thread::sleep(Duration::from_millis(1));
    }
}

/// WHY: A put on a full queue must park until a get frees a slot, and the
/// elements still come out in insertion order
#[test]
#[ntest::timeout(10000)]
fn test_full_queue_blocks_put_until_get() {
    let queue = BoundedQueue::new(2);
    queue.put(1).unwrap();
    queue.put(2).unwrap();

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || queue.put(3))
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!producer.is_finished());
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.get(), Ok(1));
    producer.join().unwrap().unwrap();

    assert_eq!(queue.get(), Ok(2));
    assert_eq!(queue.get(), Ok(3));
    assert!(queue.is_empty());
}

/// WHY: An empty queue parks consumers until something is put
#[test]
#[ntest::timeout(10000)]
fn test_empty_queue_blocks_get_until_put() {
    let queue = BoundedQueue::new(1);

    let consumer = {
        let queue = queue.clone();
        thread::spawn(move || queue.get())
    };

    thread::sleep(Duration::from_millis(20));
    assert!(!consumer.is_finished());

    queue.put("hello").unwrap();
    assert_eq!(consumer.join().unwrap(), Ok("hello"));
}

/// WHY: A single producer and consumer through a tiny ring must preserve
/// order across many wrap-arounds
#[test]
#[ntest::timeout(10000)]
fn test_order_survives_wrap_around() {
    let queue = BoundedQueue::new(3);

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            for n in 0..10_000u32 {
                queue.put(n).unwrap();
            }
            queue.close();
        })
    };

    let received: Vec<u32> = queue.iter().collect();
    producer.join().unwrap();

    assert_eq!(received, (0..10_000).collect::<Vec<_>>());
}

/// WHY: Under contention every put is matched by exactly one get
#[test]
#[ntest::timeout(20000)]
fn test_no_loss_no_duplication() {
    let queue = BoundedQueue::new(4);
    let mut producers = vec![];
    let mut consumers = vec![];

    for p in 0..4u32 {
        let queue = queue.clone();
        producers.push(thread::spawn(move || {
            for n in 0..500u32 {
                queue.put(p * 1_000 + n).unwrap();
            }
        }));
    }
    for _ in 0..3 {
        let queue = queue.clone();
        consumers.push(thread::spawn(move || queue.iter().collect::<Vec<_>>()));
    }

    for producer in producers {
        producer.join().unwrap();
    }
    queue.close();

    let mut seen = HashSet::new();
    for consumer in consumers {
        for value in consumer.join().unwrap() {
            assert!(seen.insert(value), "value {value} delivered twice");
        }
    }
    assert_eq!(seen.len(), 2000);
}

/// WHY: A timed put on a queue that stays full hands the value back
#[test]
#[ntest::timeout(10000)]
fn test_put_timeout_returns_value() {
    let queue = BoundedQueue::new(1);
    queue.put(String::from("first")).unwrap();

    match queue.put_timeout(String::from("second"), Duration::from_millis(10)) {
        Err(PutTimeoutError::Timeout(value)) => assert_eq!(value, "second"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(queue.len(), 1);
}

/// WHY: Draining frees every slot and wakes blocked producers
#[test]
#[ntest::timeout(10000)]
fn test_drain_releases_blocked_producers() {
    let queue = BoundedQueue::new(2);
    let producers: Vec<_> = (0..4)
        .map(|n| {
            let queue = queue.clone();
            thread::spawn(move || queue.put(n))
        })
        .collect();

    wait_until_full(&queue);
    let mut drained = queue.drain();

    while drained.len() < 4 {
        match queue.get_timeout(Duration::from_secs(5)) {
            Ok(value) => drained.push(value),
            Err(err) => panic!("producer never got a slot: {err}"),
        }
    }
    for producer in producers {
        producer.join().unwrap().unwrap();
    }

    drained.sort_unstable();
    assert_eq!(drained, vec![0, 1, 2, 3]);
}
