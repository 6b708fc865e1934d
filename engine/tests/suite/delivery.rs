//! Multi-producer delivery through a single consumer.

use std::collections::{HashMap, HashSet};
use std::thread;

use tdnet_engine::{CompletionMessage, DeliveryQueue, FetchError, TaskId, Target};

const PRODUCERS: u64 = 8;
const PER_PRODUCER: u64 = 100;

fn failed(id: u64) -> CompletionMessage {
    CompletionMessage::new(
        TaskId::new(id),
        Target::Text,
        Err(FetchError::WorkerAborted {
            reason: "synthetic".to_string(),
        }),
    )
}

#[test]
fn every_message_is_applied_exactly_once() {
    let mut queue = DeliveryQueue::new();
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let sender = queue.sender();
            thread::spawn(move || {
                for n in 0..PER_PRODUCER {
                    sender.deliver(failed(p * 1000 + n));
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let mut seen = Vec::new();
    while queue.drain_pending(&mut |m: CompletionMessage| seen.push(m.task().value()), 64) > 0 {}

    assert_eq!(seen.len() as u64, PRODUCERS * PER_PRODUCER);
    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len());

    // Per-producer order is preserved.
    let mut last: HashMap<u64, u64> = HashMap::new();
    for id in seen {
        let (producer, n) = (id / 1000, id % 1000);
        if let Some(prev) = last.insert(producer, n) {
            assert!(prev < n, "producer {producer} reordered: {prev} then {n}");
        }
    }
}

#[test]
fn consumer_thread_is_the_only_applier() {
    let mut queue = DeliveryQueue::new();
    let consumer = thread::current().id();
    let sender = queue.sender();
    thread::spawn(move || {
        for n in 0..10 {
            sender.deliver(failed(n));
        }
        sender.request_shutdown();
    });

    let applied = queue.drain_loop(&mut |_m: CompletionMessage| {
        assert_eq!(thread::current().id(), consumer);
    });
    assert_eq!(applied, 10);
}
