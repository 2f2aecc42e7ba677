use std::path::PathBuf;
use UnboundedQueueMini::core::config::DemoConfig;
use UnboundedQueueMini::core::event::EventOp;
use UnboundedQueueMini::core::log::read_ndjson;
use UnboundedQueueMini::core::runner::{run_demo, COORDINATOR};

fn config(producers: usize, consumers: usize, items_per_producer: usize) -> DemoConfig {
    DemoConfig {
        producers,
        consumers,
        items_per_producer,
        journal_path: PathBuf::from("unused.ndjson"),
    }
}

#[test]
fn test_demo_consumes_everything_produced() {
    let report = run_demo(&config(4, 3, 50)).unwrap();

    assert_eq!(report.produced, 200);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.consumed, 200);
    assert_eq!(report.journal.count(EventOp::Enqueue), 200);
    assert_eq!(report.journal.count(EventOp::Dequeue), 200);
    assert_eq!(report.journal.count(EventOp::Close), 1);
}

#[test]
fn test_demo_consumers_end_with_closed_dequeue() {
    let report = run_demo(&config(2, 2, 5)).unwrap();

    for consumer in ["consumer-0", "consumer-1"] {
        let entries = report.journal.entries_for(consumer);
        let last = entries.last().expect("consumer recorded its exit");
        assert_eq!(last.op, EventOp::Dequeue);
        assert!(!last.accepted);
        assert_eq!(last.item, None);
    }
    assert_eq!(report.journal.entries_for(COORDINATOR).len(), 1);
}

#[test]
fn test_demo_per_producer_order_preserved() {
    let report = run_demo(&config(3, 1, 20)).unwrap();

    // single consumer: each producer's items come out in their insertion order
    let consumed: Vec<String> = report
        .journal
        .entries_for("consumer-0")
        .into_iter()
        .filter_map(|e| e.item)
        .collect();
    assert_eq!(consumed.len(), 60);
    for p in 0..3 {
        let prefix = format!("producer-{p}-item ");
        let order: Vec<usize> = consumed
            .iter()
            .filter_map(|item| item.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(order, (1..=20).collect::<Vec<_>>());
    }
}

#[test]
fn test_demo_journal_written_as_ndjson() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.ndjson");
    let report = run_demo(&config(1, 1, 3)).unwrap();

    let lines = report.journal.append_ndjson(&path).unwrap();
    assert_eq!(lines, report.journal.len());

    let events = read_ndjson::<String, _>(&path).unwrap();
    assert_eq!(events.len(), lines);
    assert_eq!(events.iter().filter(|e| e.op == EventOp::Enqueue).count(), 3);
}

#[test]
fn test_demo_without_items() {
    let report = run_demo(&config(2, 2, 0)).unwrap();
    assert_eq!(report.produced, 0);
    assert_eq!(report.consumed, 0);
    // two closed dequeues plus the close itself
    assert_eq!(report.journal.len(), 3);
}

#[test]
fn test_demo_close_recorded_before_consumers_exit() {
    for _ in 0..20 {
        let report = run_demo(&config(1, 4, 1)).unwrap();
        let entries = report.journal.entries();
        let close = entries
            .iter()
            .find(|e| e.op == EventOp::Close)
            .expect("coordinator recorded the close");

        let exits: Vec<_> = entries
            .iter()
            .filter(|e| e.op == EventOp::Dequeue && !e.accepted)
            .collect();
        assert_eq!(exits.len(), 4);
        for exit in exits {
            assert!(
                close.id < exit.id,
                "{} exited (id {}) before the close (id {})",
                exit.worker,
                exit.id,
                close.id
            );
        }
    }
}
