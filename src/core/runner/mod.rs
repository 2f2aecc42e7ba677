use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crate::core::{
    config::DemoConfig,
    error::{QueueError, Result},
    event::Event,
    log::Journal,
    queue::Queue,
};

/// Worker name used for the close event
pub const COORDINATOR: &str = "coordinator";

/// Outcome of [`run_demo`]
#[derive(Debug)]
pub struct DemoReport {
    pub produced: usize,
    pub rejected: usize,
    pub consumed: usize,
    pub journal: Arc<Journal<String>>,
}

/// Run producers and consumers against one shared queue.
///
/// Producers enqueue `"{producer}-item {n}"` values. Consumers drain the queue
/// with the blocking iterator until it is closed. The queue is closed once every
/// producer finished and the buffer drained, so nothing is discarded.
pub fn run_demo(config: &DemoConfig) -> Result<DemoReport> {
    let queue = Arc::new(Queue::<String>::new());
    let journal = Arc::new(Journal::new());

    tracing::info!(
        producers = config.producers,
        consumers = config.consumers,
        items = config.items_per_producer,
        "starting queue demo"
    );

    let spawned = (0..config.consumers)
        .map(|n| spawn_consumer(format!("consumer-{n}"), queue.clone(), journal.clone()))
        .collect::<Result<Vec<_>>>()
        .and_then(|consumers| produce(config, &queue, &journal).map(|counts| (consumers, counts)));
    let (consumers, (produced, rejected)) = match spawned {
        Ok(started) => started,
        Err(err) => {
            // release any consumer already parked in dequeue
            queue.close();
            return Err(err);
        }
    };

    // close discards whatever is still buffered, wait for consumers to catch up.
    // Polling with a short sleep keeps the coordinator off the CPU meanwhile.
    while !queue.is_empty() {
        thread::sleep(Duration::from_millis(1));
    }
    // take the event id before waking consumers so the close sorts ahead of
    // their final dequeues
    let closed = Event::close(COORDINATOR);
    queue.close();
    journal.record(closed);

    let mut consumed = 0;
    for handle in consumers {
        consumed += join(handle)?;
    }

    tracing::info!(produced, rejected, consumed, "queue demo finished");
    Ok(DemoReport { produced, rejected, consumed, journal })
}

/// Spawn every producer and wait for them; returns (accepted, rejected) totals.
fn produce(
    config: &DemoConfig,
    queue: &Arc<Queue<String>>,
    journal: &Arc<Journal<String>>,
) -> Result<(usize, usize)> {
    let producers = (0..config.producers)
        .map(|n| {
            spawn_producer(
                format!("producer-{n}"),
                config.items_per_producer,
                queue.clone(),
                journal.clone(),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let mut produced = 0;
    let mut rejected = 0;
    for handle in producers {
        let (accepted, refused) = join(handle)?;
        produced += accepted;
        rejected += refused;
    }
    Ok((produced, rejected))
}

fn spawn_producer(
    name: String,
    items: usize,
    queue: Arc<Queue<String>>,
    journal: Arc<Journal<String>>,
) -> Result<JoinHandle<(usize, usize)>> {
    let handle = thread::Builder::new().name(name.clone()).spawn(move || {
        let mut accepted = 0;
        let mut refused = 0;
        for n in 1..=items {
            let item = format!("{name}-item {n}");
            let index = queue.enqueue(item.clone());
            match index {
                Some(_) => accepted += 1,
                None => refused += 1,
            }
            journal.record(Event::enqueue(&name, item, index));
        }
        tracing::debug!(worker = %name, accepted, refused, "producer done");
        (accepted, refused)
    })?;
    Ok(handle)
}

fn spawn_consumer(
    name: String,
    queue: Arc<Queue<String>>,
    journal: Arc<Journal<String>>,
) -> Result<JoinHandle<usize>> {
    let handle = thread::Builder::new().name(name.clone()).spawn(move || {
        let mut consumed = 0;
        for item in queue.iter() {
            journal.record(Event::dequeue(&name, Some(item)));
            consumed += 1;
        }
        // the iterator only ends once the queue is closed
        journal.record(Event::dequeue(&name, None));
        tracing::debug!(worker = %name, consumed, "consumer done");
        consumed
    })?;
    Ok(handle)
}

fn join<R>(handle: JoinHandle<R>) -> Result<R> {
    let name = handle.thread().name().unwrap_or("unnamed").to_string();
    handle.join().map_err(|_| QueueError::WorkerPanicked(name))
}
