use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use serde::{Serialize, Deserialize};

static EVENT_COUNTER: AtomicU64 = AtomicU64::new(1); // process-wide, unique per event

/// Queue operation an [`Event`] describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOp {
    Enqueue,
    Dequeue,
    RemoveAt,
    Clear,
    Close,
}

/// One observed queue operation, as written to the journal.
///
/// `index` is the position the operation touched (enqueue, remove_at), `size`
/// is a count the operation reported (items cleared, length after remove_at).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event<T> {
    pub id: u64,
    pub worker: String,
    pub op: EventOp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub accepted: bool,
    pub at_micros: u64,
}

impl<T> Event<T> {
    fn next_id() -> u64 {
        EVENT_COUNTER.fetch_add(1, Ordering::SeqCst)
    }

    fn now_micros() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }

    fn new(worker: &str, op: EventOp, accepted: bool) -> Self {
        Self {
            id: Self::next_id(),
            worker: worker.to_string(),
            op,
            item: None,
            index: None,
            size: None,
            accepted,
            at_micros: Self::now_micros(),
        }
    }

    /// `index` is what [`crate::Queue::enqueue`] returned; `None` means rejected.
    pub fn enqueue(worker: &str, item: T, index: Option<usize>) -> Self {
        Self {
            item: Some(item),
            index,
            ..Self::new(worker, EventOp::Enqueue, index.is_some())
        }
    }

    /// A dequeue that came back empty is recorded with `accepted == false`.
    pub fn dequeue(worker: &str, item: Option<T>) -> Self {
        let accepted = item.is_some();
        Self {
            item,
            ..Self::new(worker, EventOp::Dequeue, accepted)
        }
    }

    pub fn remove_at(worker: &str, index: usize, new_len: Option<usize>) -> Self {
        Self {
            index: Some(index),
            size: new_len,
            ..Self::new(worker, EventOp::RemoveAt, new_len.is_some())
        }
    }

    pub fn clear(worker: &str, removed: usize) -> Self {
        Self {
            size: Some(removed),
            ..Self::new(worker, EventOp::Clear, true)
        }
    }

    pub fn close(worker: &str) -> Self {
        Self::new(worker, EventOp::Close, true)
    }
}
