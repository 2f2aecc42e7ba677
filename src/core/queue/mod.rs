use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// State guarded by the queue's mutex.
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe, unbounded FIFO queue.
///
/// Producers never block: [`Queue::enqueue`] appends and wakes one waiting
/// consumer. Consumers either block in [`Queue::dequeue`] until an item shows
/// up or the queue is closed, or poll with [`Queue::try_dequeue`].
///
/// There is no capacity limit and therefore no backpressure. Use a bounded
/// channel when producers must be slowed down.
///
/// Share it between threads with `Arc<Queue<T>>`.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use UnboundedQueueMini::Queue;
///
/// let queue = Arc::new(Queue::new());
/// let consumer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || queue.iter().collect::<Vec<&str>>())
/// };
///
/// for item in ["Foo", "Bar", "Baz"] {
///     queue.enqueue(item);
/// }
/// while !queue.is_empty() {
///     thread::yield_now();
/// }
/// queue.close();
///
/// assert_eq!(consumer.join().unwrap(), vec!["Foo", "Bar", "Baz"]);
/// ```
pub struct Queue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> Queue<T> {
    /// Create a new, empty and open queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    // Every critical section leaves `State` consistent before handing control
    // to caller code, so a poisoned lock still holds valid data.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close the queue.
    ///
    /// Buffered items are discarded, every blocked [`Queue::dequeue`] returns
    /// `None`, and later enqueues are rejected. Closing twice is a no-op.
    pub fn close(&self) {
        let discarded = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            self.available.notify_all();
            std::mem::take(&mut state.items)
        };
        // dropped outside the lock
        tracing::debug!(discarded = discarded.len(), "queue closed");
    }

    /// Whether [`Queue::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Append an item to the tail.
    ///
    /// Returns the index the item occupies right after insertion, or `None`
    /// if the queue is closed (the item is dropped).
    pub fn enqueue(&self, item: T) -> Option<usize> {
        let mut state = self.lock();
        if state.closed {
            tracing::trace!("enqueue rejected, queue is closed");
            return None;
        }
        state.items.push_back(item);
        self.available.notify_one();
        Some(state.items.len() - 1)
    }

    /// Remove the head item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed, including for callers that were
    /// already waiting when [`Queue::close`] ran.
    pub fn dequeue(&self) -> Option<T> {
        let state = self.lock();
        // wait_while re-checks after every wakeup: another consumer may have
        // taken the item we were signalled for.
        let mut state = self
            .available
            .wait_while(state, |s| s.items.is_empty() && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return None;
        }
        state.items.pop_front()
    }

    /// Remove the head item without blocking.
    ///
    /// Returns `None` immediately when the queue is empty or closed.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        state.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Index of the first item matching `predicate`, scanning head to tail.
    ///
    /// The predicate runs while the queue is locked; it must not call back
    /// into the same queue.
    pub fn index_of_iter<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.lock().items.iter().position(predicate)
    }

    /// Remove the item at `index` (head is 0) and return the new length.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Use [`Queue::try_remove_at`] when the
    /// index may have gone stale because of concurrent consumers.
    pub fn remove_at(&self, index: usize) -> usize {
        let mut state = self.lock();
        let len = state.items.len();
        if state.items.remove(index).is_none() {
            // release the lock before panicking so the queue is not poisoned
            drop(state);
            panic!("remove_at index (is {index}) should be < len (is {len})");
        }
        state.items.len()
    }

    /// Checked [`Queue::remove_at`]: `None` when `index` is out of range.
    pub fn try_remove_at(&self, index: usize) -> Option<usize> {
        let mut state = self.lock();
        state.items.remove(index)?;
        Some(state.items.len())
    }

    /// Drop every buffered item but keep the queue open.
    ///
    /// Returns how many items were removed. Allocated capacity is kept.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut state = self.lock();
            let removed = state.items.len();
            // in place, so the buffer keeps its capacity
            state.items.clear();
            removed
        };
        tracing::debug!(removed, "queue cleared");
        removed
    }

    /// Buffered capacity, exposed so callers can check that `clear` reuses storage.
    pub fn capacity(&self) -> usize {
        self.lock().items.capacity()
    }

    /// Blocking iterator that yields items until the queue is closed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { queue: self }
    }

    /// Non-blocking iterator that stops at the first empty poll.
    pub fn try_iter(&self) -> TryIter<'_, T> {
        TryIter { queue: self }
    }
}

impl<T: Clone> Queue<T> {
    /// Copy of all buffered items in FIFO order.
    pub fn items(&self) -> Vec<T> {
        self.lock().items.iter().cloned().collect()
    }
}

impl<T: PartialEq> Queue<T> {
    /// Index of the first item equal to `target`.
    pub fn index_of(&self, target: &T) -> Option<usize> {
        self.index_of_iter(|item| item == target)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Queue")
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Blocking iterator returned by [`Queue::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    queue: &'a Queue<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.dequeue()
    }
}

/// Non-blocking iterator returned by [`Queue::try_iter`].
#[derive(Debug)]
pub struct TryIter<'a, T> {
    queue: &'a Queue<T>,
}

impl<T> Iterator for TryIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.try_dequeue()
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
