//! Thread-safe, unbounded, closeable FIFO queue plus a small operation journal
//! and the demo runner built on top of it.

pub mod core;

pub use crate::core::queue::{Iter, Queue, TryIter};
