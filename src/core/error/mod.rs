use thiserror::Error;

/// Errors raised by the journal, configuration and demo runner.
///
/// The queue itself never fails; rejection and emptiness are reported as `None`.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("journal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal entry could not be encoded or decoded: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    #[error("worker thread {0} panicked")]
    WorkerPanicked(String),
}

pub type Result<T> = std::result::Result<T, QueueError>;
