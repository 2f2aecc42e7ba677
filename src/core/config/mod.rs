use std::path::PathBuf;
use crate::core::error::{QueueError, Result};

pub const PRODUCERS_VAR: &str = "QUEUE_DEMO_PRODUCERS";
pub const CONSUMERS_VAR: &str = "QUEUE_DEMO_CONSUMERS";
pub const ITEMS_VAR: &str = "QUEUE_DEMO_ITEMS";
pub const JOURNAL_VAR: &str = "QUEUE_DEMO_JOURNAL";

/// Settings for the producer/consumer demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub producers: usize,
    pub consumers: usize,
    /// items each producer enqueues
    pub items_per_producer: usize,
    pub journal_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            producers: 4,
            consumers: 2,
            items_per_producer: 3,
            journal_path: PathBuf::from("output.ndjson"),
        }
    }
}

impl DemoConfig {
    /// Load from the `QUEUE_DEMO_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DemoConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            producers: parse_count(&lookup, PRODUCERS_VAR, defaults.producers)?,
            consumers: parse_count(&lookup, CONSUMERS_VAR, defaults.consumers)?,
            items_per_producer: parse_count(&lookup, ITEMS_VAR, defaults.items_per_producer)?,
            journal_path: lookup(JOURNAL_VAR)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_path),
        };

        // nobody would ever drain the queue without consumers
        if config.producers == 0 {
            return Err(QueueError::Config { key: PRODUCERS_VAR, value: "0".into() });
        }
        if config.consumers == 0 {
            return Err(QueueError::Config { key: CONSUMERS_VAR, value: "0".into() });
        }
        Ok(config)
    }
}

fn parse_count<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| QueueError::Config { key, value: raw }),
    }
}
