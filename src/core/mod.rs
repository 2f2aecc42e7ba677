pub mod config;
pub mod error;
pub mod event;
pub mod log;
pub mod queue;
pub mod runner;
