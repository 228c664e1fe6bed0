//! Multi-model chat orchestration

pub mod fanout;

pub use fanout::FanoutOrchestrator;
