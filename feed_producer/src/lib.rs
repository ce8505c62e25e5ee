//! Synthetic feed producer.
//!
//! Generates meter readings, stock ticks and blotter trades and publishes them
//! in batches on a fixed interval until a fixed run time elapses:
//!
//! - `generator` — row generators and the dataset cursor (`BatchSource`s).
//! - `publisher` — the bounded publish loop and its stop handle.
//! - `sink` — destinations a serialized batch is handed to.
#![warn(missing_docs)]
pub mod generator;
pub mod publisher;
pub mod sink;

pub use publisher::{BatchSource, LoopState, PublishConfig, PublishLoop, PublishReport, Stopper};
pub use sink::{ConsoleSink, FileSink, Sink, UdpSink};
