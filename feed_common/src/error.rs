//! Error types shared between the producer and the listener.
//!
//! The `FeedError` enum unifies the failure cases of both binaries: I/O, JSON
//! encoding, malformed datagrams, configuration and dataset problems, allowing
//! every crate to propagate a single error type.
use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Unified error type shared by producer and listener.
#[derive(Error, Debug)]
pub enum FeedError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// UTF-8 conversion error when decoding a datagram subject.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] Utf8Error),

    /// Error while parsing the ticker file into `Ticker` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A dataset file required at startup does not exist.
    #[error("Dataset file not found: {}", .0.display())]
    DatasetMissing(PathBuf),

    /// Runtime settings rejected before the publish loop starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialized batch does not fit into a single datagram.
    #[error("Payload of {size} bytes exceeds the {max} byte datagram limit")]
    PayloadTooLarge {
        /// Size of the framed payload.
        size: usize,
        /// Largest payload the transport accepts.
        max: usize,
    },

    /// `run` was called on a publish loop that already reached `Stopped`.
    #[error("Publish loop already stopped")]
    LoopStopped,
}
