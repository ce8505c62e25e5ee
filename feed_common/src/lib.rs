//!
//! Common types and utilities shared by the feed producer and listener.
//!
//! This crate aggregates:
//! - `error` — unified error type `FeedError` used across the workspace.
//! - `result` — handy `Result<T, FeedError>` alias.
//! - `reference` — immutable reference tables that generated rows draw from.
//! - `net` — networking constants and the subject/payload datagram framing.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod reference;
pub mod result;

pub use error::FeedError;
pub use result::Result;
