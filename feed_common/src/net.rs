//! Shared networking constants and helpers used by producer and listener.
//!
//! Every published batch travels as a single UDP datagram laid out as
//! `<subject>\n<payload>`, where the payload is the JSON-encoded batch.

use crate::error::FeedError;

/// UDP port the listener binds and the producer targets by default.
pub const DATA_PORT: u16 = 8081;

/// Largest UDP payload that fits into a single IPv4 datagram.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Separator between the subject and the payload.
const SUBJECT_SEPARATOR: u8 = b'\n';

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Build a datagram carrying `payload` on `subject`.
pub fn frame(subject: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(subject.len() + 1 + payload.len());
    buf.extend_from_slice(subject.as_bytes());
    buf.push(SUBJECT_SEPARATOR);
    buf.extend_from_slice(payload);
    buf
}

/// Split a datagram built by [`frame`] back into subject and payload.
///
/// Fails when the separator is missing, the subject is empty, or the subject is
/// not valid UTF-8.
pub fn split_frame(datagram: &[u8]) -> Result<(&str, &[u8]), FeedError> {
    let pos = datagram
        .iter()
        .position(|b| *b == SUBJECT_SEPARATOR)
        .ok_or_else(|| FeedError::Format("datagram has no subject separator".to_string()))?;
    let subject = std::str::from_utf8(&datagram[..pos])?;
    if subject.is_empty() {
        return Err(FeedError::Format("datagram subject is empty".to_string()));
    }
    Ok((subject, &datagram[pos + 1..]))
}
