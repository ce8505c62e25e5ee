//! Decoding of received datagrams into batches of rows.
use feed_common::net::split_frame;
use feed_common::{FeedError, Result};
use serde_json::Value;

/// One batch as it arrived on the wire.
#[derive(Debug)]
pub struct ReceivedBatch<'a> {
    /// Subject the batch was published on.
    pub subject: &'a str,
    /// Rows of the batch, kept as untyped JSON.
    pub rows: Vec<Value>,
}

impl<'a> ReceivedBatch<'a> {
    /// Decode a `subject\npayload` datagram whose payload is a JSON array.
    pub fn decode(datagram: &'a [u8]) -> Result<Self> {
        let (subject, payload) = split_frame(datagram)?;
        match serde_json::from_slice::<Value>(payload)? {
            Value::Array(rows) => Ok(Self { subject, rows }),
            other => Err(FeedError::Format(format!(
                "expected a JSON array on \"{}\", got {}",
                subject,
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
