//! Destinations for published batches.
//!
//! A [`Sink`] receives one serialized batch per tick together with the subject
//! it is published on. Sinks are opened once before the publish loop starts
//! and closed once after it stops.

use feed_common::FeedError;
use feed_common::Result;
use feed_common::net::{MAX_DATAGRAM_SIZE, frame};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::Path;

/// Receiver of serialized batches.
pub trait Sink {
    /// Publish `payload` on `subject`.
    fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<()>;

    /// Release held resources. Called once, after the last publish.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<()> {
        (**self).publish(subject, payload)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Sends each batch as one UDP datagram framed as `subject\npayload`.
pub struct UdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSink {
    /// Bind an ephemeral local socket and connect it to `target`.
    pub fn connect<A: ToSocketAddrs>(target: A) -> Result<Self> {
        let target = target
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| FeedError::Format("target address did not resolve".to_string()))?;
        let bind_addr = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(target)?;
        info!("UDP sink {} -> {}", socket.local_addr()?, target);
        Ok(Self { socket, target })
    }

    /// Address datagrams are sent to.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Sink for UdpSink {
    fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<()> {
        let datagram = frame(subject, payload);
        if datagram.len() > MAX_DATAGRAM_SIZE {
            return Err(FeedError::PayloadTooLarge {
                size: datagram.len(),
                max: MAX_DATAGRAM_SIZE,
            });
        }
        self.socket.send(&datagram)?;
        debug!("Sent {} bytes to {}", datagram.len(), self.target);
        Ok(())
    }
}

/// Appends one `subject<TAB>payload` line per batch to a file.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it when missing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("File sink writing to {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Sink for FileSink {
    fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<()> {
        self.writer.write_all(subject.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(payload)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs every batch instead of sending it anywhere.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn publish(&mut self, subject: &str, payload: &[u8]) -> Result<()> {
        info!("{}: {}", subject, String::from_utf8_lossy(payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_common::net::split_frame;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn udp_sink_sends_framed_batches() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let mut sink = UdpSink::connect(receiver.local_addr().unwrap()).unwrap();

        sink.publish("meters", br#"[{"voltage":201}]"#).unwrap();

        let mut buf = [0u8; 1024];
        let size = receiver.recv(&mut buf).unwrap();
        let (subject, payload) = split_frame(&buf[..size]).unwrap();
        assert_eq!(subject, "meters");
        assert_eq!(payload, br#"[{"voltage":201}]"#);
    }

    #[test]
    fn udp_sink_rejects_oversized_batches() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut sink = UdpSink::connect(receiver.local_addr().unwrap()).unwrap();
        let payload = vec![b'x'; MAX_DATAGRAM_SIZE];
        let err = sink.publish("blotter", &payload).unwrap_err();
        assert!(matches!(err, FeedError::PayloadTooLarge { max: MAX_DATAGRAM_SIZE, .. }));
    }

    #[test]
    fn udp_sink_rejects_unresolvable_target() {
        assert!(UdpSink::connect("not a socket address").is_err());
    }

    #[test]
    fn file_sink_appends_one_line_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.jsonl");

        let mut sink = FileSink::create(&path).unwrap();
        sink.publish("stock_values", b"[1,2]").unwrap();
        sink.publish("stock_values", b"[3]").unwrap();
        sink.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "stock_values\t[1,2]\nstock_values\t[3]\n");
    }

    #[test]
    fn boxed_sink_forwards_calls() {
        let mut sink: Box<dyn Sink + Send> = Box::new(ConsoleSink);
        assert!(sink.publish("meters", b"[]").is_ok());
        assert!(sink.close().is_ok());
    }
}
