//! Feed Listener: a UDP receiver for batches published by `feed_producer`.
//!
//! Every datagram carries one batch framed as `subject\npayload` (see
//! `feed_common::net`). The listener decodes the JSON rows, keeps per-subject
//! totals and logs each batch. A summary is printed on Ctrl+C.
//!
//! Usage example (CLI):
//! ```bash
//! feed_listener --listen-port 8081 --subject meters,stock_values
//! ```
#![warn(missing_docs)]
mod args;
mod batch;
mod stats;

use crate::args::Args;
use crate::batch::ReceivedBatch;
use crate::stats::FeedStats;
use clap::Parser;
use feed_common::net::{MAX_DATAGRAM_SIZE, addr};
use feed_common::{FeedError, Result};
use log::{debug, error, info, warn};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

/// How long a blocking receive waits before re-checking the shutdown flag.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Receive batches from `socket` until `shutdown` is set.
fn start_receiver_loop(
    socket: &UdpSocket,
    args: &Args,
    shutdown: Arc<AtomicBool>,
) -> Result<FeedStats> {
    info!("Feed receiver running on: {}", socket.local_addr()?);
    let mut stats = FeedStats::default();
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        let (size, from) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                continue;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("Receive data error: {}", e);
                return Err(FeedError::Io(e));
            }
        };

        let batch = match ReceivedBatch::decode(&buf[..size]) {
            Ok(batch) => batch,
            Err(e) => {
                stats.reject();
                warn!("Dropping datagram from {}: {}", from, e);
                continue;
            }
        };
        if !args.accepts(batch.subject) {
            debug!("Skipping batch on \"{}\"", batch.subject);
            continue;
        }

        let totals = stats.record(batch.subject, batch.rows.len(), size);
        info!(
            "Received from {} on \"{}\": rows: {}, total rows: {}, batches: {}",
            from,
            batch.subject,
            batch.rows.len(),
            totals.rows,
            totals.batches
        );
        if let Some(first) = batch.rows.first() {
            debug!("First row: {}", first);
        }
    }
    info!("Receiver loop stopping...");
    Ok(stats)
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down listener...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| FeedError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let listen_address = addr(args.listen_ip.trim(), args.listen_port);
    let socket = UdpSocket::bind(&listen_address)?;
    socket.set_read_timeout(Some(READ_TIMEOUT))?;
    if !args.subject.is_empty() {
        info!("Subjects: {:?}", args.subject);
    }
    info!("Listener is running. Press Ctrl+C to exit.");

    let stats = start_receiver_loop(&socket, &args, shutdown)?;
    for (subject, totals) in stats.iter() {
        info!(
            "Subject \"{}\": batches: {}, rows: {}, bytes: {}",
            subject, totals.batches, totals.rows, totals.bytes
        );
    }
    if stats.rejected() > 0 {
        warn!("Rejected datagrams: {}", stats.rejected());
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
