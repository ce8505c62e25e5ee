//! Synthetic feed producer.
//!
//! This binary generates synthetic rows and publishes them in batches to a sink on a
//! fixed interval, stopping after a fixed run time. It wires together three building
//! blocks from the library crate:
//!
//! - A `BatchSource`: `MeterGenerator`, `StockGenerator`, or a `DatasetCursor` over
//!   blotter trades, chosen by the subcommand.
//! - A `Sink`: UDP datagrams (default, see `feed_common::net`), a local file, or the log.
//! - `PublishLoop`: the timer-driven loop that encodes every batch as JSON, publishes
//!   it, and keeps the running total.
//!
//! Setup failures (unresolvable target, missing dataset or ticker file, empty ticker
//! universe) abort the run. Failures of a single batch are logged and the loop moves on.
//! Ctrl+C stops the loop early; the sink is closed either way.
//!
//! Usage example (CLI):
//! ```bash
//! feed_producer --target 127.0.0.1:8081 --duration-ms 60000 stocks --tickers aapl,msft
//! feed_producer --sink file --out blotter.jsonl blotter --chunk-size 25
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::{Args, Dataset, SinkKind};
use clap::Parser;
use feed_common::reference::{Ticker, TickerParser};
use feed_common::{FeedError, Result};
use feed_producer::generator::blotter::BlotterTrade;
use feed_producer::generator::{DatasetCursor, MeterGenerator, StockGenerator};
use feed_producer::{BatchSource, ConsoleSink, FileSink, PublishConfig, PublishLoop, Sink, UdpSink};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use strum::VariantArray;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let config = PublishConfig {
        subject: args
            .subject
            .clone()
            .unwrap_or_else(|| args.dataset.default_subject().to_string()),
        interval: Duration::from_millis(
            args.interval_ms
                .unwrap_or_else(|| args.dataset.default_interval_ms()),
        ),
        duration: Duration::from_millis(args.duration_ms),
    };
    config.validate()?;
    info!(
        "Configuration: subject={}, interval={:?}, duration={:?}",
        config.subject, config.interval, config.duration
    );

    let sink = open_sink(&args)?;

    match args.dataset {
        Dataset::Meters { max_rows } => {
            publish(config, MeterGenerator::new(max_rows as usize), sink)
        }
        Dataset::Stocks {
            rows,
            tickers_file,
            tickers,
        } => {
            let universe = match tickers_file {
                Some(path) => load_tickers(&path)?,
                None if tickers.is_empty() => Ticker::VARIANTS.to_vec(),
                None => tickers,
            };
            info!("Tickers: {:?}", universe);
            publish(config, StockGenerator::new(universe, rows as usize)?, sink)
        }
        Dataset::Blotter {
            chunk_size,
            dataset,
            synthetic_rows,
        } => {
            let cursor = match dataset {
                Some(path) => DatasetCursor::<BlotterTrade>::load(path)?,
                None => DatasetCursor::<BlotterTrade>::synthetic(synthetic_rows as usize),
            };
            if cursor.is_empty() {
                warn!("Blotter dataset is empty; nothing will be published");
            }
            publish(config, cursor.with_chunk_size(chunk_size as usize), sink)
        }
    }
}

/// Open the configured sink; failures here abort the run.
fn open_sink(args: &Args) -> Result<Box<dyn Sink + Send>> {
    let sink: Box<dyn Sink + Send> = match args.sink {
        SinkKind::Udp => Box::new(UdpSink::connect(args.target.as_str())?),
        SinkKind::File => Box::new(FileSink::create(&args.out)?),
        SinkKind::Console => Box::new(ConsoleSink),
    };
    Ok(sink)
}

/// Read the ticker universe from a file.
fn load_tickers(path: &Path) -> Result<Vec<Ticker>> {
    if !path.is_file() {
        return Err(FeedError::DatasetMissing(path.to_path_buf()));
    }
    let tickers = Ticker::parse_from_file(BufReader::new(File::open(path)?))?;
    if tickers.is_empty() {
        return Err(FeedError::ParseTickersFile(format!(
            "{} contains no tickers",
            path.display()
        )));
    }
    Ok(tickers)
}

/// Run the publish loop to completion, stopping early on Ctrl+C.
fn publish<B: BatchSource>(
    config: PublishConfig,
    source: B,
    sink: Box<dyn Sink + Send>,
) -> Result<()> {
    let mut publisher = PublishLoop::new(config, source, sink);
    let stopper = publisher.stopper();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down producer...");
        stopper.stop();
    })
    .map_err(|e| FeedError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let report = publisher.run()?;
    info!(
        "Total rows published: {} in {:?} ({} of {} ticks failed)",
        report.total_published, report.elapsed, report.failed_ticks, report.ticks
    );
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
