//! Command-line arguments for the feed producer.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand, ValueEnum};
use feed_common::net::{DATA_PORT, addr};
use feed_common::reference::Ticker;
use std::path::PathBuf;

/// Largest accepted number of rows per batch.
pub const MAX_BATCH_ROWS: u64 = 100_000;

/// Largest accepted number of synthetic blotter rows.
pub const MAX_SYNTHETIC_ROWS: u64 = 1_000_000;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Where published batches go.
    #[arg(long, value_enum, default_value_t = SinkKind::Udp)]
    pub sink: SinkKind,

    /// UDP target of the `udp` sink.
    #[arg(long, default_value_t = addr("127.0.0.1", DATA_PORT))]
    pub target: String,

    /// Output file of the `file` sink.
    #[arg(long, default_value = "feed.jsonl")]
    pub out: PathBuf,

    /// Subject to publish on; defaults to the dataset's own subject.
    #[arg(long)]
    pub subject: Option<String>,

    /// Milliseconds between batches; defaults to the dataset's own interval.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Total run time in milliseconds.
    #[arg(long, default_value_t = 30 * 60 * 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration_ms: u64,

    /// Dataset to publish.
    #[command(subcommand)]
    pub dataset: Dataset,
}

/// Supported sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Subject-framed UDP datagrams.
    Udp,
    /// Append to a local file.
    File,
    /// Log to stdout.
    Console,
}

/// Datasets the producer can publish.
#[derive(Debug, Subcommand)]
pub enum Dataset {
    /// Power meter readings, a random number of rows per batch.
    Meters {
        /// Upper bound of rows per batch.
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=MAX_BATCH_ROWS))]
        max_rows: u64,
    },
    /// Stock ticks for a universe of tickers.
    Stocks {
        /// Rows per batch.
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=MAX_BATCH_ROWS))]
        rows: u64,

        /// Text file with tickers separated by commas, spaces, or new lines.
        #[arg(long, conflicts_with = "tickers")]
        tickers_file: Option<PathBuf>,

        /// Tickers to publish; all known tickers when omitted.
        #[arg(long, value_enum, value_delimiter = ',')]
        tickers: Vec<Ticker>,
    },
    /// Trade blotter replayed from a dataset.
    Blotter {
        /// Rows per batch.
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=MAX_BATCH_ROWS))]
        chunk_size: u64,

        /// JSON array or JSON-lines file of blotter trades.
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Rows to synthesize when no dataset file is given.
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..=MAX_SYNTHETIC_ROWS))]
        synthetic_rows: u64,
    },
}

impl Dataset {
    /// Subject used when `--subject` is not given.
    pub fn default_subject(&self) -> &'static str {
        match self {
            Dataset::Meters { .. } => "meters",
            Dataset::Stocks { .. } => "stock_values",
            Dataset::Blotter { .. } => "blotter_trades.data_rows",
        }
    }

    /// Interval used when `--interval-ms` is not given.
    pub fn default_interval_ms(&self) -> u64 {
        match self {
            Dataset::Meters { .. } | Dataset::Stocks { .. } => 250,
            Dataset::Blotter { .. } => 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_dataset() {
        let args = Args::try_parse_from(["feed_producer", "blotter"]).unwrap();
        assert_eq!(args.sink, SinkKind::Udp);
        assert_eq!(args.target, "127.0.0.1:8081");
        assert_eq!(args.duration_ms, 1_800_000);
        assert_eq!(args.dataset.default_subject(), "blotter_trades.data_rows");
        assert_eq!(args.dataset.default_interval_ms(), 300);
        assert!(matches!(
            args.dataset,
            Dataset::Blotter { chunk_size: 10, dataset: None, synthetic_rows: 1000 }
        ));
    }

    #[test]
    fn parses_ticker_list() {
        let args = Args::try_parse_from([
            "feed_producer",
            "--sink",
            "console",
            "stocks",
            "--tickers",
            "aapl,msft",
        ])
        .unwrap();
        assert_eq!(args.sink, SinkKind::Console);
        match args.dataset {
            Dataset::Stocks { rows, tickers, tickers_file } => {
                assert_eq!(rows, 5);
                assert_eq!(tickers, vec![Ticker::AAPL, Ticker::MSFT]);
                assert!(tickers_file.is_none());
            }
            other => panic!("unexpected dataset {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(Args::try_parse_from(["feed_producer", "--interval-ms", "0", "meters"]).is_err());
        assert!(Args::try_parse_from(["feed_producer", "meters", "--max-rows", "0"]).is_err());
    }

    #[test]
    fn rejects_batch_sizes_above_the_limit() {
        let too_many = (MAX_BATCH_ROWS + 1).to_string();
        for dataset in [["meters", "--max-rows"], ["stocks", "--rows"], ["blotter", "--chunk-size"]] {
            let args = ["feed_producer", dataset[0], dataset[1], too_many.as_str()];
            assert!(Args::try_parse_from(args).is_err(), "{dataset:?}");
        }
        let limit = MAX_BATCH_ROWS.to_string();
        assert!(Args::try_parse_from(["feed_producer", "stocks", "--rows", limit.as_str()]).is_ok());
        assert!(
            Args::try_parse_from(["feed_producer", "blotter", "--synthetic-rows", "1000001"]).is_err()
        );
    }
}
