//! Command-line arguments for the feed listener.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use feed_common::net::DATA_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Local address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub listen_ip: String,

    /// Local UDP port producers publish to.
    #[arg(long, default_value_t = DATA_PORT)]
    pub listen_port: u16,

    /// Only report batches published on these subjects.
    /// Subjects may be separated by commas.
    #[arg(long, value_delimiter = ',')]
    pub subject: Vec<String>,
}

impl Args {
    /// Whether batches on `subject` should be reported.
    pub fn accepts(&self, subject: &str) -> bool {
        self.subject.is_empty() || self.subject.iter().any(|s| s == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listens_on_the_data_port_by_default() {
        let args = Args::try_parse_from(["feed_listener"]).unwrap();
        assert_eq!(args.listen_ip, "0.0.0.0");
        assert_eq!(args.listen_port, DATA_PORT);
        assert!(args.accepts("meters"));
    }

    #[test]
    fn subject_filter_accepts_listed_subjects_only() {
        let args =
            Args::try_parse_from(["feed_listener", "--subject", "meters,stock_values"]).unwrap();
        assert!(args.accepts("meters"));
        assert!(args.accepts("stock_values"));
        assert!(!args.accepts("blotter_trades.data_rows"));
    }
}
