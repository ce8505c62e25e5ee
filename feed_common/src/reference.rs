//! Reference tables shared by the generators.
//!
//! Every categorical field of a generated row is drawn from one of these
//! tables. They are immutable, non-empty and process-wide.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use strum_macros::{Display, EnumString, VariantArray};

use crate::error::FeedError;

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Tickers may be separated by new lines, commas or spaces and are matched
    /// case-insensitively. Returns an error if any token cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, FeedError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, FeedError> {
        let mut tickers = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(FeedError::Io)?;
            for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if token.is_empty() {
                    continue;
                }
                match token.parse::<Self>() {
                    Ok(ticker) => {
                        if !tickers.contains(&ticker) {
                            tickers.push(ticker);
                        }
                    }
                    Err(e) => {
                        return Err(FeedError::ParseTickersFile(format!("{}: {}", token, e)));
                    }
                }
            }
        }
        Ok(tickers)
    }
}

/// Price band and liquidity of a listed security.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerProfile {
    /// Lower bound of the synthetic price range.
    pub price_low: f64,
    /// Upper bound (exclusive) of the synthetic price range.
    pub price_high: f64,
    /// Mean of the per-tick volume distribution.
    pub avg_volume: f64,
}

/// Set of securities the stock generators draw from.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    VariantArray,
    Hash,
    Eq,
    PartialEq,
)]
#[value(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AAPL,
    AMZN,
    QQQ,
    NVDA,
    TSLA,
    FB,
    MSFT,
    TLT,
    XIV,
    YY,
    CSCO,
    GOOGL,
    PCLN,
    NFLX,
    META,
}

impl Ticker {
    /// Exchange symbol as published, e.g. `AAPL.N`.
    pub fn symbol(&self) -> String {
        format!("{}.N", self)
    }

    /// Full security name.
    pub fn security_name(&self) -> &'static str {
        match self {
            Ticker::AAPL => "Apple Inc.",
            Ticker::AMZN => "Amazon.com Inc.",
            Ticker::QQQ => "Invesco QQQ Trust",
            Ticker::NVDA => "NVIDIA Corporation",
            Ticker::TSLA => "Tesla Inc.",
            Ticker::FB => "Facebook Inc.",
            Ticker::MSFT => "Microsoft Corporation",
            Ticker::TLT => "iShares 20+ Year Treasury Bond ETF",
            Ticker::XIV => "VelocityShares Daily Inverse VIX ETN",
            Ticker::YY => "JOYY Inc.",
            Ticker::CSCO => "Cisco Systems Inc.",
            Ticker::GOOGL => "Alphabet Inc.",
            Ticker::PCLN => "Priceline Group Inc.",
            Ticker::NFLX => "Netflix Inc.",
            Ticker::META => "Meta Platforms Inc.",
        }
    }

    /// Price range and average volume used by the stock tick generator.
    pub fn profile(&self) -> TickerProfile {
        let (price_low, price_high, avg_volume) = match self {
            Ticker::AAPL => (170.0, 230.0, 55_000.0),
            Ticker::AMZN => (150.0, 200.0, 40_000.0),
            Ticker::QQQ => (400.0, 480.0, 45_000.0),
            Ticker::NVDA => (100.0, 140.0, 90_000.0),
            Ticker::TSLA => (180.0, 280.0, 95_000.0),
            Ticker::FB => (150.0, 210.0, 20_000.0),
            Ticker::MSFT => (390.0, 450.0, 22_000.0),
            Ticker::TLT => (85.0, 100.0, 30_000.0),
            Ticker::XIV => (10.0, 40.0, 12_000.0),
            Ticker::YY => (30.0, 60.0, 1_500.0),
            Ticker::CSCO => (45.0, 60.0, 18_000.0),
            Ticker::GOOGL => (140.0, 190.0, 28_000.0),
            Ticker::PCLN => (1_700.0, 2_100.0, 800.0),
            Ticker::NFLX => (600.0, 750.0, 4_000.0),
            Ticker::META => (480.0, 600.0, 16_000.0),
        };
        TickerProfile {
            price_low,
            price_high,
            avg_volume,
        }
    }
}

/// Securities traded on the synthetic blotter.
pub const BLOTTER_TICKERS: &[Ticker] = &[
    Ticker::AAPL,
    Ticker::MSFT,
    Ticker::GOOGL,
    Ticker::AMZN,
    Ticker::TSLA,
    Ticker::NVDA,
    Ticker::META,
    Ticker::NFLX,
];

/// Power line phase of a meter.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, VariantArray, Hash, Eq, PartialEq)]
pub enum Phase {
    A,
    B,
    C,
}

/// Direction of a trade.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, VariantArray, Hash, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Order style.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, VariantArray, Hash, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Limit,
    Market,
    Stop,
    StopLimit,
}

/// Order lifecycle state.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, VariantArray, Hash, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
}

/// Meter locations.
pub const LOCATIONS: &[&str] = &[
    "San Francisco",
    "Los Angeles",
    "San Diego",
    "San Jose",
    "Palo Alto",
    "Campbell",
    "Mountain View",
    "Sunnyvale",
    "Santa Clara",
    "Cupertino",
];

/// Clients attached to stock ticks.
pub const CLIENTS: &[&str] = &[
    "Homer", "Marge", "Bart", "Lisa", "Maggie", "Moe", "Lenny", "Carl", "Krusty",
];

/// Blotter traders.
pub const TRADERS: &[&str] = &[
    "Alice_Chen",
    "Bob_Johnson",
    "Carol_Smith",
    "David_Wilson",
    "Eva_Rodriguez",
    "Frank_Kim",
];

/// Trading desks owning the risk.
pub const DESKS: &[&str] = &["Equity_Desk", "Options_Desk", "Fixed_Income", "Derivatives"];

/// Executing venues.
pub const EXEC_VENUES: &[&str] = &["NYSE", "NASDAQ", "BATS", "IEX", "ARCA"];

/// Funds receiving trades.
pub const FUNDS: &[&str] = &["Growth_Fund", "Value_Fund", "Index_Fund", "Sector_Fund"];

/// Performance benchmarks.
pub const BENCHMARKS: &[&str] = &["S&P_500", "NASDAQ_100", "RUSSELL_2000", "DOW_JONES"];

/// GICS sectors.
pub const SECTORS: &[&str] = &["Technology", "Healthcare", "Financial", "Consumer", "Industrial"];
