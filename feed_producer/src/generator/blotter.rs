//! Capital-markets trade blotter.
//!
//! Blotter rows are either loaded from a dataset file (a JSON array or JSON
//! lines) or synthesized once at startup; in both cases they are replayed
//! through a [`DatasetCursor`].

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use feed_common::FeedError;
use feed_common::reference::{
    BENCHMARKS, BLOTTER_TICKERS, DESKS, EXEC_VENUES, FUNDS, OrderStatus, OrderType, SECTORS,
    Side, TRADERS,
};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::VariantArray;

use crate::generator::MAX_PREALLOC;
use crate::generator::cursor::DatasetCursor;
use crate::generator::sampling::{pick, round_to};

/// Number of synthetic rows built when no dataset file is configured.
pub const DEFAULT_SYNTHETIC_ROWS: usize = 1000;

/// First synthetic trade id.
const FIRST_TRADE_ID: u64 = 100_000;

/// One execution on the blotter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlotterTrade {
    /// Unique execution id.
    pub trade_id: u64,
    /// Trader responsible for the order.
    pub trader: String,
    /// Desk owning the risk.
    pub desk: String,
    /// Event timestamp.
    pub event_ts: DateTime<Utc>,
    /// Exchange symbol.
    pub symbol: String,
    /// Full security name.
    pub security_name: String,
    /// GICS sector.
    pub sector_gics: String,
    /// BUY or SELL.
    pub side: Side,
    /// Order style.
    pub order_type: OrderType,
    /// Requested quantity.
    pub order_qty: u32,
    /// Lifecycle state.
    pub order_status: OrderStatus,
    /// Price cap/floor of the order.
    pub limit_price: f64,
    /// Executed quantity.
    pub qty: u32,
    /// Execution price.
    pub price: f64,
    /// Notional value of the fill.
    pub trade_value: f64,
    /// Broker commission.
    pub commission: f64,
    /// Executing venue.
    pub exec_venue: String,
    /// Exchange/regulatory fee.
    pub venue_fee: f64,
    /// Best bid at event time.
    pub bid_price: f64,
    /// Best ask at event time.
    pub ask_price: f64,
    /// Midpoint of bid and ask.
    pub mid_price: f64,
    /// Bid/ask spread in price terms.
    pub spread_price: f64,
    /// Session high.
    pub high_day: f64,
    /// Session low.
    pub low_day: f64,
    /// Fund receiving the trade.
    pub fund: String,
    /// Performance benchmark.
    pub benchmark_index: String,
}

/// Generate `count` synthetic blotter trades.
pub fn generate(count: usize) -> Vec<BlotterTrade> {
    generate_with(&mut rand::rng(), count)
}

/// Generate `count` synthetic blotter trades from the given random source.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<BlotterTrade> {
    let mut trades = Vec::with_capacity(count.min(MAX_PREALLOC));
    for index in 0..count {
        trades.push(trade_for(rng, FIRST_TRADE_ID + index as u64));
    }
    trades
}

fn trade_for<R: Rng + ?Sized>(rng: &mut R, trade_id: u64) -> BlotterTrade {
    let ticker = *pick(rng, BLOTTER_TICKERS);
    let base_price = 100.0 + rng.random::<f64>() * 400.0;
    let qty: u32 = 100 + rng.random_range(0..1000);

    let price = round_to(base_price + (rng.random::<f64>() - 0.5) * 10.0, 2);
    let spread_price = round_to(price * 0.001, 4);
    let bid_price = round_to(price - spread_price / 2.0, 2);
    let ask_price = round_to(price + spread_price / 2.0, 2);
    let mid_price = round_to((bid_price + ask_price) / 2.0, 2);
    let trade_value = round_to(qty as f64 * price, 2);

    BlotterTrade {
        trade_id,
        trader: pick(rng, TRADERS).to_string(),
        desk: pick(rng, DESKS).to_string(),
        event_ts: trading_session_ts(rng),
        symbol: ticker.symbol(),
        security_name: ticker.security_name().to_string(),
        sector_gics: pick(rng, SECTORS).to_string(),
        side: *pick(rng, Side::VARIANTS),
        order_type: *pick(rng, OrderType::VARIANTS),
        order_qty: qty,
        order_status: *pick(rng, OrderStatus::VARIANTS),
        limit_price: round_to(price * (1.0 + (rng.random::<f64>() - 0.5) * 0.02), 2),
        qty,
        price,
        trade_value,
        commission: round_to(trade_value * 0.001, 4),
        exec_venue: pick(rng, EXEC_VENUES).to_string(),
        venue_fee: round_to(trade_value * 0.0005, 4),
        bid_price,
        ask_price,
        mid_price,
        spread_price,
        high_day: round_to(price * (1.0 + rng.random::<f64>() * 0.05), 2),
        low_day: round_to(price * (1.0 - rng.random::<f64>() * 0.05), 2),
        fund: pick(rng, FUNDS).to_string(),
        benchmark_index: pick(rng, BENCHMARKS).to_string(),
    }
}

/// A moment within the last 30 days between 09:00 and 16:00 UTC.
fn trading_session_ts<R: Rng + ?Sized>(rng: &mut R) -> DateTime<Utc> {
    let day = (Utc::now() - TimeDelta::days(rng.random_range(0..30))).date_naive();
    let offset = TimeDelta::hours(rng.random_range(9..16))
        + TimeDelta::minutes(rng.random_range(0..60))
        + TimeDelta::seconds(rng.random_range(0..60))
        + TimeDelta::milliseconds(rng.random_range(0..1000));
    day.and_time(NaiveTime::default()).and_utc() + offset
}

impl DatasetCursor<BlotterTrade> {
    /// Load blotter trades from `path`.
    ///
    /// The file holds either a JSON array of trades or one JSON trade per line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FeedError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FeedError::DatasetMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let records: Vec<BlotterTrade> = if content.trim_start().starts_with('[') {
            serde_json::from_str(&content)?
        } else {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(serde_json::from_str::<BlotterTrade>)
                .collect::<Result<Vec<_>, _>>()?
        };
        info!("Loaded {} blotter records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }

    /// Build a dataset of `rows` synthetic trades.
    pub fn synthetic(rows: usize) -> Self {
        let records = generate(rows);
        info!("Generated {} synthetic blotter records", records.len());
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn seeded(count: usize) -> Vec<BlotterTrade> {
        generate_with(&mut StdRng::seed_from_u64(99), count)
    }

    #[test]
    fn generates_exact_count_with_sequential_ids() {
        assert!(generate(0).is_empty());
        let trades = seeded(25);
        assert_eq!(trades.len(), 25);
        for (i, trade) in trades.iter().enumerate() {
            assert_eq!(trade.trade_id, FIRST_TRADE_ID + i as u64);
        }
    }

    #[test]
    fn categorical_fields_come_from_reference_tables() {
        let symbols: Vec<String> = BLOTTER_TICKERS.iter().map(|t| t.symbol()).collect();
        for trade in seeded(500) {
            assert!(symbols.contains(&trade.symbol));
            assert!(TRADERS.contains(&trade.trader.as_str()));
            assert!(DESKS.contains(&trade.desk.as_str()));
            assert!(SECTORS.contains(&trade.sector_gics.as_str()));
            assert!(EXEC_VENUES.contains(&trade.exec_venue.as_str()));
            assert!(FUNDS.contains(&trade.fund.as_str()));
            assert!(BENCHMARKS.contains(&trade.benchmark_index.as_str()));
        }
    }

    #[test]
    fn derived_fields_follow_their_inputs() {
        for trade in seeded(500) {
            assert_eq!(trade.trade_value, round_to(trade.qty as f64 * trade.price, 2));
            assert_eq!(trade.spread_price, round_to(trade.price * 0.001, 4));
            assert_eq!(trade.bid_price, round_to(trade.price - trade.spread_price / 2.0, 2));
            assert_eq!(trade.ask_price, round_to(trade.price + trade.spread_price / 2.0, 2));
            assert_eq!(trade.mid_price, round_to((trade.bid_price + trade.ask_price) / 2.0, 2));
            assert_eq!(trade.commission, round_to(trade.trade_value * 0.001, 4));
            assert_eq!(trade.venue_fee, round_to(trade.trade_value * 0.0005, 4));
            assert_eq!(trade.order_qty, trade.qty);
            assert!((100..1100).contains(&trade.qty));
            assert!(trade.low_day <= trade.price && trade.price <= trade.high_day);
        }
    }

    #[test]
    fn event_ts_falls_inside_a_trading_session() {
        use chrono::Timelike;
        let now = Utc::now();
        for trade in seeded(300) {
            assert!((9..16).contains(&trade.event_ts.hour()));
            assert!(trade.event_ts > now - TimeDelta::days(31));
        }
    }

    #[test]
    fn loads_json_array_dataset() {
        let trades = seeded(4);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&serde_json::to_vec(&trades).unwrap()).unwrap();

        let cursor = DatasetCursor::<BlotterTrade>::load(file.path()).unwrap();
        assert_eq!(cursor.len(), trades.len());
        for (loaded, original) in cursor.records().iter().zip(&trades) {
            assert_eq!(loaded.trade_id, original.trade_id);
            assert_eq!(loaded.symbol, original.symbol);
            assert_eq!(loaded.event_ts, original.event_ts);
            assert_eq!(loaded.side, original.side);
        }
    }

    #[test]
    fn loads_json_lines_dataset() {
        let trades = seeded(3);
        let mut file = NamedTempFile::new().unwrap();
        for trade in &trades {
            writeln!(file, "{}", serde_json::to_string(trade).unwrap()).unwrap();
        }
        writeln!(file).unwrap();

        let mut cursor = DatasetCursor::<BlotterTrade>::load(file.path()).unwrap();
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.next_chunk(4)[3].trade_id, trades[0].trade_id);
    }

    #[test]
    fn missing_dataset_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blotter.jsonl");
        let err = DatasetCursor::<BlotterTrade>::load(&path).unwrap_err();
        assert!(matches!(err, FeedError::DatasetMissing(p) if p == path));
    }

    #[test]
    fn malformed_dataset_is_a_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"trade_id\": 1}}").unwrap();
        let err = DatasetCursor::<BlotterTrade>::load(file.path()).unwrap_err();
        assert!(matches!(err, FeedError::SerdeJson(_)));
    }

    #[test]
    fn synthetic_dataset_has_requested_rows() {
        let cursor = DatasetCursor::<BlotterTrade>::synthetic(12);
        assert_eq!(cursor.len(), 12);
        assert_eq!(cursor.position(), 0);
    }
}
