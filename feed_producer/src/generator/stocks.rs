//! Stock ticks with OHLC prices, a quoted spread and normally distributed volume.
//!
//! Each tick picks a ticker from the configured universe, opens inside the
//! ticker's price band and derives every other price from that draw:
//!
//! - `high = open · (1 + U(0, 0.03))`, `low = open · (1 − U(0, 0.03))`
//! - `close = U(low, high)`
//! - `spread = close · 0.001`, `bid = close − spread/2`, `ask = close + spread/2`
//! - `mid = (bid + ask) / 2`
//!
//! Prices are rounded to 2 places and the spread to 4. Volume follows a normal
//! distribution around the ticker's average volume and never drops below one.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use feed_common::FeedError;
use feed_common::reference::{CLIENTS, Ticker};
use rand::Rng;
use serde::Serialize;
use strum::VariantArray;

use crate::generator::MAX_PREALLOC;
use crate::generator::sampling::{DEFAULT_JITTER, box_muller, jittered_now, pick, round_to, uniform};
use crate::publisher::BatchSource;

/// Default number of ticks per batch.
pub const DEFAULT_ROWS: usize = 5;

/// Largest relative move of the session high/low away from the open.
const MAX_RANGE_MOVE: f64 = 0.03;
/// Quoted spread relative to the close.
const SPREAD_RATIO: f64 = 0.001;
/// Volume standard deviation relative to the average volume.
const VOLUME_DEVIATION: f64 = 0.25;

/// A single synthetic market tick.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockTick {
    /// Event time, jittered to simulate out-of-order arrival.
    pub timestamp: DateTime<Utc>,
    /// Trading date of `timestamp`.
    pub date: NaiveDate,
    /// Exchange symbol, e.g. `AAPL.N`.
    pub ticker: String,
    /// Client the tick is attributed to.
    pub client: &'static str,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Last price.
    pub close: f64,
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Midpoint of bid and ask.
    pub mid: f64,
    /// Bid/ask spread in price terms.
    pub spread: f64,
    /// Traded volume.
    pub volume: u64,
}

/// Generate `count` ticks across every known ticker.
pub fn generate(count: usize) -> Vec<StockTick> {
    generate_with(&mut rand::rng(), Ticker::VARIANTS, count, DEFAULT_JITTER)
}

/// Generate `count` ticks for `universe` from the given random source.
///
/// Returns an empty batch when `universe` is empty.
pub fn generate_with<R: Rng + ?Sized>(
    rng: &mut R,
    universe: &[Ticker],
    count: usize,
    max_jitter: TimeDelta,
) -> Vec<StockTick> {
    if universe.is_empty() {
        return Vec::new();
    }
    let mut ticks = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let ticker = *pick(rng, universe);
        ticks.push(tick_for(rng, ticker, max_jitter));
    }
    ticks
}

fn tick_for<R: Rng + ?Sized>(rng: &mut R, ticker: Ticker, max_jitter: TimeDelta) -> StockTick {
    let profile = ticker.profile();

    let open = round_to(uniform(rng, profile.price_low, profile.price_high), 2);
    let high = round_to(open * (1.0 + uniform(rng, 0.0, MAX_RANGE_MOVE)), 2);
    let low = round_to(open * (1.0 - uniform(rng, 0.0, MAX_RANGE_MOVE)), 2);
    let close = round_to(uniform(rng, low, high), 2);

    let spread = round_to(close * SPREAD_RATIO, 4);
    let bid = round_to(close - spread / 2.0, 2);
    let ask = round_to(close + spread / 2.0, 2);
    let mid = round_to((bid + ask) / 2.0, 2);

    let volume = box_muller(rng, profile.avg_volume, profile.avg_volume * VOLUME_DEVIATION)
        .round()
        .max(1.0) as u64;

    let timestamp = jittered_now(rng, max_jitter);
    StockTick {
        timestamp,
        date: timestamp.date_naive(),
        ticker: ticker.symbol(),
        client: *pick(rng, CLIENTS),
        open,
        high,
        low,
        close,
        bid,
        ask,
        mid,
        spread,
        volume,
    }
}

/// Stock batch source emitting a fixed number of ticks per batch.
#[derive(Debug, Clone)]
pub struct StockGenerator {
    universe: Vec<Ticker>,
    rows: usize,
}

impl StockGenerator {
    /// Create a generator over `universe`.
    ///
    /// An empty universe is rejected since no tick could ever be produced.
    pub fn new(universe: Vec<Ticker>, rows: usize) -> Result<Self, FeedError> {
        if universe.is_empty() {
            return Err(FeedError::InvalidConfig("ticker universe is empty".to_string()));
        }
        Ok(Self { universe, rows })
    }

    /// Tickers this generator draws from.
    pub fn universe(&self) -> &[Ticker] {
        &self.universe
    }
}

impl Default for StockGenerator {
    fn default() -> Self {
        Self {
            universe: Ticker::VARIANTS.to_vec(),
            rows: DEFAULT_ROWS,
        }
    }
}

impl BatchSource for StockGenerator {
    type Row = StockTick;

    fn next_batch(&mut self) -> Vec<StockTick> {
        generate_with(&mut rand::rng(), &self.universe, self.rows, DEFAULT_JITTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(count: usize) -> Vec<StockTick> {
        let mut rng = StdRng::seed_from_u64(2024);
        generate_with(&mut rng, Ticker::VARIANTS, count, DEFAULT_JITTER)
    }

    #[test]
    fn generates_exact_count() {
        assert!(generate(0).is_empty());
        assert_eq!(generate(5).len(), 5);
        assert_eq!(seeded(250).len(), 250);
    }

    #[test]
    fn tickers_and_clients_come_from_reference_tables() {
        let symbols: Vec<String> = Ticker::VARIANTS.iter().map(Ticker::symbol).collect();
        for tick in seeded(500) {
            assert!(symbols.contains(&tick.ticker), "{}", tick.ticker);
            assert!(CLIENTS.contains(&tick.client));
        }
    }

    #[test]
    fn derived_prices_follow_their_inputs() {
        for tick in seeded(500) {
            assert_eq!(tick.spread, round_to(tick.close * SPREAD_RATIO, 4));
            assert_eq!(tick.bid, round_to(tick.close - tick.spread / 2.0, 2));
            assert_eq!(tick.ask, round_to(tick.close + tick.spread / 2.0, 2));
            assert_eq!(tick.mid, round_to((tick.bid + tick.ask) / 2.0, 2));
            assert!(tick.low <= tick.open && tick.open <= tick.high);
            assert!(tick.low <= tick.close && tick.close <= tick.high);
            assert!(tick.bid <= tick.ask);
            assert!(tick.volume >= 1);
            assert_eq!(tick.date, tick.timestamp.date_naive());
        }
    }

    #[test]
    fn open_stays_inside_the_ticker_band() {
        let mut rng = StdRng::seed_from_u64(3);
        for tick in generate_with(&mut rng, &[Ticker::TLT], 200, DEFAULT_JITTER) {
            assert_eq!(tick.ticker, "TLT.N");
            let profile = Ticker::TLT.profile();
            assert!(tick.open >= profile.price_low && tick.open <= profile.price_high);
        }
    }

    #[test]
    fn volume_clusters_around_the_average() {
        let mut rng = StdRng::seed_from_u64(77);
        let ticks = generate_with(&mut rng, &[Ticker::NVDA], 5_000, DEFAULT_JITTER);
        let mean = ticks.iter().map(|t| t.volume as f64).sum::<f64>() / ticks.len() as f64;
        let avg = Ticker::NVDA.profile().avg_volume;
        assert!((mean - avg).abs() < avg * 0.02, "mean = {mean}");
    }

    #[test]
    fn empty_universe_is_rejected() {
        assert!(matches!(
            StockGenerator::new(Vec::new(), 5),
            Err(FeedError::InvalidConfig(_))
        ));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_with(&mut rng, &[], 5, DEFAULT_JITTER).is_empty());
    }

    #[test]
    fn source_emits_configured_rows_from_its_universe() {
        let mut source = StockGenerator::new(vec![Ticker::AAPL, Ticker::MSFT], 7).unwrap();
        let batch = source.next_batch();
        assert_eq!(batch.len(), 7);
        assert!(batch.iter().all(|t| t.ticker == "AAPL.N" || t.ticker == "MSFT.N"));
    }
}
