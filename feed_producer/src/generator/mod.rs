//! Synthetic row generators.
//!
//! - `sampling` — uniform/normal draws, rounding and timestamp jitter.
//! - `meters` — power meter readings.
//! - `stocks` — stock ticks with derived bid/ask/mid prices.
//! - `blotter` — trade blotter rows, loaded from a file or synthesized.
//! - `cursor` — wrap-around reader over a preloaded dataset.

pub mod blotter;
pub mod cursor;
pub mod meters;
pub mod sampling;
pub mod stocks;

/// Upper bound on rows reserved up front for a single batch.
pub(crate) const MAX_PREALLOC: usize = 4096;

pub use blotter::BlotterTrade;
pub use cursor::DatasetCursor;
pub use meters::{MeterGenerator, MeterReading};
pub use stocks::{StockGenerator, StockTick};
