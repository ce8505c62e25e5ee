//! Power meter readings.

use chrono::{DateTime, Utc};
use feed_common::reference::{LOCATIONS, Phase};
use rand::Rng;
use serde::Serialize;
use strum::VariantArray;

use crate::generator::MAX_PREALLOC;
use crate::generator::sampling::{pick, round_to};
use crate::publisher::BatchSource;

/// Default upper bound of rows per meter batch.
pub const DEFAULT_MAX_ROWS: usize = 10;

/// One reading of a power line meter.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeterReading {
    /// Time of the reading.
    pub ts: DateTime<Utc>,
    /// Line current in amperes.
    pub current: f64,
    /// Line voltage in volts, between 200 and 225.
    pub voltage: u32,
    /// Line phase.
    pub phase: Phase,
    /// Meter location.
    pub location: &'static str,
}

/// Generate `count` meter readings.
pub fn generate(count: usize) -> Vec<MeterReading> {
    generate_with(&mut rand::rng(), count)
}

/// Generate `count` meter readings from the given random source.
///
/// A single load modifier is drawn per batch so readings of one batch share
/// the same load level.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<MeterReading> {
    let modifier = rng.random::<f64>() * (rng.random::<f64>() * 50.0 + 1.0);
    let ts = Utc::now();
    let mut readings = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let current = rng.random_range(0.0..75.0) + rng.random_range(0.0..10.0) * modifier;
        readings.push(MeterReading {
            ts,
            current: round_to(current, 4),
            voltage: 200 + rng.random_range(0..=25),
            phase: *pick(rng, Phase::VARIANTS),
            location: *pick(rng, LOCATIONS),
        });
    }
    readings
}

/// Meter batch source producing between one and `max_rows` readings per batch.
#[derive(Debug, Clone)]
pub struct MeterGenerator {
    max_rows: usize,
}

impl MeterGenerator {
    /// Create a generator; `max_rows` below one is raised to one.
    pub fn new(max_rows: usize) -> Self {
        Self {
            max_rows: max_rows.max(1),
        }
    }
}

impl Default for MeterGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROWS)
    }
}

impl BatchSource for MeterGenerator {
    type Row = MeterReading;

    fn next_batch(&mut self) -> Vec<MeterReading> {
        let mut rng = rand::rng();
        let count = rng.random_range(1..=self.max_rows);
        generate_with(&mut rng, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generates_exact_count() {
        assert!(generate(0).is_empty());
        assert_eq!(generate(1).len(), 1);
        assert_eq!(generate(37).len(), 37);
    }

    #[test]
    fn readings_stay_within_reference_tables_and_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for reading in generate_with(&mut rng, 500) {
            assert!(LOCATIONS.contains(&reading.location));
            assert!(Phase::VARIANTS.contains(&reading.phase));
            assert!((200..=225).contains(&reading.voltage));
            assert!(reading.current >= 0.0);
            assert!(reading.current < 75.0 + 10.0 * 51.0);
        }
    }

    #[test]
    fn batch_size_is_between_one_and_max_rows() {
        let mut source = MeterGenerator::new(4);
        for _ in 0..200 {
            let len = source.next_batch().len();
            assert!((1..=4).contains(&len), "len = {len}");
        }
    }

    #[test]
    fn zero_max_rows_still_yields_rows() {
        let mut source = MeterGenerator::new(0);
        assert_eq!(source.next_batch().len(), 1);
    }

    #[test]
    fn serializes_phase_and_timestamp_as_text() {
        let mut rng = StdRng::seed_from_u64(9);
        let json = serde_json::to_value(generate_with(&mut rng, 1)).unwrap();
        let row = &json[0];
        assert!(row["phase"].is_string());
        assert!(row["ts"].as_str().unwrap().contains('T'));
        assert!(row["location"].is_string());
    }
}
