//! Random sampling primitives shared by the row generators.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use std::f64::consts::PI;

/// Largest offset applied by [`jittered_now`] when simulating out-of-order arrival.
pub const DEFAULT_JITTER: TimeDelta = TimeDelta::seconds(5);

/// Uniformly pick one entry of a reference table.
///
/// Reference tables are never empty; an empty slice is a programming error and panics.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, table: &'a [T]) -> &'a T {
    &table[rng.random_range(0..table.len())]
}

/// Uniform draw from `[low, high)`; collapses to `low` when the range is empty.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    rng.random_range(low..high)
}

/// Normally distributed sample using the Box–Muller transform.
///
/// Zero draws are rejected so that `ln(u)` stays finite.
pub fn box_muller<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let mut u: f64 = 0.0;
    while u == 0.0 {
        u = rng.random();
    }
    let mut v: f64 = 0.0;
    while v == 0.0 {
        v = rng.random();
    }
    let num = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();
    mean + num * std_dev
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Current wall-clock time shifted by a uniform offset in `[-max_jitter, +max_jitter]`.
pub fn jittered_now<R: Rng + ?Sized>(rng: &mut R, max_jitter: TimeDelta) -> DateTime<Utc> {
    let max_ms = max_jitter.num_milliseconds().abs();
    Utc::now() + TimeDelta::milliseconds(rng.random_range(-max_ms..=max_ms))
}
