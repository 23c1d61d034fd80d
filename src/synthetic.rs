//! Synthetic glucose series generation
//!
//! Produces a plausible daily curve for demo and offline use: overnight
//! stability, three meal-driven spikes with decay, and a return to
//! baseline before sleep. The randomness source and the reference "now"
//! are injected so output is reproducible in tests.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::model::Reading;
use crate::units::Thresholds;

/// One simulated day of base values at 30-minute granularity,
/// starting at midnight.
const BASE_PATTERN: [u16; 48] = [
    // overnight
    90, 88, 86, 85, 84, 84, 85, 86, 88, 90, 92, 95,
    // waking up, breakfast spike
    100, 110, 130, 150, 165, 170, 160, 145,
    // coming down
    130, 120, 110, 105,
    // lunch spike
    120, 145, 165, 172, 160, 145, 130, 120,
    // afternoon stable
    110, 105, 100, 105,
    // dinner spike
    125, 150, 170, 175, 165, 150, 135, 120,
    // coming down for sleep
    110, 100, 95, 92,
];

/// Sampling interval of the simulated sensor
const SAMPLE_MINUTES: i64 = 5;

/// Uniform jitter added to each base value, in mg/dL
const JITTER: i32 = 15;

/// Device-plausible physiological bounds
const MIN_VALUE: i32 = 40;
const MAX_VALUE: i32 = 300;

/// Generate readings covering `[now - hours_back, now)` at 5-minute steps.
///
/// Produces exactly `hours_back * 12` readings with strictly increasing
/// timestamps. Sample `i` takes `BASE_PATTERN[i % 48]` plus a uniform
/// offset in `[-15, +15]`, clamped to `[40, 300]` and classified against
/// the given thresholds.
pub fn generate_series<R: Rng>(
    hours_back: u32,
    now: DateTime<Utc>,
    rng: &mut R,
    thresholds: Thresholds,
) -> Vec<Reading> {
    let count = hours_back as usize * 12;
    let start = now - Duration::hours(i64::from(hours_back));

    let mut readings = Vec::with_capacity(count);
    for i in 0..count {
        let time = start + Duration::minutes(i as i64 * SAMPLE_MINUTES);
        let base = i32::from(BASE_PATTERN[i % BASE_PATTERN.len()]);
        let offset = rng.gen_range(-JITTER..=JITTER);
        let value = (base + offset).clamp(MIN_VALUE, MAX_VALUE) as u16;
        readings.push(Reading::new(time, value, thresholds));
    }

    readings
}

/// Convenience wrapper using the wall clock and thread-local rng
pub fn generate(hours_back: u32, thresholds: Thresholds) -> Vec<Reading> {
    generate_series(hours_back, Utc::now(), &mut rand::thread_rng(), thresholds)
}
