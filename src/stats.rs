//! Statistics over glucose readings
//!
//! Reduces a reading sequence into the summary metrics shown on the
//! dashboard: average, time-in-range, extremes and out-of-range event
//! counts. All rounding is half-away-from-zero (f64 `round`).

use crate::error::DashError;
use crate::model::{Reading, StatsSummary};
use crate::units::Status;

/// Summarize a sequence of readings in a single pass.
///
/// The average and extremes are undefined on an empty set, so zero
/// readings is an error rather than a zeroed summary - callers must
/// special-case it.
pub fn summarize(readings: &[Reading]) -> Result<StatsSummary, DashError> {
    if readings.is_empty() {
        return Err(DashError::EmptyInput);
    }

    let mut sum: u64 = 0;
    let mut lowest = u16::MAX;
    let mut highest = u16::MIN;
    let mut in_range = 0usize;
    let mut low_events = 0usize;
    let mut high_events = 0usize;

    for reading in readings {
        sum += u64::from(reading.value);
        lowest = lowest.min(reading.value);
        highest = highest.max(reading.value);
        match reading.status {
            Status::Low => low_events += 1,
            Status::Normal => in_range += 1,
            Status::High => high_events += 1,
        }
    }

    let total = readings.len();
    let average = (sum as f64 / total as f64).round() as u16;
    let time_in_range = (in_range as f64 / total as f64 * 100.0).round() as u8;

    Ok(StatsSummary {
        average,
        time_in_range,
        highest,
        lowest,
        low_events,
        high_events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Thresholds;
    use chrono::{Duration, TimeZone, Utc};

    fn readings_from_values(values: &[u16]) -> Vec<Reading> {
        let thresholds = Thresholds::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(start + Duration::minutes(i as i64 * 5), v, thresholds))
            .collect()
    }

    #[test]
    fn test_summary_reference_fixture() {
        let readings = readings_from_values(&[100, 200, 50]);
        let summary = summarize(&readings).unwrap();

        // mean 116.67 rounds to 117; 1 of 3 in range rounds to 33
        assert_eq!(summary.average, 117);
        assert_eq!(summary.lowest, 50);
        assert_eq!(summary.highest, 200);
        assert_eq!(summary.time_in_range, 33);
        assert_eq!(summary.low_events, 1);
        assert_eq!(summary.high_events, 1);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(summarize(&[]), Err(DashError::EmptyInput)));
    }

    #[test]
    fn test_single_reading() {
        let summary = summarize(&readings_from_values(&[120])).unwrap();
        assert_eq!(summary.average, 120);
        assert_eq!(summary.lowest, 120);
        assert_eq!(summary.highest, 120);
        assert_eq!(summary.time_in_range, 100);
        assert_eq!(summary.low_events, 0);
        assert_eq!(summary.high_events, 0);
    }

    #[test]
    fn test_average_rounds_half_up() {
        // mean of 100 and 101 is 100.5, rounds away from zero to 101
        let summary = summarize(&readings_from_values(&[100, 101])).unwrap();
        assert_eq!(summary.average, 101);
    }

    #[test]
    fn test_ordering_invariant() {
        let summary = summarize(&readings_from_values(&[90, 140, 75, 210, 60])).unwrap();
        assert!(summary.lowest <= summary.average);
        assert!(summary.average <= summary.highest);
    }

    #[test]
    fn test_all_out_of_range() {
        let summary = summarize(&readings_from_values(&[50, 60, 200, 250])).unwrap();
        assert_eq!(summary.time_in_range, 0);
        assert_eq!(summary.low_events, 2);
        assert_eq!(summary.high_events, 2);
    }
}
