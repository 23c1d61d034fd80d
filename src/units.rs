//! Glucose status classification against configurable thresholds
//!
//! Values are mg/dL throughout. A reading's status is always derived
//! from its value via `Thresholds::classify`; nothing in the crate
//! stores a status that was not computed here.

use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// Three-way classification of a glucose value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Low,
    Normal,
    High,
}

impl Status {
    /// Display label for the status
    pub fn label(self) -> &'static str {
        match self {
            Status::Low => "Low",
            Status::Normal => "Normal",
            Status::High => "High",
        }
    }
}

/// Normal-range thresholds in mg/dL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Low threshold - default 70
    pub low: u16,
    /// High threshold - default 180
    pub high: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 70, high: 180 }
    }
}

impl Thresholds {
    /// Build thresholds, rejecting an empty or inverted band
    pub fn new(low: u16, high: u16) -> Result<Self, DashError> {
        if low >= high {
            return Err(DashError::Config(format!(
                "threshold low ({}) must be below high ({})",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// Classify a value. Both boundaries are inclusive of Normal:
    /// `classify(low)` and `classify(high)` are `Normal`.
    ///
    /// Accepts any value, including out-of-physiological-range ones;
    /// bounds filtering is a presentation concern.
    pub fn classify(&self, value: u16) -> Status {
        if value < self.low {
            Status::Low
        } else if value > self.high {
            Status::High
        } else {
            Status::Normal
        }
    }

    /// Threshold display string, e.g. "70-180 mg/dL"
    pub fn format_range(&self) -> String {
        format!("{}-{} mg/dL", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries_inclusive() {
        let t = Thresholds::default();

        assert_eq!(t.classify(69), Status::Low);
        assert_eq!(t.classify(70), Status::Normal);
        assert_eq!(t.classify(180), Status::Normal);
        assert_eq!(t.classify(181), Status::High);
    }

    #[test]
    fn test_classify_custom_thresholds() {
        let t = Thresholds::new(80, 140).unwrap();

        assert_eq!(t.classify(79), Status::Low);
        assert_eq!(t.classify(80), Status::Normal);
        assert_eq!(t.classify(140), Status::Normal);
        assert_eq!(t.classify(141), Status::High);
    }

    #[test]
    fn test_classify_is_pure() {
        let t = Thresholds::default();
        assert_eq!(t.classify(55), t.classify(55));
        assert_eq!(t.classify(200), t.classify(200));
    }

    #[test]
    fn test_classify_extreme_values() {
        let t = Thresholds::default();
        assert_eq!(t.classify(0), Status::Low);
        assert_eq!(t.classify(u16::MAX), Status::High);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        assert!(Thresholds::new(180, 70).is_err());
        assert!(Thresholds::new(100, 100).is_err());
    }

    #[test]
    fn test_format_range() {
        assert_eq!(Thresholds::default().format_range(), "70-180 mg/dL");
    }
}
