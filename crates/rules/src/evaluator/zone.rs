//! Three-zone classification of a single metric value.

use ecu_core::{AlertSeverity, MetricDirection, MetricThreshold};

/// Where a value sits relative to its warning/critical boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zone {
    Normal,
    Warning,
    Critical,
}

impl Zone {
    /// Classify `value`. Critical is checked first so a value past both
    /// boundaries lands in exactly one zone.
    pub fn classify(value: f64, threshold: &MetricThreshold, direction: MetricDirection) -> Zone {
        if direction.breaches(value, threshold.critical) {
            Zone::Critical
        } else if direction.breaches(value, threshold.warning) {
            Zone::Warning
        } else {
            Zone::Normal
        }
    }

    pub fn severity(self) -> Option<AlertSeverity> {
        match self {
            Zone::Normal => None,
            Zone::Warning => Some(AlertSeverity::Warning),
            Zone::Critical => Some(AlertSeverity::Critical),
        }
    }

    /// The boundary that was crossed to enter this zone.
    pub fn bound(self, threshold: &MetricThreshold) -> Option<f64> {
        match self {
            Zone::Normal => None,
            Zone::Warning => Some(threshold.warning),
            Zone::Critical => Some(threshold.critical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMP: MetricThreshold = MetricThreshold { warning: 56.0, critical: 58.0 };
    const HEPA: MetricThreshold = MetricThreshold { warning: 90.0, critical: 85.0 };

    #[test]
    fn above_direction() {
        let d = MetricDirection::Above;
        assert_eq!(Zone::classify(55.0, &TEMP, d), Zone::Normal);
        assert_eq!(Zone::classify(56.0, &TEMP, d), Zone::Normal);
        assert_eq!(Zone::classify(57.0, &TEMP, d), Zone::Warning);
        assert_eq!(Zone::classify(58.0, &TEMP, d), Zone::Warning);
        assert_eq!(Zone::classify(59.0, &TEMP, d), Zone::Critical);
    }

    #[test]
    fn below_direction() {
        let d = MetricDirection::Below;
        assert_eq!(Zone::classify(92.0, &HEPA, d), Zone::Normal);
        assert_eq!(Zone::classify(90.0, &HEPA, d), Zone::Normal);
        assert_eq!(Zone::classify(88.0, &HEPA, d), Zone::Warning);
        assert_eq!(Zone::classify(84.0, &HEPA, d), Zone::Critical);
    }

    #[test]
    fn bound_matches_zone() {
        assert_eq!(Zone::Warning.bound(&TEMP), Some(56.0));
        assert_eq!(Zone::Critical.bound(&TEMP), Some(58.0));
        assert_eq!(Zone::Normal.bound(&TEMP), None);
        assert_eq!(Zone::Critical.severity(), Some(AlertSeverity::Critical));
    }
}
