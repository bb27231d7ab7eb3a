//! Health score aggregation.

pub use ecu_core::HealthBand;

const ANOMALY_PENALTY: i64 = 15;
const ALERT_PENALTY: i64 = 10;

/// `clamp(100 - anomalies * 15 - alerts * 10, 0, 100)`.
///
/// One breached metric yields both an anomaly and an alert, so it costs 25
/// points.
pub fn health_score(anomaly_count: usize, alert_count: usize) -> u8 {
    let anomalies = i64::try_from(anomaly_count).unwrap_or(i64::MAX);
    let alerts = i64::try_from(alert_count).unwrap_or(i64::MAX);
    let raw = 100i64
        .saturating_sub(anomalies.saturating_mul(ANOMALY_PENALTY))
        .saturating_sub(alerts.saturating_mul(ALERT_PENALTY));
    raw.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_reading_scores_full() {
        assert_eq!(health_score(0, 0), 100);
        assert_eq!(HealthBand::from_score(health_score(0, 0)), HealthBand::Good);
    }

    #[test]
    fn one_breach_costs_twenty_five() {
        assert_eq!(health_score(1, 1), 75);
        assert_eq!(HealthBand::from_score(75), HealthBand::Attention);
    }

    #[test]
    fn score_never_leaves_range() {
        for anomalies in 0..20 {
            for alerts in 0..20 {
                let s = health_score(anomalies, alerts);
                assert!(s <= 100);
            }
        }
        assert_eq!(health_score(usize::MAX, usize::MAX), 0);
    }

    #[test]
    fn mixed_counts() {
        assert_eq!(health_score(2, 0), 70);
        assert_eq!(health_score(0, 3), 70);
        assert_eq!(health_score(3, 3), 25);
        assert_eq!(health_score(4, 4), 0);
    }
}
