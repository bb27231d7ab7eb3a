use chrono::{TimeZone, Utc};

use ecu_core::{AlertSeverity, MetricThreshold, PanelOptions, Reading};

use super::*;

fn stamp() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

fn reading(values: &[(&str, f64)]) -> Reading {
    values
        .iter()
        .fold(Reading::new(stamp()), |r, &(k, v)| r.with(k, v))
}

#[test]
fn single_warning_breach() {
    let options = PanelOptions::default();
    let r = reading(&[("rightTempPV", 57.0), ("hepaEfficiency", 92.0)]);

    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());

    assert_eq!(eval.alerts.len(), 1);
    assert_eq!(eval.anomalies.len(), 1);
    let alert = &eval.alerts[0];
    assert_eq!(alert.severity, AlertSeverity::Warning);
    assert_eq!(alert.metric, "rightTempPV");
    assert_eq!(alert.threshold, 56.0);
    assert_eq!(alert.value, 57.0);
    assert!(!alert.acknowledged);
    assert_eq!(alert.id, "rightTempPV-warning-1700000000000");
    assert!(eval.anomalies[0].description.contains("57.00"));
    assert_eq!(eval.health_score(), 75);
}

#[test]
fn critical_supersedes_warning() {
    let options = PanelOptions::default();
    let r = reading(&[("rightTempPV", 59.0)]);

    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());

    assert_eq!(eval.alerts.len(), 1);
    assert_eq!(eval.alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(eval.alerts[0].threshold, 58.0);
}

#[test]
fn inverted_metric_alerts_below() {
    let options = PanelOptions::default();

    let r = reading(&[("hepaEfficiency", 88.0)]);
    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());
    assert_eq!(eval.alerts.len(), 1);
    assert_eq!(eval.alerts[0].severity, AlertSeverity::Warning);

    let r = reading(&[("hepaEfficiency", 80.0)]);
    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());
    assert_eq!(eval.alerts[0].severity, AlertSeverity::Critical);
    assert!(eval.anomalies[0].description.contains("below"));

    let r = reading(&[("hepaEfficiency", 99.0)]);
    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());
    assert!(eval.is_clear());
}

#[test]
fn all_clear_scores_full() {
    let options = PanelOptions::default();
    let r = reading(&[
        ("rightTempPV", 55.0),
        ("rightRoomTemp", 51.0),
        ("leftOutletTemp", 52.0),
        ("egrCoolerTemp", 48.0),
        ("hepaEfficiency", 95.0),
    ]);

    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());
    assert!(eval.is_clear());
    assert_eq!(eval.health_score(), 100);
}

#[test]
fn missing_and_nan_metrics_are_skipped() {
    let options = PanelOptions::default();
    let r = reading(&[("rightTempPV", f64::NAN), ("egrCoolerTemp", 53.0)]);

    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());

    assert_eq!(eval.alerts.len(), 1);
    assert_eq!(eval.alerts[0].metric, "egrCoolerTemp");
    assert_eq!(eval.alerts[0].severity, AlertSeverity::Critical);
}

#[test]
fn output_follows_threshold_order() {
    let mut thresholds = IndexMap::new();
    thresholds.insert("b".to_string(), MetricThreshold::new(1.0, 2.0));
    thresholds.insert("a".to_string(), MetricThreshold::new(1.0, 2.0));
    thresholds.insert("c".to_string(), MetricThreshold::new(10.0, 5.0));
    let r = reading(&[("a", 3.0), ("b", 1.5), ("c", 4.0)]);

    let eval = ThresholdEvaluator::evaluate_with(&r, &thresholds, &[], stamp());

    let keys: Vec<_> = eval.alerts.iter().map(|a| a.metric.as_str()).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    // no metadata: key stands in for the name, direction inferred
    assert!(eval.anomalies[2].description.starts_with("c: 4.00"));
    assert_eq!(eval.alerts[2].severity, AlertSeverity::Critical);
}

#[test]
fn disabled_metric_is_skipped() {
    let mut options = PanelOptions::default();
    for m in &mut options.metrics_config {
        if m.key == "rightTempPV" {
            m.enabled = false;
        }
    }
    let eval = ThresholdEvaluator::evaluate(&reading(&[("rightTempPV", 70.0)]), &options, stamp());
    assert!(eval.is_clear());
}

#[test]
fn override_threshold_wins_over_metric_default() {
    let options =
        PanelOptions::default().with_threshold("rightTempPV", MetricThreshold::new(60.0, 65.0));
    let eval = ThresholdEvaluator::evaluate(&reading(&[("rightTempPV", 59.0)]), &options, stamp());
    assert!(eval.is_clear());
}

#[test]
fn evaluation_is_idempotent() {
    let options = PanelOptions::default();
    let r = reading(&[
        ("rightTempPV", 57.3),
        ("leftOutletTemp", 56.0),
        ("hepaEfficiency", 84.5),
    ]);

    let first = ThresholdEvaluator::evaluate(&r, &options, stamp());
    let second = ThresholdEvaluator::evaluate(&r, &options, stamp());
    assert_eq!(first, second);

    let later = Utc.timestamp_millis_opt(1_700_000_000_001).unwrap();
    let third = ThresholdEvaluator::evaluate(&r, &options, later);
    assert_eq!(first.anomalies, third.anomalies);
    let strip = |e: &Evaluation| {
        e.alerts
            .iter()
            .map(|a| (a.metric.clone(), a.severity, a.message.clone(), a.value, a.threshold))
            .collect::<Vec<_>>()
    };
    assert_eq!(strip(&first), strip(&third));
    assert_ne!(first.alerts[0].id, third.alerts[0].id);
}

#[test]
fn stored_panel_without_directions_keeps_hepa_inverted() {
    let metric = |key: &str, warning: f64, critical: f64| {
        serde_json::json!({
            "key": key,
            "name": key,
            "unit": "",
            "color": "#3b82f6",
            "thresholds": { "warning": warning, "critical": critical },
        })
    };
    let stored = serde_json::json!({
        "title": "ECU",
        "metricsConfig": [
            metric("rightTempPV", 56.0, 58.0),
            metric("rightRoomTemp", 52.0, 54.0),
            metric("leftOutletTemp", 53.0, 55.0),
            metric("egrCoolerTemp", 50.0, 52.0),
            metric("hepaEfficiency", 90.0, 85.0),
        ],
    });
    let options = ecu_core::panel::migrate(stored).unwrap();
    assert!(options.validate().is_ok());

    let r = reading(&[("rightTempPV", 57.0), ("hepaEfficiency", 92.0)]);
    let eval = ThresholdEvaluator::evaluate(&r, &options, stamp());

    let alerts: Vec<_> = eval
        .alerts
        .iter()
        .map(|a| (a.metric.as_str(), a.severity))
        .collect();
    assert_eq!(alerts, vec![("rightTempPV", AlertSeverity::Warning)]);
    assert_eq!(eval.health_score(), 75);

    let low = reading(&[("hepaEfficiency", 84.0)]);
    let eval = ThresholdEvaluator::evaluate(&low, &options, stamp());
    assert_eq!(eval.alerts[0].severity, AlertSeverity::Critical);
}
