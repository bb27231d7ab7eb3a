//! Tests for panel options.

use std::time::Duration;

use serde_json::json;

use super::*;
use crate::metric::{MetricDirection, MetricThreshold};

// ── Defaults ────────────────────────────────────────────────────

#[test]
fn defaults_are_valid() {
    let opts = PanelOptions::default();
    assert!(opts.validate().is_ok());
    assert_eq!(opts.version, CURRENT_VERSION);
    assert_eq!(opts.refresh_interval, 30);
    assert_eq!(opts.selected_metrics.len(), 5);
    assert_eq!(opts.available_devices.len(), 4);
}

#[test]
fn default_thresholds_and_directions() {
    let opts = PanelOptions::default();
    assert_eq!(
        opts.threshold_for("rightTempPV"),
        Some(MetricThreshold::new(56.0, 58.0))
    );
    assert_eq!(
        opts.threshold_for("hepaEfficiency"),
        Some(MetricThreshold::new(90.0, 85.0))
    );
    assert_eq!(opts.direction_for("rightTempPV"), MetricDirection::Above);
    assert_eq!(opts.direction_for("hepaEfficiency"), MetricDirection::Below);
}

#[test]
fn effective_thresholds_keep_insertion_order() {
    let opts = PanelOptions::default();
    let keys: Vec<_> = opts.effective_thresholds().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            "rightTempPV",
            "rightRoomTemp",
            "leftOutletTemp",
            "egrCoolerTemp",
            "hepaEfficiency"
        ]
    );
}

#[test]
fn threshold_falls_back_to_metric_config() {
    let mut opts = PanelOptions::default();
    opts.alert_thresholds.shift_remove("egrCoolerTemp");
    assert_eq!(
        opts.threshold_for("egrCoolerTemp"),
        Some(MetricThreshold::new(50.0, 52.0))
    );
    assert!(opts.effective_thresholds().contains_key("egrCoolerTemp"));
    assert_eq!(opts.threshold_for("unknown"), None);
}

#[test]
fn direction_inferred_without_metadata() {
    let opts =
        PanelOptions::default().with_threshold("oilPressure", MetricThreshold::new(3.0, 2.0));
    assert_eq!(opts.direction_for("oilPressure"), MetricDirection::Below);
}

// ── Functional updates ──────────────────────────────────────────

#[test]
fn updates_do_not_touch_original() {
    let base = PanelOptions::default();
    let changed = base
        .with_device("1")
        .with_refresh_interval(60)
        .with_threshold("rightTempPV", MetricThreshold::new(60.0, 65.0))
        .with_ai(false);

    assert_eq!(base.selected_device, "3");
    assert_eq!(base.refresh_interval, 30);
    assert!(base.enable_ai);
    assert_eq!(base.threshold_for("rightTempPV"), Some(MetricThreshold::new(56.0, 58.0)));

    assert_eq!(changed.selected_device, "1");
    assert_eq!(changed.refresh_interval, 60);
    assert!(!changed.enable_ai);
    assert_eq!(
        changed.threshold_for("rightTempPV"),
        Some(MetricThreshold::new(60.0, 65.0))
    );
}

#[test]
fn toggle_metric_removes_then_appends() {
    let base = PanelOptions::default();
    let without = base.toggle_metric("leftOutletTemp");
    assert!(!without.selected_metrics.contains(&"leftOutletTemp".to_string()));
    assert_eq!(without.selected_metrics.len(), 4);

    let again = without.toggle_metric("leftOutletTemp");
    assert_eq!(again.selected_metrics.last().map(String::as_str), Some("leftOutletTemp"));
}

#[test]
fn with_direction_only_changes_named_metric() {
    let opts = PanelOptions::default().with_direction("rightTempPV", MetricDirection::Below);
    assert_eq!(opts.direction_for("rightTempPV"), MetricDirection::Below);
    assert_eq!(opts.direction_for("rightRoomTemp"), MetricDirection::Above);
}

#[test]
fn refresh_period_is_clamped() {
    let opts = PanelOptions::default();
    assert_eq!(opts.with_refresh_interval(1).refresh_period(), Duration::from_secs(5));
    assert_eq!(opts.with_refresh_interval(900).refresh_period(), Duration::from_secs(300));
    assert_eq!(opts.refresh_period(), Duration::from_secs(30));
}

#[test]
fn ai_endpoint_override() {
    let base = PanelOptions::default();
    assert_eq!(base.effective_ai_endpoint(), "/api/ai/analysis");
    let adv: AdvancedSettings =
        serde_json::from_value(json!({"customEndpoints": {"ai": "/ml/v2"}})).unwrap();
    assert_eq!(base.with_advanced(adv).effective_ai_endpoint(), "/ml/v2");
}

// ── Validation ──────────────────────────────────────────────────

#[test]
fn validation_collects_every_issue() {
    let mut opts = PanelOptions::default();
    opts.title = "  ".to_string();
    opts.refresh_interval = 2;
    opts.selected_device = String::new();
    opts.selected_metrics.clear();

    let issues = opts.validate().unwrap_err();
    let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"refreshInterval"));
    assert!(fields.contains(&"selectedDevice"));
    assert!(fields.contains(&"selectedMetrics"));
}

#[test]
fn validation_rejects_inverted_boundaries() {
    // Above-direction metric with critical below warning.
    let opts =
        PanelOptions::default().with_threshold("rightTempPV", MetricThreshold::new(58.0, 56.0));
    let issues = opts.validate().unwrap_err();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field, "alertThresholds.rightTempPV");
}

#[test]
fn validation_rejects_unknown_selected_metric() {
    let opts = PanelOptions::default().toggle_metric("turboBoost");
    let issues = opts.validate().unwrap_err();
    assert!(issues[0].message.contains("turboBoost"));
}

#[test]
fn debug_toggle_is_functional() {
    let base = PanelOptions::default();
    assert!(!base.debug_mode());
    let on = base.with_advanced(base.advanced.with_debug(true));
    assert!(on.debug_mode());
    assert!(!base.debug_mode());
    assert_eq!(on.advanced.with_debug(false).debug_mode, Some(false));
}

#[test]
fn validation_checks_cache_ttl_only_when_enabled() {
    let base = PanelOptions::default();
    let off = base.with_advanced(base.advanced.with_cache(false, 1));
    assert!(off.validate().is_ok());
    let on = base.with_advanced(base.advanced.with_cache(true, 1));
    assert!(on.validate().is_err());
}

// ── TOML ────────────────────────────────────────────────────────

#[test]
fn from_toml_partial_document_uses_defaults() {
    let opts = PanelOptions::from_toml(
        r#"
title = "Line 4"
refreshInterval = 15
selectedDevice = "2"

[alertThresholds.rightTempPV]
warning = 60
critical = 62

[advanced]
debugMode = true
"#,
    )
    .unwrap();

    assert_eq!(opts.title, "Line 4");
    assert_eq!(opts.refresh_interval, 15);
    assert!(opts.debug_mode());
    assert_eq!(
        opts.threshold_for("rightTempPV"),
        Some(MetricThreshold::new(60.0, 62.0))
    );
    // Replaced map: other keys fall back to metric config.
    assert_eq!(
        opts.threshold_for("hepaEfficiency"),
        Some(MetricThreshold::new(90.0, 85.0))
    );
}

#[test]
fn from_toml_rejects_invalid_options() {
    let err = PanelOptions::from_toml("refreshInterval = 1000").unwrap_err();
    assert!(matches!(err, crate::EcuError::Validation(_)));
    assert!(err.to_string().contains("refreshInterval"));
}

#[test]
fn toml_round_trip_of_defaults() {
    let opts = PanelOptions::default();
    let text = opts.to_toml().unwrap();
    let parsed = PanelOptions::from_toml(&text).unwrap();
    assert_eq!(parsed, opts);
}

#[test]
fn from_toml_metric_without_direction_is_inferred() {
    let opts = PanelOptions::from_toml(
        r##"
selectedMetrics = ["hepaEfficiency"]

[[metricsConfig]]
key = "hepaEfficiency"
name = "HEPA filter efficiency"
unit = "%"
color = "#3b82f6"
thresholds = { warning = 90, critical = 85 }
"##,
    )
    .unwrap();
    assert_eq!(opts.metric("hepaEfficiency").unwrap().direction, None);
    assert_eq!(opts.direction_for("hepaEfficiency"), MetricDirection::Below);
}

#[test]
fn from_file_reads_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.toml");
    std::fs::write(&path, "title = \"From disk\"\n").unwrap();
    let opts = PanelOptions::from_file(&path).unwrap();
    assert_eq!(opts.title, "From disk");
}

#[test]
fn load_migrates_stored_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.json");
    std::fs::write(&path, r#"{"title": "Stored", "refreshInterval": 15}"#).unwrap();

    let opts = PanelOptions::load(&path).unwrap();
    assert_eq!(opts.title, "Stored");
    assert_eq!(opts.refresh_interval, 15);
    assert_eq!(opts.version, CURRENT_VERSION);

    std::fs::write(&path, r#"{"refreshInterval": 1}"#).unwrap();
    assert!(matches!(
        PanelOptions::load(&path).unwrap_err(),
        EcuError::Validation(_)
    ));
}

// ── Migration ───────────────────────────────────────────────────

#[test]
fn migrate_unversioned_merges_defaults() {
    let opts = migrate(json!({
        "title": "Legacy",
        "advanced": { "debugMode": true }
    }))
    .unwrap();
    assert_eq!(opts.version, CURRENT_VERSION);
    assert_eq!(opts.title, "Legacy");
    assert_eq!(opts.refresh_interval, 30);
    assert!(opts.debug_mode());
    assert_eq!(opts.metrics_config.len(), 5);
}

#[test]
fn migrate_legacy_version_bumps() {
    let opts = migrate(json!({ "version": "0.9.0", "refreshInterval": 45 })).unwrap();
    assert_eq!(opts.version, CURRENT_VERSION);
    assert_eq!(opts.refresh_interval, 45);
}

#[test]
fn migrate_current_version_untouched() {
    let opts = migrate(json!({ "version": "1.0.0", "title": "Keep" })).unwrap();
    assert_eq!(opts.title, "Keep");
    assert_eq!(opts.version, "1.0.0");
}

#[test]
fn migrate_rejects_non_object() {
    assert!(migrate(json!([1, 2, 3])).is_err());
}

#[test]
fn deep_merge_child_wins_and_arrays_replace() {
    let parent = json!({"a": {"x": 1, "y": 2}, "list": [1, 2, 3]});
    let child = json!({"a": {"y": 20}, "list": [9]});
    let merged = deep_merge(&parent, &child);
    assert_eq!(merged, json!({"a": {"x": 1, "y": 20}, "list": [9]}));
}
