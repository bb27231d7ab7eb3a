//! Built-in defaults: five ECU metrics, four devices.

use indexmap::IndexMap;

use crate::metric::{
    DeviceConfig, DeviceStatus, DeviceType, MetricConfig, MetricDirection, MetricThreshold,
};

use super::{AdvancedSettings, ColorScheme, PanelOptions, CURRENT_VERSION};

/// (key, display name, unit, color, warning, critical, direction)
#[rustfmt::skip]
const METRICS: &[(&str, &str, &str, &str, f64, f64, MetricDirection)] = &[
    ("rightTempPV", "Right 2A control temp PV", "°C", "#ef4444", 56.0, 58.0, MetricDirection::Above),
    ("rightRoomTemp", "Right 2A hot room temp", "°C", "#f97316", 52.0, 54.0, MetricDirection::Above),
    ("leftOutletTemp", "Left outlet mid temp", "°C", "#eab308", 53.0, 55.0, MetricDirection::Above),
    ("egrCoolerTemp", "EGR cooler packing temp", "°C", "#22c55e", 50.0, 52.0, MetricDirection::Above),
    ("hepaEfficiency", "HEPA filter efficiency", "%", "#3b82f6", 90.0, 85.0, MetricDirection::Below),
];

pub(super) fn default_metrics() -> Vec<MetricConfig> {
    METRICS
        .iter()
        .map(|&(key, name, unit, color, warning, critical, direction)| MetricConfig {
            key: key.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            color: color.to_string(),
            thresholds: MetricThreshold::new(warning, critical),
            direction: Some(direction),
            enabled: true,
        })
        .collect()
}

fn default_devices() -> Vec<DeviceConfig> {
    [
        ("1", DeviceStatus::Online),
        ("2", DeviceStatus::Online),
        ("3", DeviceStatus::Online),
        ("4", DeviceStatus::Maintenance),
    ]
    .into_iter()
    .map(|(id, status)| DeviceConfig {
        id: id.to_string(),
        name: format!("Unit {}", id),
        device_type: DeviceType::Ecu,
        location: None,
        status,
    })
    .collect()
}

impl Default for PanelOptions {
    fn default() -> Self {
        let metrics = default_metrics();
        let alert_thresholds: IndexMap<_, _> = metrics
            .iter()
            .map(|m| (m.key.clone(), m.thresholds))
            .collect();
        let colors: IndexMap<_, _> = metrics
            .iter()
            .map(|m| (m.key.clone(), m.color.clone()))
            .collect();

        Self {
            version: CURRENT_VERSION.to_string(),
            title: "ECU AI Monitoring".to_string(),
            refresh_interval: 30,
            show_legend: true,
            show_grid: true,
            selected_device: "3".to_string(),
            available_devices: default_devices(),
            selected_metrics: metrics.iter().map(|m| m.key.clone()).collect(),
            metrics_config: metrics,
            enable_ai: true,
            ai_endpoint: "/api/ai/analysis".to_string(),
            prediction_horizon: 60,
            chart_height: 300,
            show_prediction: true,
            show_health_status: true,
            show_alerts: true,
            alert_thresholds,
            color_scheme: ColorScheme::Default,
            colors,
            advanced: AdvancedSettings::default(),
        }
    }
}
