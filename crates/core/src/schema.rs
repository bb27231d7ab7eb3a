//! Declarative table mapping option paths to host UI controls.
//!
//! Host adapters walk [`OPTION_FIELDS`] to register form controls. Nothing in
//! the evaluation path reads this table.

use serde::Serialize;

use crate::panel::PanelOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionCategory {
    Basic,
    Device,
    Metrics,
    Ai,
    Display,
}

/// Where a select control's choices come from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceSource {
    Devices,
    Metrics,
    Fixed(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OptionKind {
    Text,
    Number { min: f64, max: f64, step: f64 },
    Boolean,
    Select { choices: ChoiceSource },
    MultiSelect { choices: ChoiceSource },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionField {
    pub path: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub category: OptionCategory,
    pub kind: OptionKind,
    /// Path of a boolean option that must be on for this control to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_if: Option<&'static str>,
}

/// A concrete choice for a select control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
}

const COLOR_SCHEMES: &[(&str, &str)] =
    &[("Default", "default"), ("Dark", "dark"), ("Light", "light")];

pub const OPTION_FIELDS: &[OptionField] = &[
    // ── Basic ──
    OptionField {
        path: "title",
        label: "Panel title",
        description: "Title shown at the top of the panel",
        category: OptionCategory::Basic,
        kind: OptionKind::Text,
        show_if: None,
    },
    OptionField {
        path: "refreshInterval",
        label: "Refresh interval (s)",
        description: "Seconds between automatic re-evaluations",
        category: OptionCategory::Basic,
        kind: OptionKind::Number { min: 5.0, max: 300.0, step: 5.0 },
        show_if: None,
    },
    // ── Device ──
    OptionField {
        path: "selectedDevice",
        label: "Device",
        description: "ECU unit to monitor",
        category: OptionCategory::Device,
        kind: OptionKind::Select { choices: ChoiceSource::Devices },
        show_if: None,
    },
    // ── Metrics ──
    OptionField {
        path: "selectedMetrics",
        label: "Metrics",
        description: "Metrics to display",
        category: OptionCategory::Metrics,
        kind: OptionKind::MultiSelect { choices: ChoiceSource::Metrics },
        show_if: None,
    },
    // ── AI ──
    OptionField {
        path: "enableAI",
        label: "Enable AI analysis",
        description: "Turn on prediction and recommendation output",
        category: OptionCategory::Ai,
        kind: OptionKind::Boolean,
        show_if: None,
    },
    OptionField {
        path: "aiEndpoint",
        label: "AI endpoint",
        description: "API path of the analysis service",
        category: OptionCategory::Ai,
        kind: OptionKind::Text,
        show_if: Some("enableAI"),
    },
    OptionField {
        path: "predictionHorizon",
        label: "Prediction horizon (min)",
        description: "How far ahead predictions look",
        category: OptionCategory::Ai,
        kind: OptionKind::Number { min: 15.0, max: 240.0, step: 15.0 },
        show_if: Some("enableAI"),
    },
    // ── Display ──
    OptionField {
        path: "chartHeight",
        label: "Chart height (px)",
        description: "Height of the monitoring chart",
        category: OptionCategory::Display,
        kind: OptionKind::Number { min: 200.0, max: 800.0, step: 50.0 },
        show_if: None,
    },
    OptionField {
        path: "showLegend",
        label: "Show legend",
        description: "Show the series legend",
        category: OptionCategory::Display,
        kind: OptionKind::Boolean,
        show_if: None,
    },
    OptionField {
        path: "showGrid",
        label: "Show grid",
        description: "Draw background grid lines",
        category: OptionCategory::Display,
        kind: OptionKind::Boolean,
        show_if: None,
    },
    OptionField {
        path: "showPrediction",
        label: "Show predictions",
        description: "Overlay predicted trends",
        category: OptionCategory::Display,
        kind: OptionKind::Boolean,
        show_if: Some("enableAI"),
    },
    OptionField {
        path: "showHealthStatus",
        label: "Show health status",
        description: "Show the health score indicator",
        category: OptionCategory::Display,
        kind: OptionKind::Boolean,
        show_if: None,
    },
    OptionField {
        path: "showAlerts",
        label: "Show alerts",
        description: "Show the analysis and alert section",
        category: OptionCategory::Display,
        kind: OptionKind::Boolean,
        show_if: None,
    },
    OptionField {
        path: "colorScheme",
        label: "Color scheme",
        description: "Chart color theme",
        category: OptionCategory::Display,
        kind: OptionKind::Select { choices: ChoiceSource::Fixed(COLOR_SCHEMES) },
        show_if: None,
    },
];

/// Look up a field by its option path.
pub fn field(path: &str) -> Option<&'static OptionField> {
    OPTION_FIELDS.iter().find(|f| f.path == path)
}

/// Fields belonging to one category, in table order.
pub fn fields_in(category: OptionCategory) -> impl Iterator<Item = &'static OptionField> {
    OPTION_FIELDS.iter().filter(move |f| f.category == category)
}

impl ChoiceSource {
    /// Resolve the concrete choices against a set of options.
    pub fn resolve(&self, options: &PanelOptions) -> Vec<Choice> {
        match self {
            ChoiceSource::Devices => options
                .available_devices
                .iter()
                .map(|d| Choice {
                    label: d.name.clone(),
                    value: d.id.clone(),
                    description: Some(format!("status: {}", d.status)),
                })
                .collect(),
            ChoiceSource::Metrics => options
                .metrics_config
                .iter()
                .map(|m| Choice {
                    label: m.name.clone(),
                    value: m.key.clone(),
                    description: Some(format!("unit: {}", m.unit)),
                })
                .collect(),
            ChoiceSource::Fixed(pairs) => pairs
                .iter()
                .map(|(label, value)| Choice {
                    label: label.to_string(),
                    value: value.to_string(),
                    description: None,
                })
                .collect(),
        }
    }
}

impl OptionField {
    /// Choices for select controls; empty for every other kind.
    pub fn resolve_choices(&self, options: &PanelOptions) -> Vec<Choice> {
        match self.kind {
            OptionKind::Select { choices } | OptionKind::MultiSelect { choices } => {
                choices.resolve(options)
            }
            _ => Vec::new(),
        }
    }

    /// Whether the control should be visible for the given options.
    pub fn is_visible(&self, options: &PanelOptions) -> bool {
        match self.show_if {
            Some("enableAI") => options.enable_ai,
            _ => true,
        }
    }
}
