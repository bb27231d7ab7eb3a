//! Advanced settings: endpoint overrides, response caching, debug logging.
//!
//! Every field is optional and falls back to its own default independently.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_ENDPOINT: &str = "/api/ecu/data";
pub const DEFAULT_AI_ENDPOINT: &str = "/api/ai/analysis";
pub const DEFAULT_ALERTS_ENDPOINT: &str = "/api/ecu/alerts";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_endpoints: Option<CustomEndpoints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_settings: Option<CacheSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomEndpoints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Seconds.
    pub ttl: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl AdvancedSettings {
    pub fn data_endpoint(&self) -> &str {
        self.custom_endpoints
            .as_ref()
            .and_then(|e| e.data.as_deref())
            .unwrap_or(DEFAULT_DATA_ENDPOINT)
    }

    pub fn ai_endpoint(&self) -> &str {
        self.custom_endpoints
            .as_ref()
            .and_then(|e| e.ai.as_deref())
            .unwrap_or(DEFAULT_AI_ENDPOINT)
    }

    pub fn alerts_endpoint(&self) -> &str {
        self.custom_endpoints
            .as_ref()
            .and_then(|e| e.alerts.as_deref())
            .unwrap_or(DEFAULT_ALERTS_ENDPOINT)
    }

    pub fn cache(&self) -> CacheSettings {
        self.cache_settings.unwrap_or_default()
    }

    pub fn debug(&self) -> bool {
        self.debug_mode.unwrap_or(false)
    }

    pub fn with_debug(&self, on: bool) -> Self {
        Self {
            debug_mode: Some(on),
            ..self.clone()
        }
    }

    pub fn with_cache(&self, enabled: bool, ttl: u64) -> Self {
        Self {
            cache_settings: Some(CacheSettings { enabled, ttl }),
            ..self.clone()
        }
    }

    pub fn with_data_endpoint(&self, path: impl Into<String>) -> Self {
        let mut endpoints = self.custom_endpoints.clone().unwrap_or_default();
        endpoints.data = Some(path.into());
        Self {
            custom_endpoints: Some(endpoints),
            ..self.clone()
        }
    }
}
