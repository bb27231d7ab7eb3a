use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

/// Process-level settings read from the environment.
///
/// Panel options (thresholds, metrics, devices) live in [`crate::PanelOptions`];
/// this only covers where data comes from and how the process runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub source: SourceConfig,
    pub ai: AiConfig,
    pub runner: RunnerConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ECU_PROFILE`. When set (e.g. `PLANT2`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ECU_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            source: SourceConfig::from_env_profiled(p),
            ai: AiConfig::from_env_profiled(p),
            runner: RunnerConfig::from_env_profiled(p),
            store: StoreConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  source:  base_url={}, timeout={}s",
            self.source.base_url.as_deref().unwrap_or("(synthetic only)"),
            self.source.timeout_secs
        );
        tracing::info!(
            "  ai:      endpoint={}",
            self.ai.endpoint_override.as_deref().unwrap_or("(from panel options)")
        );
        tracing::info!(
            "  runner:  window={}, refresh_override={}",
            self.runner.window_size,
            self.runner
                .refresh_override_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "(none)".to_string())
        );
        tracing::info!(
            "  store:   options={}, thresholds={}",
            self.store
                .options_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string()),
            self.store
                .thresholds_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        );
    }

    /// Return a view safe to print or expose.
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "source": {
                "base_url": self.source.base_url,
                "timeout_secs": self.source.timeout_secs,
                "configured": self.source.is_configured(),
            },
            "ai": { "endpoint_override": self.ai.endpoint_override },
            "runner": {
                "window_size": self.runner.window_size,
                "refresh_override_secs": self.runner.refresh_override_secs,
            },
            "store": {
                "options_file": self.store.options_file,
                "thresholds_file": self.store.thresholds_file,
            },
        })
    }
}

// ── Data source ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the telemetry API. `None` means synthetic data only.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl SourceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            base_url: profiled_env_opt(p, "ECU_API_BASE_URL"),
            timeout_secs: profiled_env_u64(p, "ECU_API_TIMEOUT_SECS", 10),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

// ── AI ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Full URL overriding the panel's AI endpoint path.
    pub endpoint_override: Option<String>,
}

impl AiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            endpoint_override: profiled_env_opt(p, "ECU_AI_ENDPOINT"),
        }
    }
}

// ── Runner ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of samples kept for display history.
    pub window_size: usize,
    /// Overrides the panel's refresh interval when set.
    pub refresh_override_secs: Option<u64>,
}

impl RunnerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            window_size: profiled_env_usize(p, "ECU_WINDOW_SIZE", 60),
            refresh_override_secs: profiled_env_opt(p, "ECU_REFRESH_SECS")
                .and_then(|v| v.parse().ok()),
        }
    }
}

// ── Files ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// TOML panel options.
    pub options_file: Option<PathBuf>,
    /// YAML threshold overrides (hot-reloaded).
    pub thresholds_file: Option<PathBuf>,
}

impl StoreConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            options_file: profiled_env_opt(p, "ECU_OPTIONS_FILE").map(PathBuf::from),
            thresholds_file: profiled_env_opt(p, "ECU_THRESHOLDS_FILE").map(PathBuf::from),
        }
    }
}
