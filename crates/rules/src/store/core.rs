//! Core [`ThresholdStore`]: file-backed overrides with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use indexmap::IndexMap;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ecu_core::{MetricConfig, MetricDirection, MetricThreshold, PanelOptions};

use super::error::{Result, StoreError};
use super::watcher::handle_fs_event;

/// Color given to metrics that only exist as overrides.
const FALLBACK_COLOR: &str = "#6b7280";

/// One metric's boundaries as written in the overrides file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverride {
    pub warning: f64,
    pub critical: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<MetricDirection>,
}

impl ThresholdOverride {
    pub fn new(warning: f64, critical: f64) -> Self {
        Self {
            warning,
            critical,
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: MetricDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn threshold(&self) -> MetricThreshold {
        MetricThreshold::new(self.warning, self.critical)
    }

    /// Finite boundaries, ordered for the explicit direction when one is given.
    pub fn validate(&self, key: &str) -> Result<()> {
        if !self.warning.is_finite() || !self.critical.is_finite() {
            return Err(StoreError::Validation(format!(
                "threshold '{}' has non-finite boundaries",
                key
            )));
        }
        let ordered = match self.direction {
            Some(MetricDirection::Above) => self.critical >= self.warning,
            Some(MetricDirection::Below) => self.critical <= self.warning,
            None => true,
        };
        if !ordered {
            return Err(StoreError::Validation(format!(
                "threshold '{}': critical {} is not past warning {} for direction '{}'",
                key,
                self.critical,
                self.warning,
                self.direction.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// On-disk layout of the overrides file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdFile {
    #[serde(default)]
    pub thresholds: IndexMap<String, ThresholdOverride>,
}

impl ThresholdFile {
    /// Parse and validate every entry.
    pub fn parse(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: ThresholdFile = serde_yaml::from_str(contents)?;
        for (key, o) in &file.thresholds {
            o.validate(key)?;
        }
        Ok(file)
    }
}

type Overrides = Arc<RwLock<IndexMap<String, ThresholdOverride>>>;
pub(super) type ReloadHook = Arc<dyn Fn(&IndexMap<String, ThresholdOverride>) + Send + Sync>;

/// File-backed threshold overrides.
///
/// A missing file is not an error: the store simply starts empty.
pub struct ThresholdStore {
    path: PathBuf,
    overrides: Overrides,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl ThresholdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overrides: Arc::new(RwLock::new(IndexMap::new())),
            _watcher: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (Re)read the overrides file, replacing the in-memory set.
    ///
    /// Returns the number of overrides loaded. On error the previous set is kept.
    pub fn load(&self) -> Result<usize> {
        let file = match fs::read_to_string(&self.path) {
            Ok(contents) => ThresholdFile::parse(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no threshold overrides file, starting empty");
                ThresholdFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        let count = file.thresholds.len();
        *self.overrides.write().unwrap_or_else(PoisonError::into_inner) = file.thresholds;
        info!(path = %self.path.display(), count, "loaded threshold overrides");
        Ok(count)
    }

    /// Snapshot of the current overrides.
    pub fn overrides(&self) -> IndexMap<String, ThresholdOverride> {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<ThresholdOverride> {
        self.overrides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Insert or replace one override in memory. Call [`save`](Self::save) to persist.
    pub fn set(&self, key: impl Into<String>, value: ThresholdOverride) -> Result<()> {
        let key = key.into();
        value.validate(&key)?;
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<ThresholdOverride> {
        self.overrides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(key)
    }

    /// New options with every override layered on top of `options`.
    pub fn apply(&self, options: &PanelOptions) -> PanelOptions {
        let overrides = self.overrides.read().unwrap_or_else(PoisonError::into_inner);
        apply_overrides(options, &overrides)
    }

    /// Atomically write the current overrides to the file.
    ///
    /// Writes to a dotted `.tmp` sibling first, then renames over the final path.
    pub fn save(&self) -> Result<PathBuf> {
        let file = ThresholdFile {
            thresholds: self.overrides(),
        };
        let yaml = serde_yaml::to_string(&file)?;

        let dir = parent_dir(&self.path);
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                StoreError::Validation(format!("invalid overrides path '{}'", self.path.display()))
            })?;
        let tmp_path = dir.join(format!(".{}.tmp", name));

        fs::create_dir_all(&dir)?;
        fs::write(&tmp_path, yaml)?;
        fs::rename(&tmp_path, &self.path)?;

        info!(path = %self.path.display(), count = file.thresholds.len(), "wrote threshold overrides");
        Ok(self.path.clone())
    }

    /// Start watching the overrides file, polling at 500ms.
    ///
    /// On create/modify the file is re-parsed and `on_reload` receives the new
    /// set. On delete the set is cleared. Parse errors are logged as warnings
    /// and the previous set is kept.
    pub fn watch<F>(&mut self, on_reload: F) -> Result<()>
    where
        F: Fn(&IndexMap<String, ThresholdOverride>) + Send + Sync + 'static,
    {
        let overrides = Arc::clone(&self.overrides);
        let target = self.path.clone();
        let hook: ReloadHook = Arc::new(on_reload);
        let dir = parent_dir(&self.path);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => handle_fs_event(&event, &target, &overrides, &hook),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            },
        )?;

        // The file itself may be replaced by rename, so watch its directory.
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let _ = watcher
            .configure(notify::Config::default().with_poll_interval(Duration::from_millis(500)));

        info!(path = %self.path.display(), "watching threshold overrides for changes");
        self._watcher = Some(watcher);
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self._watcher.is_some()
    }
}

/// Layer `overrides` over `options`, returning a new value.
///
/// An explicit direction on a known metric updates its metadata. An explicit
/// direction on an unknown metric adds minimal metadata so the direction is
/// honoured during evaluation.
pub fn apply_overrides(
    options: &PanelOptions,
    overrides: &IndexMap<String, ThresholdOverride>,
) -> PanelOptions {
    let mut out = options.clone();
    for (key, o) in overrides {
        out = out.with_threshold(key.clone(), o.threshold());
        let Some(direction) = o.direction else {
            continue;
        };
        if out.metric(key).is_some() {
            out = out.with_direction(key, direction);
        } else {
            out.metrics_config.push(MetricConfig {
                key: key.clone(),
                name: key.clone(),
                unit: String::new(),
                color: FALLBACK_COLOR.to_string(),
                thresholds: o.threshold(),
                direction: Some(direction),
                enabled: true,
            });
        }
    }
    out
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
