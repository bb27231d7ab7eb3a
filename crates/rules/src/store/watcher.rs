//! Filesystem event handler for the threshold store watcher (hot-reload).

use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tracing::{info, warn};

use super::core::{ReloadHook, ThresholdFile, ThresholdOverride};

/// Handle a single filesystem event from the notify watcher.
///
/// Events for any path other than `target` (siblings, our own `.tmp` file)
/// are ignored.
pub(super) fn handle_fs_event(
    event: &Event,
    target: &Path,
    overrides: &RwLock<IndexMap<String, ThresholdOverride>>,
    on_reload: &ReloadHook,
) {
    let touches_target = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name());
    if !touches_target {
        return;
    }

    match &event.kind {
        EventKind::Create(CreateKind::File | CreateKind::Any)
        | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any) => {
            let contents = match fs::read_to_string(target) {
                Ok(c) => c,
                Err(e) => {
                    warn!(path = %target.display(), error = %e, "failed to read overrides during hot-reload");
                    return;
                }
            };
            match ThresholdFile::parse(&contents) {
                Ok(file) => {
                    info!(path = %target.display(), count = file.thresholds.len(), "hot-reloaded threshold overrides");
                    let snapshot = file.thresholds.clone();
                    *overrides.write().unwrap_or_else(PoisonError::into_inner) = file.thresholds;
                    on_reload(&snapshot);
                }
                Err(e) => {
                    warn!(
                        path = %target.display(),
                        error = %e,
                        "failed to parse overrides during hot-reload, keeping previous version"
                    );
                }
            }
        }
        EventKind::Remove(RemoveKind::File | RemoveKind::Any) => {
            if target.exists() {
                return;
            }
            overrides
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
            info!(path = %target.display(), "overrides file removed, cleared overrides");
            on_reload(&IndexMap::new());
        }
        _ => {}
    }
}
