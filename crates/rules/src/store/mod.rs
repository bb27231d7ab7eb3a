//! YAML threshold override store with hot-reload via `notify` watcher.
//!
//! Operators tune warning/critical boundaries in a single YAML file:
//!
//! ```yaml
//! thresholds:
//!   rightTempPV:
//!     warning: 57
//!     critical: 60
//!   hepaEfficiency:
//!     warning: 92
//!     critical: 88
//!     direction: below
//! ```
//!
//! The store never touches a [`PanelOptions`](ecu_core::PanelOptions) in
//! place; [`ThresholdStore::apply`] returns a new options value with the
//! overrides layered on top.

mod core;
mod error;
mod watcher;


pub use self::core::{apply_overrides, ThresholdFile, ThresholdOverride, ThresholdStore};
pub use self::error::{Result, StoreError};
