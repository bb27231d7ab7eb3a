pub mod alert;
pub mod analysis;
pub mod config;
pub mod error;
pub mod metric;
pub mod panel;
pub mod reading;
pub mod schema;

pub use alert::*;
pub use analysis::*;
pub use config::Config;
pub use error::EcuError;
pub use metric::*;
pub use panel::{AdvancedSettings, CacheSettings, ColorScheme, CustomEndpoints, PanelOptions};
pub use reading::*;
