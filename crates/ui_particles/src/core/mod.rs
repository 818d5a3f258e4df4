//! # Core Widget Settings
//!
//! Configuration types shared by the collector, the builders and the widget.

pub mod options;

pub use crate::config::{Config, ConfigError, ConfigFormat};
pub use options::{MaterialRemap, MaterialRemapEntry, WidgetRenderOptions, DEFAULT_FAKE_DEPTH_DISTANCE};
