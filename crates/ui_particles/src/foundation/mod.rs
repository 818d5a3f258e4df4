//! Foundation module - Core utilities and types
//!
//! - Math types and 2D helpers
//! - Linear/sRGB color conversion
//! - Logging setup

pub mod color;
pub mod logging;
pub mod math;
