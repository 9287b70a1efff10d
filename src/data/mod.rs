//! Data models and the bucketing transform.
//!
//! This module handles the transformation of raw counter payloads into
//! labeled chart series suitable for display.
//!
//! ## Submodules
//!
//! - [`bundle`]: The raw API payload for one counter ([`RawBundle`])
//! - [`mode`]: Display granularities and their bucket configuration ([`Mode`])
//! - [`series`]: The bucketing transform ([`ChartSeries`], [`ModeSeries`])
//!
//! ## Data Flow
//!
//! ```text
//! RawBundle (raw JSON)
//!        │
//!        ▼
//! ModeSeries::derive()
//!        │
//!        └──▶ ChartSeries per mode (labels + hits, oldest first)
//! ```

pub mod bundle;
pub mod mode;
pub mod series;

pub use bundle::RawBundle;
pub use mode::{Mode, ModeConfig};
pub use series::{ChartSeries, ModeSeries};
