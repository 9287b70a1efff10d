//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//!
//! ## Submodules
//!
//! - [`cards`]: Main table showing one row per counter in the namespace
//! - [`detail`]: Modal overlay with one counter's label/value table and sparkline
//! - [`common`]: Shared components (header, status bar, namespace prompt, help)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop draws a fixed frame and overlays:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Counter list (cards::render)         │
//! │   or namespace prompt                │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!        + detail overlay (detail::render_overlay)
//!        + help overlay (common::render_help)
//! ```

pub mod cards;
pub mod common;
pub mod detail;
pub mod theme;

pub use theme::Theme;
