// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # hitwatch
//!
//! A dashboard TUI and library for watching time-bucketed hit counters
//! served by an incr-style API.
//!
//! The server groups counters ("incrementers") into namespaces and keeps
//! each counter's hits bucketed at four granularities at once: per second
//! over the last minute, per hour over the last day, per day over the
//! last month, and per month over the last year. This crate fetches those
//! raw bundles, turns them into chronological chart series, and renders
//! one card per counter in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(transform)    │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── HttpSource | ChannelSource                   │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state - counter card lifecycles, namespace
//!   switching, mode selection, and the realtime poll loop
//! - **[`source`]**: Counter source abstraction ([`CounterSource`] trait)
//!   with an HTTP implementation and a channel source for embedding
//! - **[`data`]**: Data model and the bucketing transform - raw count
//!   sequences become labeled, chronological [`ChartSeries`]
//! - **[`ui`]**: Terminal rendering using ratatui - counter table, detail
//!   overlay with charts and bucket breakdowns, theme support
//! - **[`store`]**: Namespace selection with pluggable persistence
//! - **[`config`]**: Layered runtime settings (defaults, file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch counters on a local incr server
//! hitwatch --url http://localhost:8080 --namespace teamA
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use std::time::Duration;
//! use hitwatch::{App, ChannelSource, NamespaceStore};
//!
//! // Create a channel for delivering fetch results
//! let (handle, source) = ChannelSource::create("embedded");
//!
//! let mut store = NamespaceStore::new();
//! store.set("teamA");
//!
//! let app = App::new(Box::new(source), store, Duration::from_millis(1000));
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod store;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Card, CardState, ListState};
pub use config::Settings;
pub use data::{ChartSeries, Mode, ModeSeries, RawBundle};
pub use source::{
    ApiClient, ChannelHandle, ChannelSource, CounterSource, FetchEvent, HttpSource, PollHandle,
    Request,
};
pub use store::{FileSync, NamespaceStore, NamespaceSync};
