//! Counter data source abstraction.
//!
//! This module provides a trait-based abstraction for fetching counter
//! lists and raw sample bundles. The HTTP implementation runs requests on
//! a tokio runtime and delivers results as [`FetchEvent`]s over a channel;
//! the channel implementation lets tests and embedders push events
//! directly.

mod channel;
mod http;

pub use channel::{ChannelHandle, ChannelSource, Request};
pub use http::{ApiClient, HttpSource};

use std::fmt::Debug;
use std::time::Duration;

use crate::data::RawBundle;

/// A completed fetch, delivered asynchronously to the app loop.
///
/// Errors travel as display strings; the app renders them, it does not
/// branch on their kind. A transport failure and a malformed payload are
/// deliberately indistinguishable here.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// Result of a counter-list fetch for a namespace.
    List {
        ns: String,
        result: Result<Vec<String>, String>,
    },
    /// Result of a single counter fetch.
    ///
    /// `epoch` echoes the value passed at request time; the app discards
    /// events whose epoch no longer matches the owning card.
    Counter {
        ns: String,
        id: String,
        epoch: u64,
        result: Result<RawBundle, String>,
    },
}

/// Handle to a scheduled fetch task.
///
/// Returned by every counter request so the owner can cancel a pending
/// tick on teardown or mode change. Dropping the handle also cancels,
/// which makes "replace the handle" the natural way to supersede a poll.
#[derive(Debug)]
pub struct PollHandle(Option<tokio::task::JoinHandle<()>>);

impl PollHandle {
    /// Wrap a spawned task.
    pub(crate) fn new(handle: tokio::task::JoinHandle<()>) -> Self {
        Self(Some(handle))
    }

    /// A handle with nothing behind it, for sources that complete
    /// requests synchronously.
    pub fn noop() -> Self {
        Self(None)
    }

    /// Cancel the scheduled task. Cancelling an already-finished task is
    /// harmless.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Trait for fetching counter data from a backend.
///
/// Requests are fire-and-forget; completions arrive later via [`poll`],
/// which must be non-blocking. The app loop drains events once per
/// iteration.
///
/// [`poll`]: CounterSource::poll
pub trait CounterSource: Send + Debug {
    /// Request the counter identifier list for a namespace.
    fn request_list(&mut self, ns: &str);

    /// Request one counter's raw bundle immediately.
    fn request_counter(&mut self, ns: &str, id: &str, epoch: u64) -> PollHandle;

    /// Request one counter's raw bundle after a delay.
    ///
    /// Used for the realtime poll loop: the next tick is scheduled only
    /// after the previous response arrives, so in-flight requests never
    /// overlap per counter.
    fn request_counter_after(
        &mut self,
        ns: &str,
        id: &str,
        epoch: u64,
        delay: Duration,
    ) -> PollHandle;

    /// Poll for a completed fetch, without blocking.
    fn poll(&mut self) -> Option<FetchEvent>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
