//! Channel-backed counter source.
//!
//! Completions are pushed in by the holder of a [`ChannelHandle`] instead
//! of coming from a network. This is the seam the app tests use to drive
//! fetch lifecycles deterministically, and it doubles as an embedding
//! point for callers that already have bundle data in hand.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{CounterSource, FetchEvent, PollHandle};

/// A recorded fetch request, observable through [`ChannelHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// A counter-list fetch.
    List { ns: String },
    /// A single-counter fetch, possibly delayed (realtime poll tick).
    Counter {
        ns: String,
        id: String,
        epoch: u64,
        delay: Duration,
    },
}

/// Producer side of a [`ChannelSource`].
///
/// Pushes fetch events into the source and exposes the log of requests
/// the app has issued so far.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    tx: mpsc::Sender<FetchEvent>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl ChannelHandle {
    /// Deliver a fetch event to the source.
    pub fn send(&self, event: FetchEvent) {
        let _ = self.tx.send(event);
    }

    /// Snapshot of all requests issued so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// A counter source fed through a channel.
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<FetchEvent>,
    requests: Arc<Mutex<Vec<Request>>>,
    description: String,
}

impl ChannelSource {
    /// Create a handle/source pair.
    pub fn create(description: &str) -> (ChannelHandle, Self) {
        let (tx, rx) = mpsc::channel();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handle = ChannelHandle { tx, requests: requests.clone() };
        let source = Self {
            receiver: rx,
            requests,
            description: format!("channel: {}", description),
        };
        (handle, source)
    }

    fn record(&mut self, request: Request) {
        self.requests.lock().unwrap().push(request);
    }
}

impl CounterSource for ChannelSource {
    fn request_list(&mut self, ns: &str) {
        self.record(Request::List { ns: ns.to_string() });
    }

    fn request_counter(&mut self, ns: &str, id: &str, epoch: u64) -> PollHandle {
        self.request_counter_after(ns, id, epoch, Duration::ZERO)
    }

    fn request_counter_after(
        &mut self,
        ns: &str,
        id: &str,
        epoch: u64,
        delay: Duration,
    ) -> PollHandle {
        self.record(Request::Counter {
            ns: ns.to_string(),
            id: id.to_string(),
            epoch,
            delay,
        });
        PollHandle::noop()
    }

    fn poll(&mut self) -> Option<FetchEvent> {
        self.receiver.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_requests_and_delivers_events() {
        let (handle, mut source) = ChannelSource::create("test");

        source.request_list("teamA");
        let _poll = source.request_counter("teamA", "clicks", 3);

        assert_eq!(
            handle.requests(),
            vec![
                Request::List { ns: "teamA".into() },
                Request::Counter {
                    ns: "teamA".into(),
                    id: "clicks".into(),
                    epoch: 3,
                    delay: Duration::ZERO,
                },
            ]
        );

        assert!(source.poll().is_none());
        handle.send(FetchEvent::List { ns: "teamA".into(), result: Ok(vec![]) });
        assert!(matches!(source.poll(), Some(FetchEvent::List { .. })));
        assert!(source.poll().is_none());
    }

    #[test]
    fn description_names_the_channel() {
        let (_handle, source) = ChannelSource::create("embedded");
        assert_eq!(source.description(), "channel: embedded");
    }
}
