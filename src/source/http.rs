//! HTTP-backed counter source.
//!
//! Fetches counter lists and raw bundles from an incr server over its
//! JSON REST API. Requests run as spawned tasks on a tokio runtime; each
//! task sends exactly one [`FetchEvent`] back over an mpsc channel that
//! the synchronous TUI loop drains via `poll()`.

use std::time::Duration;

use reqwest::Url;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::{CounterSource, FetchEvent, PollHandle};
use crate::data::RawBundle;

/// Request timeout. The card surfaces the failure and offers a retry, so
/// hanging forever on a dead server would only hide the problem.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Async client for the incr counter API.
///
/// Two endpoints:
/// - `GET {base}/api/{ns}` → JSON array of counter identifiers (or null)
/// - `GET {base}/api/{ns}/{id}` → raw sample bundle
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Build a client for the given base URL, e.g. `http://localhost:8080`.
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base)?;
        anyhow::ensure!(
            !base.cannot_be_a_base(),
            "base URL cannot carry path segments: {base}"
        );
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, base })
    }

    /// Join path segments onto the base URL, percent-encoding as needed.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Fetch the counter identifier list for a namespace.
    ///
    /// A JSON `null` body degrades to an empty list; that is the server's
    /// way of saying "namespace exists but holds nothing".
    pub async fn list(&self, ns: &str) -> Result<Vec<String>, String> {
        let url = self.url(&["api", ns]);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| format!("request failed: {e}"))?;

        let list: Option<Vec<String>> =
            resp.json().await.map_err(|e| format!("malformed response: {e}"))?;
        Ok(list.unwrap_or_default())
    }

    /// Fetch the raw sample bundle for one counter.
    pub async fn query(&self, ns: &str, id: &str) -> Result<RawBundle, String> {
        let url = self.url(&["api", ns, id]);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| format!("request failed: {e}"))?;

        resp.json().await.map_err(|e| format!("malformed response: {e}"))
    }
}

/// A counter source backed by an [`ApiClient`].
///
/// Holds a runtime handle so fetches can be spawned from the synchronous
/// TUI loop; the runtime itself lives in `main` and outlives the loop.
#[derive(Debug)]
pub struct HttpSource {
    client: ApiClient,
    runtime: Handle,
    tx: mpsc::Sender<FetchEvent>,
    rx: mpsc::Receiver<FetchEvent>,
    description: String,
}

impl HttpSource {
    /// Create a source that spawns requests on the given runtime.
    pub fn new(client: ApiClient, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let description = format!("api: {}", client.base);
        Self { client, runtime, tx, rx, description }
    }
}

impl CounterSource for HttpSource {
    fn request_list(&mut self, ns: &str) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let ns = ns.to_string();
        self.runtime.spawn(async move {
            let result = client.list(&ns).await;
            let _ = tx.send(FetchEvent::List { ns, result }).await;
        });
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
        let client = self.client.clone();
        let tx = self.tx.clone();
        let ns = ns.to_string();
        let id = id.to_string();
        let handle = self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = client.query(&ns, &id).await;
            let _ = tx.send(FetchEvent::Counter { ns, id, epoch, result }).await;
        });
        PollHandle::new(handle)
    }

    fn poll(&mut self) -> Option<FetchEvent> {
        self.rx.try_recv().ok()
    }

    fn description(&self) -> &str {
        &self.description
    }
}
