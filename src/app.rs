//! Application state and counter card lifecycles.

use std::time::{Duration, Instant};

use crate::data::{ChartSeries, Mode, ModeSeries, RawBundle};
use crate::source::{CounterSource, FetchEvent, PollHandle};
use crate::store::NamespaceStore;
use crate::ui::Theme;

/// Lifecycle state of one counter card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    /// Initial fetch (or a retry) is in flight.
    Loading,
    /// A bundle has been received; series are derived and renderable.
    Ready,
    /// The last fetch failed; the reason is shown with a retry affordance.
    Failed(String),
}

/// One counter's state: fetch lifecycle, display mode, and derived series.
///
/// Each card owns its bundle, its poll handle, and an epoch. The epoch is
/// bumped whenever the card's pending work is invalidated (teardown,
/// retry), so a late response from a superseded fetch is discarded instead
/// of resurrecting stale state.
#[derive(Debug)]
pub struct Card {
    /// Counter identifier within the namespace; also the card key.
    pub id: String,
    pub state: CardState,
    /// Current display granularity. Changing it never re-fetches: the
    /// bundle already contains all four.
    pub mode: Mode,
    /// The raw payload behind the series, replaced wholesale on re-fetch.
    pub bundle: Option<RawBundle>,
    /// Chart series for all four modes, derived from `bundle`.
    pub series: Option<ModeSeries>,
    pub epoch: u64,
    poll: Option<PollHandle>,
}

impl Card {
    fn new(id: String) -> Self {
        Self {
            id,
            state: CardState::Loading,
            mode: Mode::default(),
            bundle: None,
            series: None,
            epoch: 0,
            poll: None,
        }
    }

    /// The all-time total, once a bundle has arrived.
    pub fn total(&self) -> Option<u64> {
        self.bundle.as_ref().map(|b| b.total())
    }

    /// The chart series for the current mode, once derived.
    pub fn current_series(&self) -> Option<&ChartSeries> {
        self.series.as_ref().map(|s| s.get(self.mode))
    }

    /// Whether a poll tick or fetch is currently scheduled.
    pub fn has_pending_poll(&self) -> bool {
        self.poll.is_some()
    }

    fn cancel_poll(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.cancel();
        }
    }
}

/// Fetch state of the counter list for the active namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
    Failed(String),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub theme: Theme,

    source: Box<dyn CounterSource>,
    pub store: NamespaceStore,
    pub list: ListState,
    pub cards: Vec<Card>,

    // Navigation state
    pub selected: usize,
    pub show_detail: bool,
    pub show_help: bool,

    // Namespace entry prompt
    pub input_active: bool,
    pub input_text: String,

    refresh: Duration,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an App over the given source and namespace store.
    ///
    /// If the store already holds a namespace, the counter list fetch
    /// starts immediately; otherwise the namespace prompt is shown.
    pub fn new(source: Box<dyn CounterSource>, store: NamespaceStore, refresh: Duration) -> Self {
        let mut app = Self {
            running: true,
            theme: Theme::auto_detect(),
            source,
            store,
            list: ListState::Ready,
            cards: Vec::new(),
            selected: 0,
            show_detail: false,
            show_help: false,
            input_active: false,
            input_text: String::new(),
            refresh,
            status_message: None,
        };

        match app.store.get().map(str::to_string) {
            Some(ns) => {
                app.list = ListState::Loading;
                app.source.request_list(&ns);
            }
            None => app.input_active = true,
        }
        app
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    // ----- fetch lifecycle -----

    /// Drain all completed fetches from the source.
    pub fn pump_source(&mut self) {
        while let Some(event) = self.source.poll() {
            self.handle_fetch(event);
        }
    }

    /// Apply one completed fetch.
    ///
    /// Events for a namespace other than the active one are dropped, as
    /// are counter events whose epoch no longer matches the card: both
    /// are late responses from torn-down work.
    pub fn handle_fetch(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::List { ns, result } => {
                if self.store.get() != Some(ns.as_str()) {
                    return;
                }
                match result {
                    Ok(ids) => {
                        self.list = ListState::Ready;
                        self.cards = ids.into_iter().map(Card::new).collect();
                        self.selected = 0;
                        for i in 0..self.cards.len() {
                            let id = self.cards[i].id.clone();
                            let epoch = self.cards[i].epoch;
                            self.cards[i].poll =
                                Some(self.source.request_counter(&ns, &id, epoch));
                        }
                    }
                    Err(e) => {
                        self.list = ListState::Failed(e);
                        self.cards.clear();
                    }
                }
            }
            FetchEvent::Counter { ns, id, epoch, result } => {
                if self.store.get() != Some(ns.as_str()) {
                    return;
                }
                let Some(idx) = self.cards.iter().position(|c| c.id == id) else {
                    return;
                };
                if self.cards[idx].epoch != epoch {
                    return;
                }
                match result {
                    Ok(bundle) => {
                        let series = ModeSeries::derive(&bundle);
                        let card = &mut self.cards[idx];
                        card.series = Some(series);
                        card.bundle = Some(bundle);
                        card.state = CardState::Ready;
                        if card.mode == Mode::Realtime {
                            // Self-paced cadence: the next tick is armed only
                            // once the previous response has landed.
                            card.poll = Some(self.source.request_counter_after(
                                &ns,
                                &id,
                                epoch,
                                self.refresh,
                            ));
                        } else {
                            card.poll = None;
                        }
                    }
                    Err(e) => {
                        let card = &mut self.cards[idx];
                        card.state = CardState::Failed(e);
                        card.poll = None;
                    }
                }
            }
        }
    }

    /// Switch the selected card's display mode.
    ///
    /// Pure state update; no fetch. Entering realtime arms the poll loop,
    /// leaving it cancels the pending tick.
    pub fn set_mode(&mut self, mode: Mode) {
        let Some(ns) = self.store.get().map(str::to_string) else {
            return;
        };
        let refresh = self.refresh;
        let Some(card) = self.cards.get_mut(self.selected) else {
            return;
        };
        if card.mode == mode {
            return;
        }
        card.mode = mode;

        if mode == Mode::Realtime {
            if card.state == CardState::Ready && card.poll.is_none() {
                card.poll =
                    Some(self.source.request_counter_after(&ns, &card.id, card.epoch, refresh));
            }
        } else {
            card.cancel_poll();
        }
    }

    /// Re-fetch after a failure: the selected card if it failed, the
    /// counter list otherwise.
    pub fn retry(&mut self) {
        if matches!(self.list, ListState::Failed(_)) {
            self.reload_list();
            return;
        }
        let Some(ns) = self.store.get().map(str::to_string) else {
            return;
        };
        let selected_failed = self
            .cards
            .get(self.selected)
            .is_some_and(|c| matches!(c.state, CardState::Failed(_)));
        if selected_failed {
            let card = &mut self.cards[self.selected];
            card.state = CardState::Loading;
            card.epoch += 1;
            card.poll = Some(self.source.request_counter(&ns, &card.id, card.epoch));
        } else {
            self.reload_list();
        }
    }

    /// Re-fetch the counter list for the active namespace.
    pub fn reload_list(&mut self) {
        let Some(ns) = self.store.get().map(str::to_string) else {
            return;
        };
        self.teardown_cards();
        self.cards.clear();
        self.list = ListState::Loading;
        self.selected = 0;
        self.show_detail = false;
        self.source.request_list(&ns);
    }

    /// Invalidate all pending card work: bump epochs and cancel polls.
    fn teardown_cards(&mut self) {
        for card in &mut self.cards {
            card.epoch += 1;
            card.cancel_poll();
        }
    }

    // ----- namespace -----

    /// Switch to a namespace: tear down all cards, persist the selection,
    /// and mount the counter list.
    pub fn set_namespace(&mut self, ns: &str) {
        self.teardown_cards();
        self.cards.clear();
        self.store.set(ns);
        self.list = ListState::Loading;
        self.selected = 0;
        self.show_detail = false;
        self.input_active = false;
        self.input_text.clear();
        self.source.request_list(ns);
        self.set_status_message(format!("Switched to namespace '{}'", ns));
    }

    /// Open the namespace entry prompt.
    pub fn start_namespace_input(&mut self) {
        self.input_active = true;
        self.input_text.clear();
    }

    /// Close the prompt without switching. With no namespace selected yet
    /// there is nothing to fall back to, so the prompt stays open.
    pub fn cancel_namespace_input(&mut self) {
        self.input_text.clear();
        if self.store.get().is_some() {
            self.input_active = false;
        }
    }

    /// Submit the prompt. Any non-empty string is accepted.
    pub fn submit_namespace(&mut self) {
        let ns = self.input_text.trim().to_string();
        if ns.is_empty() {
            return;
        }
        self.set_namespace(&ns);
    }

    pub fn input_push(&mut self, c: char) {
        self.input_text.push(c);
    }

    pub fn input_pop(&mut self) {
        self.input_text.pop();
    }

    // ----- navigation -----

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards.get(self.selected)
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.cards.len().saturating_sub(1);
        self.selected = (self.selected + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.cards.len().saturating_sub(1);
    }

    /// Open the detail overlay for the selected card.
    pub fn enter_detail(&mut self) {
        if self.selected_card().is_some() {
            self.show_detail = true;
        }
    }

    pub fn close_detail(&mut self) {
        self.show_detail = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Counters with a received bundle.
    pub fn ready_count(&self) -> usize {
        self.cards.iter().filter(|c| c.state == CardState::Ready).count()
    }

    /// Counters in the failed state.
    pub fn failed_count(&self) -> usize {
        self.cards.iter().filter(|c| matches!(c.state, CardState::Failed(_))).count()
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::source::{ChannelHandle, ChannelSource, Request};

    fn bundle() -> RawBundle {
        RawBundle {
            now: DateTime::parse_from_rfc3339("2024-06-15T12:00:00+00:00").unwrap(),
            total: vec![42],
            realtime: vec![1, 0, 2],
            day: vec![7, 0],
            month: vec![0, 3, 5],
            year: vec![9],
        }
    }

    fn test_app() -> (ChannelHandle, App) {
        let (handle, source) = ChannelSource::create("test");
        let app = App::new(
            Box::new(source),
            NamespaceStore::new(),
            Duration::from_millis(1000),
        );
        (handle, app)
    }

    fn app_with_cards(ids: &[&str]) -> (ChannelHandle, App) {
        let (handle, mut app) = test_app();
        app.set_namespace("test");
        app.handle_fetch(FetchEvent::List {
            ns: "test".into(),
            result: Ok(ids.iter().map(|s| s.to_string()).collect()),
        });
        (handle, app)
    }

    fn counter_ok(ns: &str, id: &str, epoch: u64) -> FetchEvent {
        FetchEvent::Counter {
            ns: ns.into(),
            id: id.into(),
            epoch,
            result: Ok(bundle()),
        }
    }

    #[test]
    fn starts_with_prompt_when_no_namespace() {
        let (handle, app) = test_app();
        assert!(app.input_active);
        assert_eq!(handle.request_count(), 0);
    }

    #[test]
    fn namespace_submit_mounts_counter_list() {
        let (handle, mut app) = test_app();
        for c in "teamA".chars() {
            app.input_push(c);
        }
        app.submit_namespace();

        assert_eq!(app.store.get(), Some("teamA"));
        assert!(!app.input_active);
        assert_eq!(app.list, ListState::Loading);
        assert_eq!(handle.requests(), vec![Request::List { ns: "teamA".into() }]);
    }

    #[test]
    fn blank_namespace_is_not_submitted() {
        let (handle, mut app) = test_app();
        app.input_push(' ');
        app.submit_namespace();
        assert!(app.store.get().is_none());
        assert_eq!(handle.request_count(), 0);
    }

    #[test]
    fn list_response_mounts_one_card_per_id() {
        let (handle, app) = app_with_cards(&["a", "b"]);

        assert_eq!(app.list, ListState::Ready);
        assert_eq!(app.cards.len(), 2);
        assert!(app.cards.iter().all(|c| c.state == CardState::Loading));
        assert_eq!(app.cards[0].mode, Mode::Month);

        // One list request plus one counter fetch per card.
        let requests = handle.requests();
        assert_eq!(requests.len(), 3);
        assert!(matches!(&requests[1], Request::Counter { id, .. } if id == "a"));
        assert!(matches!(&requests[2], Request::Counter { id, .. } if id == "b"));
    }

    #[test]
    fn empty_list_renders_no_cards() {
        let (_handle, app) = app_with_cards(&[]);
        assert_eq!(app.list, ListState::Ready);
        assert!(app.cards.is_empty());
    }

    #[test]
    fn card_transitions_loading_to_ready() {
        let (_handle, mut app) = app_with_cards(&["a"]);
        app.handle_fetch(counter_ok("test", "a", 0));

        let card = &app.cards[0];
        assert_eq!(card.state, CardState::Ready);
        assert_eq!(card.total(), Some(42));
        let series = card.current_series().unwrap();
        assert_eq!(series.hits, vec![5, 3, 0]);
    }

    #[test]
    fn fetch_error_fails_only_that_card() {
        let (_handle, mut app) = app_with_cards(&["a", "b"]);
        app.handle_fetch(FetchEvent::Counter {
            ns: "test".into(),
            id: "a".into(),
            epoch: 0,
            result: Err("connection refused".into()),
        });

        assert_eq!(app.cards[0].state, CardState::Failed("connection refused".into()));
        assert_eq!(app.cards[1].state, CardState::Loading);
    }

    #[test]
    fn retry_refetches_failed_card_under_new_epoch() {
        let (handle, mut app) = app_with_cards(&["a"]);
        app.handle_fetch(FetchEvent::Counter {
            ns: "test".into(),
            id: "a".into(),
            epoch: 0,
            result: Err("boom".into()),
        });

        app.retry();
        assert_eq!(app.cards[0].state, CardState::Loading);
        assert_eq!(app.cards[0].epoch, 1);
        assert!(matches!(
            handle.requests().last(),
            Some(Request::Counter { epoch: 1, .. })
        ));

        // The old fetch completing late must not clobber the retry.
        app.handle_fetch(counter_ok("test", "a", 0));
        assert_eq!(app.cards[0].state, CardState::Loading);
    }

    #[test]
    fn list_failure_is_terminal_until_retried() {
        let (handle, mut app) = test_app();
        app.set_namespace("test");
        app.handle_fetch(FetchEvent::List {
            ns: "test".into(),
            result: Err("503".into()),
        });
        assert_eq!(app.list, ListState::Failed("503".into()));

        app.retry();
        assert_eq!(app.list, ListState::Loading);
        assert_eq!(
            handle.requests().last(),
            Some(&Request::List { ns: "test".into() })
        );
    }

    #[test]
    fn mode_change_does_not_fetch() {
        let (handle, mut app) = app_with_cards(&["a"]);
        app.handle_fetch(counter_ok("test", "a", 0));
        let before = handle.request_count();

        app.set_mode(Mode::Day);
        assert_eq!(app.cards[0].mode, Mode::Day);
        assert_eq!(handle.request_count(), before);
    }

    #[test]
    fn entering_realtime_arms_the_poll_loop() {
        let (handle, mut app) = app_with_cards(&["a"]);
        app.handle_fetch(counter_ok("test", "a", 0));

        app.set_mode(Mode::Realtime);
        assert!(matches!(
            handle.requests().last(),
            Some(Request::Counter { delay, .. }) if *delay == Duration::from_millis(1000)
        ));

        // Each response schedules the next tick.
        let before = handle.request_count();
        app.handle_fetch(counter_ok("test", "a", 0));
        assert_eq!(handle.request_count(), before + 1);
    }

    #[test]
    fn leaving_realtime_stops_the_poll_loop() {
        let (handle, mut app) = app_with_cards(&["a"]);
        app.handle_fetch(counter_ok("test", "a", 0));
        app.set_mode(Mode::Realtime);

        app.set_mode(Mode::Month);
        assert!(!app.cards[0].has_pending_poll());

        // A response already in flight still lands, but no further tick
        // is scheduled once the mode is no longer realtime.
        let before = handle.request_count();
        app.handle_fetch(counter_ok("test", "a", 0));
        assert_eq!(app.cards[0].state, CardState::Ready);
        assert_eq!(handle.request_count(), before);
        assert!(!app.cards[0].has_pending_poll());
    }

    #[test]
    fn namespace_switch_discards_late_responses() {
        let (handle, mut app) = app_with_cards(&["a"]);

        app.set_namespace("other");
        let before = handle.request_count();

        // Late response from the torn-down namespace.
        app.handle_fetch(counter_ok("test", "a", 0));
        assert!(app.cards.is_empty());
        assert_eq!(handle.request_count(), before);
    }

    #[test]
    fn stale_list_response_is_ignored() {
        let (_handle, mut app) = test_app();
        app.set_namespace("one");
        app.set_namespace("two");

        app.handle_fetch(FetchEvent::List {
            ns: "one".into(),
            result: Ok(vec!["ghost".into()]),
        });
        assert!(app.cards.is_empty());
        assert_eq!(app.list, ListState::Loading);
    }

    #[test]
    fn selection_is_clamped_to_cards() {
        let (_handle, mut app) = app_with_cards(&["a", "b"]);
        app.select_next_n(10);
        assert_eq!(app.selected, 1);
        app.select_prev_n(10);
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn detail_requires_a_card() {
        let (_handle, mut app) = app_with_cards(&[]);
        app.enter_detail();
        assert!(!app.show_detail);

        let (_handle, mut app) = app_with_cards(&["a"]);
        app.enter_detail();
        assert!(app.show_detail);
    }
}
