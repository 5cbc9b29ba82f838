//! Application state.
//!
//! [`App`] owns everything the UI shows: the selected date, the load state
//! of the current fetch cycle, the active category and the card selection.
//! It changes only through the transition methods below; the main loop
//! spawns whatever requests [`App::take_requests`] hands out and feeds the
//! completions back through [`App::apply`].

use chrono::NaiveDate;
use ratatui::widgets::ListState;
use tracing::{debug, info};

use crate::date::{self, display_date};
use crate::fetch::{FetchMsg, FetchRequest};
use crate::source::{Category, Entry, FeedResult};

/// Generic message shown when a fetch fails. The cause goes to the log.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data. Try again.";

/// Longest accepted date entry, `YYYY-MM-DD`.
const DATE_INPUT_LEN: usize = 10;

/// Status of the current fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Error(String),
    Ready(FeedResult),
}

/// What key presses currently mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    /// Typing a `YYYY-MM-DD` date; holds the text typed so far.
    EnterDate(String),
}

pub struct App {
    /// The selected calendar day.
    pub date: NaiveDate,
    pub load: LoadState,
    /// Category whose cards are listed.
    pub category: Category,
    /// Card selection for scrolling.
    pub list_state: ListState,
    pub mode: InputMode,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    /// Token of the most recent request; only its completion is applied.
    latest_token: u64,
    /// Requests waiting to be spawned by the main loop.
    pending: Vec<FetchRequest>,
}

impl App {
    /// Create the app with `date` selected and its fetch queued.
    pub fn new(date: NaiveDate) -> Self {
        let mut app = Self {
            date,
            load: LoadState::Loading,
            category: Category::Births,
            list_state: ListState::default(),
            mode: InputMode::Browse,
            quit: false,
            status: String::new(),
            latest_token: 0,
            pending: Vec::new(),
        };
        app.select_date(date);
        app
    }

    // -- fetch cycle ---------------------------------------------------------

    /// Select `date` and start a new fetch cycle, even when `date` is
    /// already selected.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.latest_token += 1;
        self.date = date;
        self.load = LoadState::Loading;
        self.list_state.select(None);
        self.status = format!("Loading {}…", display_date(date));
        self.pending.push(FetchRequest {
            token: self.latest_token,
            date,
        });
        debug!(token = self.latest_token, %date, "date selected");
    }

    /// Hand the queued requests to the caller.
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Apply a finished fetch. Returns `false` when the message belongs to
    /// a superseded request, was fetched for another date, or the cycle has
    /// already ended.
    pub fn apply(&mut self, msg: FetchMsg) -> bool {
        if msg.date != self.date {
            debug!(token = msg.token, date = %msg.date, selected = %self.date, "discarding result for another date");
            return false;
        }
        if msg.fetched.failed {
            self.fetch_failed(msg.token)
        } else {
            self.fetch_succeeded(msg.token, msg.fetched.feed)
        }
    }

    /// Loading → Ready.
    pub fn fetch_succeeded(&mut self, token: u64, feed: FeedResult) -> bool {
        if !self.accepts(token) {
            return false;
        }
        let total: usize = Category::ALL.iter().map(|c| feed.entries(*c).len()).sum();
        info!(token, date = %self.date, total, "feed ready");
        self.status = if feed.is_empty() {
            format!("Nothing recorded for {}", display_date(self.date))
        } else {
            format!("Loaded {total} entries for {}", display_date(self.date))
        };
        self.load = LoadState::Ready(feed);
        self.select_first();
        true
    }

    /// Loading → Error.
    pub fn fetch_failed(&mut self, token: u64) -> bool {
        if !self.accepts(token) {
            return false;
        }
        self.status = "Feed unavailable".into();
        self.load = LoadState::Error(LOAD_ERROR_MESSAGE.into());
        self.list_state.select(None);
        true
    }

    fn accepts(&self, token: u64) -> bool {
        if token != self.latest_token {
            debug!(token, latest = self.latest_token, "discarding stale fetch result");
            return false;
        }
        matches!(self.load, LoadState::Loading)
    }

    /// The feed on screen, if the current cycle succeeded.
    pub fn feed(&self) -> Option<&FeedResult> {
        match &self.load {
            LoadState::Ready(feed) => Some(feed),
            _ => None,
        }
    }

    /// Cards rendered for the active category.
    pub fn visible_entries(&self) -> &[Entry] {
        self.feed()
            .map(|feed| feed.displayed(self.category))
            .unwrap_or(&[])
    }

    /// The highlighted card.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.list_state
            .selected()
            .and_then(|i| self.visible_entries().get(i))
    }

    // -- date navigation -----------------------------------------------------

    pub fn next_day(&mut self) {
        self.select_date(date::step_days(self.date, 1));
    }

    pub fn previous_day(&mut self) {
        self.select_date(date::step_days(self.date, -1));
    }

    pub fn next_month(&mut self) {
        self.select_date(date::step_months(self.date, 1));
    }

    pub fn previous_month(&mut self) {
        self.select_date(date::step_months(self.date, -1));
    }

    pub fn jump_to_today(&mut self) {
        self.select_date(date::today());
    }

    pub fn reload(&mut self) {
        self.select_date(self.date);
    }

    // -- date entry ----------------------------------------------------------

    pub fn begin_date_entry(&mut self) {
        self.mode = InputMode::EnterDate(String::new());
        self.status = "Type a date as YYYY-MM-DD, Enter to apply, Esc to cancel".into();
    }

    pub fn push_date_char(&mut self, c: char) {
        if let InputMode::EnterDate(buf) = &mut self.mode {
            if (c.is_ascii_digit() || c == '-') && buf.len() < DATE_INPUT_LEN {
                buf.push(c);
            }
        }
    }

    pub fn pop_date_char(&mut self) {
        if let InputMode::EnterDate(buf) = &mut self.mode {
            buf.pop();
        }
    }

    pub fn cancel_date_entry(&mut self) {
        self.mode = InputMode::Browse;
        self.status.clear();
    }

    /// Parse the typed date and select it. An invalid date keeps the entry
    /// open and reports the problem in the status bar.
    pub fn submit_date_entry(&mut self) {
        let InputMode::EnterDate(buf) = &self.mode else {
            return;
        };
        match date::parse_date_input(buf) {
            Ok(date) => {
                self.mode = InputMode::Browse;
                self.select_date(date);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    // -- categories ----------------------------------------------------------

    pub fn next_category(&mut self) {
        self.set_category(self.category.next());
    }

    pub fn previous_category(&mut self) {
        self.set_category(self.category.previous());
    }

    fn set_category(&mut self, category: Category) {
        self.category = category;
        self.list_state.select(None);
        self.select_first();
    }

    // -- card navigation -----------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible_entries().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_entries().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.visible_entries().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_entries().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Fetched;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(text: &str) -> Entry {
        Entry {
            year: "1900".into(),
            text: text.into(),
            pages: Vec::new(),
        }
    }

    fn sample_feed() -> FeedResult {
        FeedResult {
            births: vec![entry("a"), entry("b"), entry("c")],
            holidays: vec![entry("h")],
            events: (0..20).map(|i| entry(&format!("e{i}"))).collect(),
            ..FeedResult::empty()
        }
    }

    fn ready_app() -> App {
        let mut app = App::new(ymd(2024, 2, 29));
        let request = app.take_requests()[0];
        assert!(app.fetch_succeeded(request.token, sample_feed()));
        app
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_is_loading_with_one_request_queued() {
        let mut app = App::new(ymd(2024, 2, 29));
        assert_eq!(app.load, LoadState::Loading);
        assert!(!app.quit);
        assert_eq!(app.mode, InputMode::Browse);
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest { token: 1, date: ymd(2024, 2, 29) }]
        );
        assert!(app.take_requests().is_empty(), "requests are handed out once");
    }

    // -- transitions ---------------------------------------------------------

    #[test]
    fn success_moves_to_ready_and_selects_first_card() {
        let app = ready_app();
        assert_eq!(app.feed(), Some(&sample_feed()));
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.selected_entry().map(|e| e.text.as_str()), Some("a"));
    }

    #[test]
    fn failure_moves_to_error_with_generic_message() {
        let mut app = App::new(ymd(2024, 2, 29));
        let msg = FetchMsg {
            token: 1,
            date: ymd(2024, 2, 29),
            fetched: Fetched::unavailable(),
        };
        assert!(app.apply(msg));
        assert_eq!(app.load, LoadState::Error(LOAD_ERROR_MESSAGE.into()));
        assert!(app.feed().is_none());
        assert!(app.visible_entries().is_empty());
    }

    #[test]
    fn result_for_another_date_is_ignored() {
        let mut app = App::new(ymd(2024, 2, 29));
        let msg = FetchMsg {
            token: 1,
            date: ymd(2024, 3, 1),
            fetched: Fetched::ok(sample_feed()),
        };
        assert!(!app.apply(msg));
        assert_eq!(app.load, LoadState::Loading);

        let msg = FetchMsg {
            token: 1,
            date: ymd(2024, 2, 29),
            fetched: Fetched::ok(sample_feed()),
        };
        assert!(app.apply(msg));
    }

    #[test]
    fn cycle_ends_exactly_once() {
        let mut app = App::new(ymd(2024, 2, 29));
        assert!(app.fetch_succeeded(1, sample_feed()));
        assert!(!app.fetch_failed(1), "a finished cycle ignores later completions");
        assert!(app.feed().is_some());
    }

    #[test]
    fn any_state_returns_to_loading_on_date_change() {
        let mut app = ready_app();
        app.select_date(ymd(2024, 3, 1));
        assert_eq!(app.load, LoadState::Loading);
        assert!(app.list_state.selected().is_none());

        assert!(app.fetch_failed(2));
        app.next_day();
        assert_eq!(app.load, LoadState::Loading);
        assert_eq!(app.date, ymd(2024, 3, 2));
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.select_date(ymd(2024, 3, 1));

        assert!(!app.fetch_succeeded(1, sample_feed()));
        assert_eq!(app.load, LoadState::Loading);
        assert!(app.fetch_succeeded(2, FeedResult::empty()));
    }

    #[test]
    fn reselecting_same_date_starts_fresh_cycle() {
        let mut app = ready_app();
        app.reload();
        assert_eq!(app.load, LoadState::Loading);
        assert_eq!(
            app.take_requests(),
            vec![FetchRequest { token: 2, date: ymd(2024, 2, 29) }]
        );
    }

    // -- date navigation -----------------------------------------------------

    #[test]
    fn day_and_month_steps_queue_requests() {
        let mut app = App::new(ymd(2024, 1, 31));
        app.take_requests();

        app.next_month();
        assert_eq!(app.date, ymd(2024, 2, 29));
        app.previous_day();
        assert_eq!(app.date, ymd(2024, 2, 28));
        app.previous_month();
        assert_eq!(app.date, ymd(2024, 1, 28));

        let tokens: Vec<u64> = app.take_requests().iter().map(|r| r.token).collect();
        assert_eq!(tokens, vec![2, 3, 4]);
    }

    // -- date entry ----------------------------------------------------------

    #[test]
    fn typed_date_is_selected_on_submit() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.take_requests();

        app.begin_date_entry();
        for c in "1969-07-20".chars() {
            app.push_date_char(c);
        }
        app.submit_date_entry();

        assert_eq!(app.mode, InputMode::Browse);
        assert_eq!(app.date, ymd(1969, 7, 20));
        assert_eq!(app.take_requests().len(), 1);
    }

    #[test]
    fn date_entry_filters_and_limits_input() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.begin_date_entry();
        for c in "2x024-01-015555".chars() {
            app.push_date_char(c);
        }
        assert_eq!(app.mode, InputMode::EnterDate("2024-01-01".into()));

        app.pop_date_char();
        assert_eq!(app.mode, InputMode::EnterDate("2024-01-0".into()));
    }

    #[test]
    fn invalid_typed_date_keeps_entry_open() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.take_requests();

        app.begin_date_entry();
        for c in "2023-02-29".chars() {
            app.push_date_char(c);
        }
        app.submit_date_entry();

        assert!(matches!(app.mode, InputMode::EnterDate(_)));
        assert!(app.status.contains("YYYY-MM-DD"));
        assert_eq!(app.date, ymd(2024, 2, 29));
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn cancel_leaves_date_untouched() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.begin_date_entry();
        app.push_date_char('1');
        app.cancel_date_entry();
        assert_eq!(app.mode, InputMode::Browse);
        assert_eq!(app.date, ymd(2024, 2, 29));
    }

    // -- categories ----------------------------------------------------------

    #[test]
    fn switching_category_resets_selection() {
        let mut app = ready_app();
        app.select_last();
        assert_eq!(app.list_state.selected(), Some(2));

        app.next_category();
        assert_eq!(app.category, Category::Deaths);
        assert!(app.list_state.selected().is_none(), "no deaths to select");

        app.next_category();
        assert_eq!(app.category, Category::Events);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.visible_entries().len(), 12, "events are capped");

        app.previous_category();
        app.previous_category();
        assert_eq!(app.category, Category::Births);
    }

    // -- card navigation -----------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = App::new(ymd(2024, 2, 29));
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_clamps_at_last_card() {
        let mut app = ready_app();
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = ready_app();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_last_stops_at_display_cap() {
        let mut app = ready_app();
        app.category = Category::Events;
        app.select_last();
        assert_eq!(app.list_state.selected(), Some(11));
    }
}
