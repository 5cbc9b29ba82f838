//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions. What a key means depends on
//! [`InputMode`]: browsing the feed or typing a date.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_browse_key`] that calls it.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if matches!(app.mode, InputMode::EnterDate(_)) {
        handle_date_entry_key(app, key);
    } else {
        handle_browse_key(app, key);
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Left | KeyCode::Char('h') => app.previous_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Char('[') => app.previous_month(),
        KeyCode::Char(']') => app.next_month(),
        KeyCode::Char('t') => app.jump_to_today(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('d') | KeyCode::Char('/') => app.begin_date_entry(),
        KeyCode::Tab => app.next_category(),
        KeyCode::BackTab => app.previous_category(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

fn handle_date_entry_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_date_entry(),
        KeyCode::Esc => app.cancel_date_entry(),
        KeyCode::Backspace => app.pop_date_char(),
        KeyCode::Char(c) => app.push_date_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadState;
    use crate::source::Category;
    use chrono::NaiveDate;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        let mut app = App::new(ymd(2024, 2, 29));
        app.take_requests();
        app
    }

    #[test]
    fn q_and_esc_quit_while_browsing() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('q')));
        assert!(a.quit);

        let mut b = app();
        handle_key_event(&mut b, press(KeyCode::Esc));
        assert!(b.quit);
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut a = app();
        a.begin_date_entry();
        handle_key_event(&mut a, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(a.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut a = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut a, key);
        assert!(!a.quit);
    }

    #[test]
    fn arrows_step_days_and_brackets_step_months() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Right));
        assert_eq!(a.date, ymd(2024, 3, 1));
        handle_key_event(&mut a, press(KeyCode::Char('h')));
        assert_eq!(a.date, ymd(2024, 2, 29));
        handle_key_event(&mut a, press(KeyCode::Char(']')));
        assert_eq!(a.date, ymd(2024, 3, 29));
        handle_key_event(&mut a, press(KeyCode::Char('[')));
        assert_eq!(a.date, ymd(2024, 2, 29));
        assert_eq!(a.take_requests().len(), 4);
        assert_eq!(a.load, LoadState::Loading);
    }

    #[test]
    fn r_reloads_current_date() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('r')));
        let requests = a.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].date, ymd(2024, 2, 29));
    }

    #[test]
    fn tab_cycles_categories() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Tab));
        assert_eq!(a.category, Category::Deaths);
        handle_key_event(&mut a, press(KeyCode::BackTab));
        handle_key_event(&mut a, press(KeyCode::BackTab));
        assert_eq!(a.category, Category::Selected);
    }

    #[test]
    fn typing_a_date_selects_it() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('d')));
        for c in "2000-01-01".chars() {
            handle_key_event(&mut a, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut a, press(KeyCode::Enter));
        assert_eq!(a.mode, InputMode::Browse);
        assert_eq!(a.date, ymd(2000, 1, 1));
    }

    #[test]
    fn q_is_text_while_entering_date() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('/')));
        handle_key_event(&mut a, press(KeyCode::Char('q')));
        assert!(!a.quit);

        handle_key_event(&mut a, press(KeyCode::Esc));
        assert_eq!(a.mode, InputMode::Browse);
        assert!(!a.quit, "esc only closes the date entry");
    }

    #[test]
    fn backspace_edits_typed_date() {
        let mut a = app();
        handle_key_event(&mut a, press(KeyCode::Char('d')));
        handle_key_event(&mut a, press(KeyCode::Char('1')));
        handle_key_event(&mut a, press(KeyCode::Char('2')));
        handle_key_event(&mut a, press(KeyCode::Backspace));
        assert_eq!(a.mode, InputMode::EnterDate("1".into()));
    }
}
