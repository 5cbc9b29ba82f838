//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a vertical stack: header, date bar, body, footer and a
//!   one-line status bar. The body shows either the loading panel, the error
//!   banner, or the category tabs above a card list and a detail pane.
//! * Colours and styles are defined inline.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode, LoadState};
use crate::date::{display_date, format_for_feed};
use crate::source::{Category, Entry, FeedResult};

/// Extracts longer than this are cut and end with `...`.
const EXTRACT_LIMIT: usize = 150;

const NO_DESCRIPTION: &str = "No description available";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [header_area, date_area, body_area, footer_area, status_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(app, frame, header_area);
    draw_date_bar(app, frame, date_area);

    match &app.load {
        LoadState::Loading => draw_loading(frame, body_area),
        LoadState::Error(message) => draw_error(message, frame, body_area),
        LoadState::Ready(_) => {
            draw_feed(app, frame, body_area);
            draw_footer(app, frame, footer_area);
        }
    }

    draw_status_bar(app, frame, status_area);
}

fn draw_header(app: &App, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::styled(
            "On This Day",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ),
        Line::styled(
            format!("Who was born, who died and what happened on {}", display_date(app.date)),
            Style::default().fg(Color::Gray),
        ),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_date_bar(app: &App, frame: &mut Frame, area: Rect) {
    let line = match &app.mode {
        InputMode::EnterDate(typed) => Line::from(vec![
            Span::raw(" Date: "),
            Span::styled(
                format!("{typed}_"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (YYYY-MM-DD)", Style::default().fg(Color::DarkGray)),
        ]),
        InputMode::Browse => {
            let params = format_for_feed(app.date);
            Line::from(vec![
                Span::raw(" Date: "),
                Span::styled(
                    app.date.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  feed {}/{}", params.month, params.day),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
    };

    let bar = Paragraph::new(line).block(
        Block::default()
            .title(" Choose a date ")
            .borders(Borders::ALL),
    );
    frame.render_widget(bar, area);
}

fn draw_loading(frame: &mut Frame, area: Rect) {
    let loading = Paragraph::new(Line::styled(
        "Loading…",
        Style::default().fg(Color::Blue),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(loading, area);
}

fn draw_error(message: &str, frame: &mut Frame, area: Rect) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("⚠ ", Style::default().fg(Color::Red)),
        Span::styled(message, Style::default().fg(Color::LightRed)),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

fn draw_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(feed) = app.feed() else {
        return;
    };

    let [tabs_area, cards_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(cards_area);

    frame.render_widget(category_tabs(feed, app.category), tabs_area);

    let entries = feed.displayed(app.category);
    if entries.is_empty() {
        let empty = Paragraph::new(Line::styled(
            app.category.empty_message(),
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, cards_area);
        return;
    }

    let list = card_list(entries, app.category);
    let detail = app
        .selected_entry()
        .map(|entry| detail_pane(entry, app.category));

    frame.render_stateful_widget(list, list_area, &mut app.list_state);
    if let Some(detail) = detail {
        frame.render_widget(detail, detail_area);
    }
}

fn category_tabs(feed: &FeedResult, active: Category) -> Tabs<'static> {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .map(|c| Line::from(format!("{} ({})", c.label(), feed.entries(*c).len())))
        .collect();
    let index = Category::ALL.iter().position(|c| *c == active).unwrap_or(0);

    Tabs::new(titles)
        .select(index)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
}

/// One card per entry: the entry text above its caption.
fn card_list(entries: &[Entry], category: Category) -> List<'static> {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let text = if entry.text.is_empty() {
                "(untitled)".to_string()
            } else {
                entry.text.clone()
            };
            ListItem::new(Text::from(vec![
                Line::styled(text, Style::default().fg(Color::White)),
                Line::styled(category.caption(entry), Style::default().fg(Color::Blue)),
            ]))
        })
        .collect();

    List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", category.label()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ")
}

fn detail_pane(entry: &Entry, category: Category) -> Paragraph<'static> {
    let mut lines = vec![
        Line::styled(
            entry.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(category.caption(entry), Style::default().fg(Color::Blue)),
        Line::raw(""),
        Line::styled(
            truncate_extract(entry.extract().unwrap_or(NO_DESCRIPTION)),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(title) = entry.page_title() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Article: {title}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(url) = entry.thumbnail_url() {
        lines.push(Line::styled(
            format!("Image: {url}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(" Details ").borders(Borders::ALL))
}

fn draw_footer(app: &App, frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::styled(
        format!(
            "Data provided by Wikipedia • showing up to {} results in {}",
            app.category.display_cap(),
            app.category.label()
        ),
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let help = match app.mode {
        InputMode::Browse => "q: quit  ←/→: day  [/]: month  t: today  d: date  r: reload  Tab: category  ↑/↓: scroll",
        InputMode::EnterDate(_) => "Enter: apply  Esc: cancel  Backspace: delete",
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::raw(help),
    ]));
    frame.render_widget(status, area);
}

/// Cut `text` to [`EXTRACT_LIMIT`] characters, marking the cut with `...`.
fn truncate_extract(text: &str) -> String {
    if text.chars().count() > EXTRACT_LIMIT {
        let cut: String = text.chars().take(EXTRACT_LIMIT).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
