//! onthisday — births, deaths, events and holidays from Wikipedia for any
//! calendar day, in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (tasks)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲  FetchRequest         ▲
//!      └───────────────────────┤ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`** — the `FeedSource` trait, the Wikipedia implementation and
//!   the feed normalizer.
//! * **`fetch`** — runs one tokio task per date selection.
//! * **`app`** — owns all application state (date, load state, selection).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`date`**, **`config`**, **`logging`**, **`error`** — supporting pieces.
//! * **`main`** — wires everything together: load config, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod date;
mod error;
mod fetch;
mod input;
mod logging;
mod source;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use app::App;
use config::Config;
use source::{FeedSource, WikipediaSource};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic output is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let _log_guard = logging::init(&config.log_dir, &config.log_level)?;
    info!(endpoint = %config.endpoint, start = %config.start_date, "starting");

    let source: Arc<dyn FeedSource> =
        Arc::new(WikipediaSource::new(&config.endpoint, &config.user_agent)?);
    let (fetcher, mut rx) = fetch::channel(source);

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.start_date);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Spawn fetches for any date selected since the last tick.
    //   2. Apply finished fetches.
    //   3. Render the UI.
    //   4. Poll for keyboard input (up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    let result: Result<()> = loop {
        for request in app.take_requests() {
            fetcher.spawn(request);
        }

        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        if let Err(e) = guard.terminal.draw(|f| ui::draw(&mut app, f)) {
            break Err(e.into());
        }

        // Blocks only the main thread; fetch tasks run on the runtime's
        // worker threads.
        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => input::handle_key_event(&mut app, key),
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }

        if app.quit {
            break Ok(());
        }
    };

    // `guard` restores the terminal here.
    drop(guard);

    match &result {
        Ok(()) => info!("closing application"),
        Err(e) => error!("closing application with error: {e:?}"),
    }
    result
}
