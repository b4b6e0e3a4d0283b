//! news-finder — a terminal front-end for the news-finder aggregation server.
//!
//! ## Architecture overview
//!
//! ```text
//!                 Effect                  FetchMsg
//! ┌──────────┐ ─────────► ┌──────────┐ ─────────► ┌──────────┐  draw()  ┌──────────┐
//! │  app.rs  │            │ fetch.rs │            │  app.rs  │ ───────► │  ui.rs   │
//! │ (state)  │            │ (tokio)  │ (channel)  │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘            └──────────┘          └──────────┘
//!                              │                       ▲
//!                              ▼                       │ handle_key_event()
//!                         ┌──────────┐            ┌──────────┐
//!                         │  api/    │            │ input.rs │
//!                         │ (HTTP)   │            └──────────┘
//!                         └──────────┘
//! ```
//!
//! * **`api/`** — the `NewsApi` trait, the wire model and the reqwest client
//!   that decodes the server's response envelope.
//! * **`feed`**, **`similar`**, **`session`**, **`forms`** — the state
//!   machines behind each part of the screen.
//! * **`fetch`** — runs `Effect`s on the tokio runtime and reports back.
//! * **`app`** — owns all application state and queues effects.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`commands`** — one-shot listing and admin subcommands.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod api;
mod app;
mod article;
mod cli;
mod commands;
mod config;
mod feed;
mod feed_check;
mod fetch;
mod forms;
mod input;
mod logging;
mod session;
mod similar;
#[cfg(test)]
mod testing;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::{Handle, Runtime};

use api::{HttpNewsApi, NewsApi};
use app::App;
use cli::Cli;
use config::Config;
use fetch::Fetcher;
use logging::LogTarget;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
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

/// Install a panic hook that restores the terminal before printing the
/// panic message.
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

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    let runtime = Runtime::new().context("starting the async runtime")?;
    let api = Arc::new(HttpNewsApi::new(config.server_url.clone(), config.timeout)?);

    match cli.command {
        Some(command) => {
            logging::init(config.log_format, LogTarget::Stderr)?;
            let mut stdout = io::stdout().lock();
            runtime.block_on(commands::run(
                api.as_ref(),
                command,
                config.timeout,
                &mut stdout,
            ))
        }
        None => {
            logging::init(config.log_format, LogTarget::File(&config.log_file))?;
            run_tui(&config, api, runtime.handle().clone())
        }
    }
}

fn run_tui(config: &Config, api: Arc<dyn NewsApi>, runtime: Handle) -> Result<()> {
    install_panic_hook();
    tracing::info!(server = %config.server_url, "starting TUI");

    let (fetcher, rx) = Fetcher::new(api, runtime);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.page_size, config.sort_by);
    app.start();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Hand queued effects to the fetcher.
    //   2. Apply finished background results.
    //   3. Render, then ask for similar articles of newly visible cards.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        for effect in app.take_effects() {
            fetcher.dispatch(effect);
        }

        while let Ok(msg) = rx.try_recv() {
            app.handle(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;
        app.request_visible_similar();

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
