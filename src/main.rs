// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Sign Language Translator TUI.
//!
//! A terminal-based sign language translation client: text (typed or
//! dictated) is resolved into a sequence of sign clips which are played back
//! one after another on an mpv surface.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering, and
//!   owns the playback controller.
//! * **Background Workers** handle translation requests, the playback
//!   surface, and speech capture.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod actions;
mod commander;
mod components;
mod config;
mod model;
mod player;
mod render;
mod speech;
mod theme;
mod translate;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::File,
    io::{self},
    sync::{
        Mutex,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

use crate::{
    actions::{
        commands::AppCommand,
        events::{AppEvent, process_events},
    },
    commander::Commander,
    components::{SpeechView, TranslateView},
    config::AppConfig,
    model::Translation,
    player::{PlaybackController, SurfaceCommand},
    speech::{SpeechCapture, recognizer},
    theme::Theme,
};

#[derive(Debug, PartialEq)]
enum MainView {
    Translate,
    Speech,
}

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub main_view: MainView,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub command_tx: Sender<AppCommand>,
    pub surface_tx: Sender<SurfaceCommand>,

    pub speech: SpeechCapture,

    pub controller: PlaybackController,

    pub translation: Option<Translation>,
    pub translating: bool,
    pub translation_gen: u64,

    pub translate_view: TranslateView,
    pub speech_view: SpeechView,

    pub commander: Commander,

    pub status: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(
        config: AppConfig,
        command_tx: Sender<AppCommand>,
        surface_tx: Sender<SurfaceCommand>,
    ) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let theme = Theme::for_preference(config.dark_mode);

        let recognizer = recognizer::from_config(&config);
        let speech = SpeechCapture::new(recognizer, event_tx.clone())?;

        Ok(Self {
            config,
            theme,
            main_view: MainView::Translate,
            event_tx,
            event_rx,
            command_tx,
            surface_tx,
            speech,
            controller: PlaybackController::new(),
            translation: None,
            translating: false,
            translation_gen: 0,
            translate_view: TranslateView::new(),
            speech_view: SpeechView::new(),
            commander: Commander::new(),
            status: None,
        })
    }
}

/// The entry point of the application.
///
/// Sets up the communication channels, initializes the application state,
/// manages the terminal lifecycle, and returns an error if any part of the
/// execution fails.
fn main() -> Result<()> {
    init_logging()?;

    let config = config::load_config();

    let (command_tx, command_rx) = mpsc::channel();
    let (surface_tx, surface_rx) = mpsc::channel();

    let mut app =
        App::new(config, command_tx, surface_tx).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, command_rx, surface_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Initialises file-based logging.
///
/// The TUI owns the terminal, so log output goes to a file in the system
/// temporary directory. The filter is taken from `RUST_LOG` when set.
fn init_logging() -> Result<()> {
    let log_file = File::create(std::env::temp_dir().join("handspeak.log"))
        .context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    util::term::set_terminal_bg(&theme::Theme::to_hex(app.theme.background_colour)).ok();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background color.
/// It also ensures the cursor is made visible again.
///
/// This function is designed to be "best-effort" and does not return a result,
/// as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A command worker to process translation requests asynchronously.
/// * A playback surface worker driving the mpv window.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_rx: Receiver<AppCommand>,
    surface_rx: Receiver<SurfaceCommand>,
) -> Result<()> {
    // Spawn a background worker to process application commands asynchronously.
    let command_event_tx = app.event_tx.clone();
    actions::commands::spawn_command_worker(&app.config, command_rx, command_event_tx);

    // Spawn the playback surface worker, the mpv window that actually shows
    // the sign clips.
    let surface_event_tx = app.event_tx.clone();
    player::surface::spawn_surface_worker(surface_rx, surface_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
