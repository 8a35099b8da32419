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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic of the application,
//! bridging user input (keyboard), background worker updates (translation
//! resolver, playback surface, speech capture), and the UI rendering
//! pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel.
//! 2. **Process**: The [`process_events`] function updates the [`App`]
//!    state, feeds the playback controller, and dispatches its surface
//!    commands to the playback worker.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Because every controller touch happens here, on one thread, playback
//! state transitions are serialized by construction.

use std::{io::Stdout, sync::mpsc::Sender};

use anyhow::{Result, bail};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    App, MainView,
    actions::commands::AppCommand,
    config,
    model::{self, Translation},
    player::{LEGAL_RATES, MediaEvent, PlaybackStatus, SurfaceCommand},
    render::draw,
    speech::TranscriptEvent,
    theme::Theme,
    util,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    SetMainView(MainView),

    /// A text submission crossing into translation, from the input view,
    /// the commander, or the speech transcript.
    SubmitText(String),
    TranslationReady {
        generation: u64,
        translation: Translation,
    },
    TranslationFailed {
        generation: u64,
        message: String,
    },

    /// Playback transport request.
    Transport(TransportOp),
    /// A media event from the playback surface, tagged with the sequence
    /// epoch it belongs to.
    Media { epoch: u64, event: MediaEvent },
    /// A clip prefetch failed; advisory only. Carries the epoch of the
    /// sequence the preload was issued for.
    PreloadFailed {
        epoch: u64,
        index: usize,
        message: String,
    },

    CaptureStart,
    CaptureStop,
    Transcript(TranscriptEvent),

    SetLocale(String),
    ToggleDarkMode,

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TransportOp {
    Play,
    TogglePause,
    SkipForward,
    SkipBack,
    Restart,
    RateUp,
    RateDown,
    SetRate(f64),
}

pub(crate) trait AppEventProcessor {
    fn process_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<()>;
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,

            AppEvent::SetMainView(main_view) => app.main_view = main_view,

            AppEvent::SubmitText(text) => handle_submit_text(app, text)?,
            AppEvent::TranslationReady {
                generation,
                translation,
            } => handle_translation_ready(app, generation, translation),
            AppEvent::TranslationFailed {
                generation,
                message,
            } => {
                // The previous sequence, if any, is left untouched.
                if generation == app.translation_gen {
                    app.translating = false;
                    app.status = Some(message);
                }
            }

            AppEvent::Transport(op) => apply_transport(app, op),
            AppEvent::Media { epoch, event } => handle_media_event(app, epoch, event),
            AppEvent::PreloadFailed {
                epoch,
                index,
                message,
            } => {
                if let Some(status) =
                    preload_failure_message(app.controller.current_epoch(), epoch, index, &message)
                {
                    app.status = Some(status);
                }
            }

            AppEvent::CaptureStart => {
                if let Err(e) = app.speech.start(&app.config.locale) {
                    app.status = Some(format!("Could not start capture: {e}"));
                }
            }
            AppEvent::CaptureStop => app.speech.stop(),
            AppEvent::Transcript(event) => {
                if let TranscriptEvent::Failed(ref error) = event {
                    app.status = Some(error.to_string());
                }
                app.speech_view.on_transcript(event);
            }

            AppEvent::SetLocale(tag) => handle_set_locale(app, tag),
            AppEvent::ToggleDarkMode => handle_toggle_dark_mode(app),

            AppEvent::Tick => {}

            AppEvent::Error(message) => app.status = Some(message),
            AppEvent::FatalError(message) => bail!("fatal error: {message}"),

            AppEvent::ExitApplication => unreachable!(),
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Forwards controller-emitted surface commands to the playback worker.
fn dispatch(app: &App, commands: Vec<SurfaceCommand>) {
    for command in commands {
        let _ = app.surface_tx.send(command);
    }
}

// The text submission boundary: empty or whitespace-only input produces no
// work and never reaches the controller.
fn handle_submit_text(app: &mut App, text: String) -> Result<()> {
    let text = text.trim().to_string();
    if text.is_empty() {
        return Ok(());
    }

    app.translation_gen += 1;
    app.translating = true;
    app.status = None;
    app.command_tx.send(AppCommand::Translate {
        generation: app.translation_gen,
        text,
    })?;
    Ok(())
}

fn handle_translation_ready(app: &mut App, generation: u64, translation: Translation) {
    if generation != app.translation_gen {
        // Superseded by a newer submission.
        return;
    }
    app.translating = false;

    if translation.sequence.is_empty() {
        app.status = Some("No sign clips available for this text".to_string());
        return;
    }

    let commands = app.controller.load(translation.sequence.clone());
    app.translation = Some(translation);
    dispatch(app, commands);
}

// A preload failure about a sequence the user already replaced is noise and
// is dropped rather than shown.
fn preload_failure_message(
    current_epoch: u64,
    epoch: u64,
    index: usize,
    message: &str,
) -> Option<String> {
    (epoch == current_epoch).then(|| format!("Preload of clip {} failed: {}", index + 1, message))
}

fn handle_media_event(app: &mut App, epoch: u64, event: MediaEvent) {
    let commands = app.controller.on_media(epoch, event);
    dispatch(app, commands);

    if app.controller.state().status == PlaybackStatus::Failed {
        if let Some(failure) = app.controller.last_failure() {
            app.status = Some(format!(
                "Clip {} failed: {}",
                failure.index + 1,
                failure.message
            ));
        }
    }
}

fn apply_transport(app: &mut App, op: TransportOp) {
    let commands = match op {
        TransportOp::Play => app.controller.play(),
        TransportOp::TogglePause => match app.controller.state().status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => app.controller.pause(),
            PlaybackStatus::Paused => app.controller.resume(),
            _ => app.controller.play(),
        },
        TransportOp::SkipForward => app.controller.skip_forward(),
        TransportOp::SkipBack => app.controller.skip_back(),
        TransportOp::Restart => app.controller.restart(),
        TransportOp::RateUp => app.controller.set_rate(step_rate(app.controller.state().rate, 1)),
        TransportOp::RateDown => {
            app.controller.set_rate(step_rate(app.controller.state().rate, -1))
        }
        TransportOp::SetRate(rate) => app.controller.set_rate(rate),
    };
    dispatch(app, commands);
}

// Steps through the legal rate set, saturating at its ends.
fn step_rate(current: f64, direction: i32) -> f64 {
    let position = LEGAL_RATES
        .iter()
        .position(|rate| (rate - current).abs() < 1e-9)
        .unwrap_or(3);
    let stepped = (position as i32 + direction).clamp(0, LEGAL_RATES.len() as i32 - 1);
    LEGAL_RATES[stepped as usize]
}

fn handle_set_locale(app: &mut App, tag: String) {
    if !model::is_known_locale(&tag) {
        app.status = Some(format!("Unknown capture locale: {tag}"));
        return;
    }

    app.config.locale = tag.clone();
    if let Err(e) = config::save_config(&app.config) {
        app.status = Some(format!("Could not save configuration: {e}"));
    } else {
        app.status = Some(format!("Capture locale set to {tag}"));
    }
}

// The dark-mode preference is written back on every toggle.
fn handle_toggle_dark_mode(app: &mut App) {
    app.config.dark_mode = !app.config.dark_mode;
    app.theme = Theme::for_preference(app.config.dark_mode);
    util::term::set_terminal_bg(&Theme::to_hex(app.theme.background_colour)).ok();

    if let Err(e) = config::save_config(&app.config) {
        app.status = Some(format!("Could not save configuration: {e}"));
    }
}

/// Maps keyboard input to application actions and playback commands.
///
/// This function acts as the primary input router for the TUI, translating
/// low-level [`KeyEvent`]s into high-level domain logic. It handles:
///
/// * **Application Control**: Life-cycle events like exiting the program.
/// * **Text Entry**: Delegating keys to the active input component.
/// * **Playback**: Controlling the playback engine (play, pause, skip,
///   restart, rate).
/// * **Speech Capture**: Starting and stopping dictation sessions.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);
    let handled = app.commander.handle_event(event.clone(), &mut app.event_tx);
    if handled {
        return Ok(());
    }

    if app.main_view == MainView::Translate && app.translate_view.editing {
        app.translate_view.process_event(event, &app.event_tx)?;
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        KeyCode::Char('1') => app.event_tx.send(AppEvent::SetMainView(MainView::Translate))?,
        KeyCode::Char('2') => app.event_tx.send(AppEvent::SetMainView(MainView::Speech))?,

        KeyCode::Char('i') => {
            if app.main_view == MainView::Translate {
                app.translate_view.editing = true;
            }
        }

        // Playback controls
        KeyCode::Enter => app.event_tx.send(AppEvent::Transport(TransportOp::Play))?,
        KeyCode::Char(' ') => app
            .event_tx
            .send(AppEvent::Transport(TransportOp::TogglePause))?,
        KeyCode::Right | KeyCode::Char('.') => app
            .event_tx
            .send(AppEvent::Transport(TransportOp::SkipForward))?,
        KeyCode::Left | KeyCode::Char(',') => app
            .event_tx
            .send(AppEvent::Transport(TransportOp::SkipBack))?,
        KeyCode::Char('r') => app
            .event_tx
            .send(AppEvent::Transport(TransportOp::Restart))?,
        KeyCode::Char(']') => app.event_tx.send(AppEvent::Transport(TransportOp::RateUp))?,
        KeyCode::Char('[') => app
            .event_tx
            .send(AppEvent::Transport(TransportOp::RateDown))?,

        KeyCode::Char('d') => app.event_tx.send(AppEvent::ToggleDarkMode)?,

        // Speech capture
        KeyCode::Char('v') => {
            if app.main_view == MainView::Speech {
                app.event_tx.send(AppEvent::CaptureStart)?;
            }
        }
        KeyCode::Char('x') => {
            if app.main_view == MainView::Speech {
                app.event_tx.send(AppEvent::CaptureStop)?;
            }
        }
        KeyCode::Char('u') => {
            // Hand the captured transcript to translation.
            if app.main_view == MainView::Speech {
                let transcript = app.speech_view.transcript();
                if !transcript.trim().is_empty() {
                    app.event_tx.send(AppEvent::SubmitText(transcript))?;
                    app.event_tx.send(AppEvent::SetMainView(MainView::Translate))?;
                }
            }
        }
        KeyCode::Char('c') => {
            if app.main_view == MainView::Speech {
                app.speech_view.clear();
            }
        }

        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::sync::mpsc;

    #[test]
    fn rate_stepping_saturates_at_the_ends() {
        assert_eq!(step_rate(1.0, 1), 1.25);
        assert_eq!(step_rate(1.0, -1), 0.75);
        assert_eq!(step_rate(2.0, 1), 2.0);
        assert_eq!(step_rate(0.25, -1), 0.25);
    }

    #[test]
    fn blank_submission_sends_no_translation_request() {
        let (command_tx, command_rx) = mpsc::channel();
        let (surface_tx, _surface_rx) = mpsc::channel();
        let mut app = App::new(AppConfig::default(), command_tx, surface_tx).unwrap();

        handle_submit_text(&mut app, "   \t ".to_string()).unwrap();

        assert!(command_rx.try_recv().is_err());
        assert_eq!(app.translation_gen, 0);
        assert!(!app.translating);
    }

    #[test]
    fn trimmed_submission_reaches_the_command_worker() {
        let (command_tx, command_rx) = mpsc::channel();
        let (surface_tx, _surface_rx) = mpsc::channel();
        let mut app = App::new(AppConfig::default(), command_tx, surface_tx).unwrap();

        handle_submit_text(&mut app, "  hello there  ".to_string()).unwrap();

        match command_rx.try_recv() {
            Ok(AppCommand::Translate { generation, text }) => {
                assert_eq!(generation, 1);
                assert_eq!(text, "hello there");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(app.translating);
    }

    #[test]
    fn stale_preload_failures_are_not_surfaced() {
        assert_eq!(preload_failure_message(2, 1, 0, "timed out"), None);
        assert_eq!(
            preload_failure_message(2, 2, 1, "timed out"),
            Some("Preload of clip 2 failed: timed out".to_string())
        );
    }
}
