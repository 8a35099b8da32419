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

//! Command-line input logic and state management.
//!
//! This module implements the logic for the for a command-line processing
//! component, handling a text input component, and dispatching a corresponding
//! application event when typing is finished and a command is submitted.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{
    MainView,
    actions::events::{AppEvent, TransportOp},
};

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {

    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    pub(crate) fn handle_event(&mut self, event: Event, event_sender: &mut Sender<AppEvent>) -> bool {
        if self.active {
            match event {
                Event::Key(key_event) => {
                    match key_event.code {
                        KeyCode::Esc => {
                            self.active = false;
                            true
                        }

                        KeyCode::Enter => {
                            let buffer = self.input.value().trim();
                            if buffer.len() > 0 {
                                let _ = self.run_command(buffer, event_sender);
                                self.input.reset();
                                // Exit command mode?
                            }

                            true
                        }

                        _ => {
                            // Delegate all key events to the managed input component.
                            if let Event::Key(_) = event {
                                self.input.handle_event(&event);
                            }

                            true
                        }
                    }
                }

                _ => false,
            }
        } else {
            match event {
                Event::Key(key_event) => {
                    match key_event.code {
                        KeyCode::Char(':') => {
                            self.active = true;
                            true
                        }

                        _ => false
                    }
                }

                _ => false
            }
        }
    }

    fn run_command(&self, buffer: &str, event_sender: &mut Sender<AppEvent>) -> Result<()> {
        let parts: Vec<&str> = buffer.split_whitespace().collect();

        match parts.as_slice() {
            ["q"] => event_sender.send(AppEvent::ExitApplication)?,

            ["t", text_parts @ ..] => {
                if !text_parts.is_empty() {
                    let text = text_parts.join(" ");
                    event_sender.send(AppEvent::SubmitText(text))?
                } else {
                    // error
                }
            }

            ["p"] => event_sender.send(AppEvent::Transport(TransportOp::TogglePause))?,
            ["pn"] => event_sender.send(AppEvent::Transport(TransportOp::SkipForward))?,
            ["pp"] => event_sender.send(AppEvent::Transport(TransportOp::SkipBack))?,
            ["rs"] => event_sender.send(AppEvent::Transport(TransportOp::Restart))?,

            ["rate", value] => {
                if let Ok(rate) = value.parse::<f64>() {
                    event_sender.send(AppEvent::Transport(TransportOp::SetRate(rate)))?
                } else {
                    // error
                }
            }

            ["loc", tag] => event_sender.send(AppEvent::SetLocale(tag.to_string()))?,

            ["dark"] => event_sender.send(AppEvent::ToggleDarkMode)?,

            ["cs"] => event_sender.send(AppEvent::CaptureStart)?,
            ["cx"] => event_sender.send(AppEvent::CaptureStop)?,

            ["1"] => event_sender.send(AppEvent::SetMainView(MainView::Translate))?,
            ["2"] => event_sender.send(AppEvent::SetMainView(MainView::Speech))?,

            [] => {},            // empty (no command)

            [_cmd, ..] => {},    // unknown command (and params)
        }

        Ok(())
    }
}
