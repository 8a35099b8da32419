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

//! Event routing for the translation view.
//!
//! This module implements the application event processor for the translation
//! interface, delegating keyboard input to the underlying text input while
//! editing, and submitting the buffer for translation on enter.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tui_input::backend::crossterm::EventHandler;

use crate::{
    actions::events::{AppEvent, AppEventProcessor},
    components::TranslateView,
};

impl AppEventProcessor for TranslateView {
    fn process_event(&mut self, event: Event, event_tx: &Sender<AppEvent>) -> Result<()> {
        if let Event::Key(key_event) = event {
            match key_event.code {
                KeyCode::Esc => {
                    self.editing = false;
                }

                KeyCode::Enter => {
                    let buffer = self.input.value().trim().to_string();
                    if !buffer.is_empty() {
                        event_tx.send(AppEvent::SubmitText(buffer))?;
                        self.editing = false;
                    }
                }

                _ => {
                    self.input.handle_event(&event);
                }
            }
        }

        Ok(())
    }
}
