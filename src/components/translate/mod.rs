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

//! Text translation view and input state management.
//!
//! This module holds the state for the translation view, a managed text input
//! component and an editing flag deciding whether keystrokes go to the input
//! or to the global key handlers.

mod event;

use tui_input::Input;

pub(crate) struct TranslateView {
    pub(crate) input: Input,
    pub(crate) editing: bool,
}

impl TranslateView {
    pub(crate) fn new() -> Self {
        Self {
            input: Input::default(),
            editing: true,
        }
    }
}
