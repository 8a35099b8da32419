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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called on every
//! terminal tick or state change to provide a reactive user interface.

mod commander;
mod icons;
mod player;
mod speech;
mod translate;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::{
    App, MainView,
    render::{commander::draw_commander, player::draw_player},
};

/// Renders the user interface to the terminal frame.
///
/// This function calculates the layout constraints and populates the frame
/// with widgets based on the current state of the [`App`].
///
/// It handles:
///
/// * **Layout**: Partitioning the screen into the main view, the playback
///   strip, and the command line.
/// * **State Mapping**: Converting application data (like the current clip
///   sequence) into widgets.
/// * **Styling**: Applying colors and borders defined in the application theme.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Outer layout: main, playback strip, command line
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    match app.main_view {
        MainView::Translate => translate::draw_translate(f, outer[0], app),
        MainView::Speech => speech::draw_speech(f, outer[0], app),
    };

    draw_player(f, outer[1], app);

    draw_commander(f, outer[2], app);
}
