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

//! Render the text translation view.
//!
//! This module renders the text entry box and the translated sign gloss
//! returned for the last submission.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::App;

pub(crate) fn draw_translate(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_input(f, chunks[0], app);
    draw_gloss(f, chunks[1], app);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.translate_view;

    let border_colour = if view.editing {
        app.theme.accent_colour
    } else {
        app.theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1))
        .title(" Text to translate ");

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    f.render_widget(
        Paragraph::new(view.input.value()).fg(app.theme.text_fg),
        inner_area,
    );

    if view.editing && !app.commander.active() {
        let cursor_x = inner_area.x + view.input.cursor() as u16;
        let cursor_y = inner_area.y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

fn draw_gloss(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1))
        .title(" Sign gloss ");

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.translating {
        f.render_widget(
            Paragraph::new("Translating...").fg(app.theme.dim_fg),
            inner_area,
        );
        return;
    }

    if let Some(translation) = &app.translation {
        let lines = vec![
            Line::from(Span::styled(
                translation.display_text.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ).fg(app.theme.text_fg)),
            Line::from(""),
            Line::from(Span::raw(format!(
                "{} clips",
                translation.sequence.len()
            )).fg(app.theme.dim_fg)),
        ];

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner_area);
    } else {
        f.render_widget(
            Paragraph::new("Press 'i' to edit, enter to translate.").fg(app.theme.dim_fg),
            inner_area,
        );
    }
}
