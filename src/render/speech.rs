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

//! Render the speech capture view.
//!
//! This module renders the dictation state, the finalized transcript with the
//! live interim hypothesis appended, and the capture key hints.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::{App, render::icons::ICON_MIC};

pub(crate) fn draw_speech(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_capture_state(f, chunks[0], app);
    draw_transcript(f, chunks[1], app);
}

fn draw_capture_state(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.speech_view;

    let border_colour = if view.capturing {
        app.theme.accent_colour
    } else {
        app.theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1))
        .title(" Speech capture ");

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let state = if view.capturing { "listening" } else { "idle" };

    let mut spans = vec![
        Span::styled(format!("{} ", ICON_MIC), Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
        Span::styled(state, Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.text_fg),
        Span::raw("  locale ").fg(app.theme.dim_fg),
        Span::styled(app.config.locale.as_str(), Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
    ];

    if let Some(confidence) = view.last_confidence {
        spans.push(Span::raw(format!("  confidence {:.0}%", confidence * 100.0)).fg(app.theme.dim_fg));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), inner_area);
}

fn draw_transcript(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.speech_view;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1))
        .title(" Transcript ");

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let transcript = view.transcript();

    if transcript.is_empty() && view.interim.is_empty() {
        f.render_widget(
            Paragraph::new("Press 'v' to start capture, 'x' to stop, 'u' to translate, 'c' to clear.")
                .fg(app.theme.dim_fg),
            inner_area,
        );
        return;
    }

    let mut spans = vec![Span::raw(transcript).fg(app.theme.text_fg)];
    if !view.interim.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(view.interim.as_str(), Style::default().add_modifier(Modifier::ITALIC)).fg(app.theme.dim_fg));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }),
        inner_area,
    );
}
