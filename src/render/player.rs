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

//! Render the clip playback strip.
//!
//! This module renders the visual representation of the current clip
//! sequence, playback status, the sequence progress bar and so on.

use ratatui::{
    Frame, layout::{Alignment, Constraint, Direction, Layout, Rect}, style::{Color, Modifier, Style, Stylize}, text::{Line, Span}, widgets::{Block, Borders, Gauge, Padding, Paragraph}
};

use crate::{
    App,
    player::PlaybackStatus,
    render::icons::{ICON_BUFFERING, ICON_FAILED, ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util,
};

/// Renders the playback strip including sequence info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(30),
        ])
        .split(chunks[0]);

    let state = app.controller.state();
    let sequence = app.controller.sequence();

    if !sequence.is_empty() {
        let icon = match state.status {
            PlaybackStatus::Playing => ICON_PLAY,
            PlaybackStatus::Paused => ICON_PAUSE,
            PlaybackStatus::Buffering => ICON_BUFFERING,
            PlaybackStatus::Failed => ICON_FAILED,
            PlaybackStatus::Idle | PlaybackStatus::Finished => ICON_STOP,
        };

        let clip_label = sequence
            .get(state.current_index)
            .map(|clip| clip.label.as_str())
            .unwrap_or("");

        let info_line = Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().add_modifier(Modifier::BOLD)).fg(Color::White),
            Span::styled(clip_label, Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
            Span::raw(" clip "),
            Span::styled(format!("{}", state.current_index + 1), Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
            Span::raw(" of "),
            Span::styled(format!("{}", sequence.len()), Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
        ]);
        f.render_widget(Paragraph::new(info_line), info_chunks[0]);

        let rate_line = Line::from(vec![
            Span::styled(util::format::format_rate(state.rate), Style::default().add_modifier(Modifier::BOLD)).fg(app.theme.accent_colour),
            Span::styled(
                format!(" {}", util::format::format_percent(app.controller.overall_progress())),
                Style::default().add_modifier(Modifier::BOLD),
            ).fg(Color::White),
        ]);

        let rate_p = Paragraph::new(rate_line).alignment(Alignment::Right);

        f.render_widget(rate_p, info_chunks[1]);

        f.render_widget(Paragraph::new(sign_line(app)), chunks[2]);
    }

    let progress = app.controller.overall_progress().clamp(0.0, 1.0);

    let progress_gauge = Gauge::default()
        .gauge_style(Style::default()
            .fg(app.theme.accent_colour)
            .bg(app.theme.gauge_track_colour)
        )
        .ratio(progress)
        .label("")
        .use_unicode(true);

    f.render_widget(progress_gauge, chunks[4]);
}

// The sequence labels in order, with the clip now showing highlighted.
fn sign_line(app: &App) -> Line<'_> {
    let state = app.controller.state();
    let mut spans = Vec::new();

    for (index, clip) in app.controller.sequence().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        if index == state.current_index {
            spans.push(
                Span::styled(clip.label.as_str(), Style::default().add_modifier(Modifier::BOLD))
                    .fg(app.theme.highlight_fg),
            );
        } else {
            spans.push(Span::raw(clip.label.as_str()).fg(app.theme.dim_fg));
        }
    }

    Line::from(spans)
}
