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

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the dark and light color palettes and provides
//! utilities for converting colors between Ratatui's internal representation
//! and external formats (such as hexadecimal strings) used for terminal
//! emulator styling. The active palette follows the persisted dark-mode
//! preference.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) gauge_track_colour: Color,

    pub(crate) text_fg: Color,
    pub(crate) dim_fg: Color,
    pub(crate) highlight_fg: Color,
    pub(crate) error_fg: Color,
    pub(crate) commander_colour: Color,
}

impl Theme {
    /// Selects the palette matching the persisted preference.
    pub(crate) const fn for_preference(dark_mode: bool) -> Self {
        if dark_mode { Self::dark() } else { Self::light() }
    }

    pub(crate) const fn dark() -> Self {
        Self {
            background_colour: Color::Rgb(28, 22, 44),
            accent_colour: Color::Rgb(167, 139, 250),
            border_colour: Color::Rgb(102, 102, 102),
            gauge_track_colour: Color::Rgb(44, 36, 66),

            text_fg: Color::Rgb(230, 228, 240),
            dim_fg: Color::Rgb(148, 145, 166),
            highlight_fg: Color::Rgb(255, 215, 0),
            error_fg: Color::Rgb(240, 100, 100),
            commander_colour: Color::Rgb(230, 228, 240),
        }
    }

    pub(crate) const fn light() -> Self {
        Self {
            background_colour: Color::Rgb(245, 243, 250),
            accent_colour: Color::Rgb(109, 40, 217),
            border_colour: Color::Rgb(170, 166, 186),
            gauge_track_colour: Color::Rgb(222, 218, 236),

            text_fg: Color::Rgb(30, 28, 42),
            dim_fg: Color::Rgb(110, 106, 126),
            highlight_fg: Color::Rgb(176, 100, 0),
            error_fg: Color::Rgb(180, 40, 40),
            commander_colour: Color::Rgb(30, 28, 42),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string.
    ///
    /// This is primarily used to set the terminal emulator's background color
    /// via escape sequences.
    ///
    /// # Panics
    ///
    /// Panics if the provided color is not a [`Color::Rgb`] variant.
    pub(crate) fn to_hex(colour: Color) -> String {
        match colour {
            Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            _ => panic!("Unexpected non-RGB colour"),
        }
    }
}
