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

//! Terminal background synchronisation with the active theme.
//!
//! ratatui paints the widgets, but the emulator's own window background is
//! outside its reach; without OSC 11 a thin strip of the emulator default
//! shows around the drawn area. These helpers push the active palette's
//! background colour to the emulator on startup and on every dark-mode
//! toggle, and hand the original colour back on exit (OSC 111).
//!
//! Emulators without OSC 11/111 support ignore the sequences.

use std::io::{self, Write};

/// Sets the emulator background to `hex_colour` (e.g. `"#1c162c"`, as
/// produced by [`crate::theme::Theme::to_hex`]).
pub(crate) fn set_terminal_bg(hex_colour: &str) -> io::Result<()> {
    emit(&set_bg_sequence(hex_colour))
}

/// Reverts the emulator background to its configured default. Called during
/// teardown so the user's terminal is left as it was found.
pub(crate) fn reset_terminal_bg() -> io::Result<()> {
    emit(reset_bg_sequence())
}

fn emit(sequence: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(sequence.as_bytes())?;
    stdout.flush()
}

fn set_bg_sequence(hex_colour: &str) -> String {
    format!("\x1b]11;{}\x07", hex_colour)
}

fn reset_bg_sequence() -> &'static str {
    "\x1b]111\x07"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_sequences_are_osc_11_and_111() {
        assert_eq!(set_bg_sequence("#1c162c"), "\x1b]11;#1c162c\x07");
        assert_eq!(reset_bg_sequence(), "\x1b]111\x07");
    }
}
