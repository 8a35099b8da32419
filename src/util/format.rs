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

/// Formats a playback rate for display, e.g. `1.0` as `"1x"` and `1.25` as
/// `"1.25x"`.
pub(crate) fn format_rate(rate: f64) -> String {
    if (rate - rate.round()).abs() < f64::EPSILON {
        format!("{}x", rate as u32)
    } else {
        format!("{}x", rate)
    }
}

/// Formats a `[0,1]` fraction as a whole percentage string.
pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_render_compactly() {
        assert_eq!(format_rate(1.0), "1x");
        assert_eq!(format_rate(2.0), "2x");
        assert_eq!(format_rate(0.25), "0.25x");
        assert_eq!(format_rate(1.5), "1.5x");
    }

    #[test]
    fn percentages_clamp_and_round() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(0.504), "50%");
        assert_eq!(format_percent(1.7), "100%");
    }
}
