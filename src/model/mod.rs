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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application (clips, clip
//! sequences, resolved translations) representing one text submission and
//! the ordered media it plays back as.

/// A single playable media unit: one sign-language word or letter video.
///
/// The locator is an opaque string resolvable by the playback surface's media
/// loader (an HTTP URL in server mode, a filesystem path in local mode). The
/// label is the signable token the clip represents, used for display
/// highlighting.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Clip {
    pub(crate) label: String,
    pub(crate) locator: String,
}

impl Clip {
    pub(crate) fn new(label: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            locator: locator.into(),
        }
    }
}

/// An ordered, immutable-once-set list of clips produced for one text
/// submission.
///
/// A sequence is replaced wholesale when a new submission resolves; it is
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ClipSequence {
    clips: Vec<Clip>,
}

impl ClipSequence {
    pub(crate) fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    pub(crate) fn len(&self) -> usize {
        self.clips.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }
}

/// The result of resolving one text submission: the normalized display text
/// and the clip sequence to perform it with.
#[derive(Debug, Clone, Default)]
pub(crate) struct Translation {
    pub(crate) display_text: String,
    pub(crate) sequence: ClipSequence,
}

/// The fixed set of locale tags selectable for speech capture.
pub(crate) const LOCALES: &[(&str, &str)] = &[
    ("en-US", "English (US)"),
    ("en-GB", "English (UK)"),
    ("es-ES", "Spanish (Spain)"),
    ("es-MX", "Spanish (Mexico)"),
    ("fr-FR", "French (France)"),
    ("de-DE", "German (Germany)"),
    ("it-IT", "Italian (Italy)"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("ja-JP", "Japanese (Japan)"),
    ("ko-KR", "Korean (South Korea)"),
    ("zh-CN", "Chinese (Mandarin)"),
    ("ar-SA", "Arabic (Saudi Arabia)"),
    ("hi-IN", "Hindi (India)"),
    ("nl-NL", "Dutch (Netherlands)"),
    ("ru-RU", "Russian (Russia)"),
];

/// Returns true if `tag` is one of the selectable capture locales.
pub(crate) fn is_known_locale(tag: &str) -> bool {
    LOCALES.iter().any(|(code, _)| *code == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_reports_length_and_lookup() {
        let seq = ClipSequence::new(vec![
            Clip::new("hello", "videos/hello.mp4"),
            Clip::new("you", "videos/you.mp4"),
        ]);

        assert_eq!(seq.len(), 2);
        assert!(!seq.is_empty());
        assert_eq!(seq.get(1).unwrap().label, "you");
        assert!(seq.get(2).is_none());
    }

    #[test]
    fn locale_table_is_closed() {
        assert!(is_known_locale("en-US"));
        assert!(is_known_locale("ru-RU"));
        assert!(!is_known_locale("en-AU"));
        assert!(!is_known_locale(""));
    }
}
