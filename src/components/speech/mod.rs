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

//! Speech capture view state.
//!
//! This module accumulates recognizer output for display, keeping finalized
//! transcript segments separate from the in-flight interim hypothesis so the
//! view can show live dictation feedback.

use crate::speech::TranscriptEvent;

pub(crate) struct SpeechView {
    pub(crate) capturing: bool,
    pub(crate) interim: String,
    pub(crate) segments: Vec<String>,
    pub(crate) last_confidence: Option<f64>,
}

impl SpeechView {
    pub(crate) fn new() -> Self {
        Self {
            capturing: false,
            interim: String::new(),
            segments: Vec::new(),
            last_confidence: None,
        }
    }

    /// The accumulated transcript, finalized segments joined in order.
    pub(crate) fn transcript(&self) -> String {
        self.segments.join(" ")
    }

    pub(crate) fn clear(&mut self) {
        self.interim.clear();
        self.segments.clear();
        self.last_confidence = None;
    }

    pub(crate) fn on_transcript(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Started => {
                self.capturing = true;
                self.interim.clear();
            }

            TranscriptEvent::Interim(text) => self.interim = text,

            TranscriptEvent::Final { text, confidence } => {
                self.interim.clear();
                self.segments.push(text);
                self.last_confidence = Some(confidence);
            }

            TranscriptEvent::Ended | TranscriptEvent::Failed(_) => {
                self.capturing = false;
                self.interim.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::CaptureError;

    #[test]
    fn interim_is_replaced_and_cleared_on_finalization() {
        let mut view = SpeechView::new();
        view.on_transcript(TranscriptEvent::Started);
        view.on_transcript(TranscriptEvent::Interim("hel".to_string()));
        view.on_transcript(TranscriptEvent::Interim("hello th".to_string()));
        assert_eq!(view.interim, "hello th");

        view.on_transcript(TranscriptEvent::Final {
            text: "hello there".to_string(),
            confidence: 0.92,
        });
        assert!(view.interim.is_empty());
        assert_eq!(view.transcript(), "hello there");
    }

    #[test]
    fn segments_accumulate_across_a_session() {
        let mut view = SpeechView::new();
        view.on_transcript(TranscriptEvent::Started);
        view.on_transcript(TranscriptEvent::Final {
            text: "good morning".to_string(),
            confidence: 1.0,
        });
        view.on_transcript(TranscriptEvent::Final {
            text: "how are you".to_string(),
            confidence: 0.8,
        });
        view.on_transcript(TranscriptEvent::Ended);

        assert!(!view.capturing);
        assert_eq!(view.transcript(), "good morning how are you");
    }

    #[test]
    fn failure_stops_capture_but_keeps_segments() {
        let mut view = SpeechView::new();
        view.on_transcript(TranscriptEvent::Started);
        view.on_transcript(TranscriptEvent::Final {
            text: "hello".to_string(),
            confidence: 1.0,
        });
        view.on_transcript(TranscriptEvent::Failed(CaptureError::Network));

        assert!(!view.capturing);
        assert_eq!(view.transcript(), "hello");
    }
}
