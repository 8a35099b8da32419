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

//! Speech capture session management.
//!
//! This module provides the high-level [`SpeechCapture`] handle used by the
//! UI to run dictation sessions. The actual recognition engine is an external
//! collaborator behind the [`recognizer::Recognizer`] trait; this module owns
//! the session lifecycle and guarantees that every started session terminates
//! with exactly one [`TranscriptEvent::Ended`] or [`TranscriptEvent::Failed`];
//! a session is never left half-open.
//!
//! Transcript text crosses into translation only through the same text
//! submission boundary the keyboard uses; capture and playback share no
//! mutable state.

pub(crate) mod recognizer;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
    },
    thread,
};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::actions::events::AppEvent;

/// Why a capture session failed. Categories are distinct so the presentation
/// layer can give a targeted message.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum CaptureError {
    #[error("microphone access denied")]
    PermissionDenied,

    #[error("no speech detected")]
    NoSpeech,

    #[error("audio capture failed")]
    AudioCapture,

    #[error("network error during speech recognition")]
    Network,

    #[error("speech capture is not available (no recognizer configured)")]
    Unsupported,

    #[error("recognizer error: {0}")]
    Backend(String),
}

/// Lifecycle and transcript events of one capture session.
///
/// `Started` opens a session; `Ended` or `Failed` closes it. Interim results
/// are provisional and replaced by later events; final results carry the
/// recognizer's confidence in `[0,1]`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TranscriptEvent {
    Started,
    Interim(String),
    Final { text: String, confidence: f64 },
    Ended,
    Failed(CaptureError),
}

enum CaptureCommand {
    Start { locale: String },
}

/// A handle to the speech capture engine.
///
/// This struct acts as a command proxy; recognition runs on a background
/// worker thread which broadcasts [`TranscriptEvent`]s through the
/// application event channel.
pub(crate) struct SpeechCapture {
    command_tx: Sender<CaptureCommand>,
    stop_flag: Arc<AtomicBool>,
}

impl SpeechCapture {
    /// Spawns the capture worker around the given recognition engine and
    /// returns a new handle.
    pub(crate) fn new(
        recognizer: Box<dyn recognizer::Recognizer>,
        event_tx: Sender<AppEvent>,
    ) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<CaptureCommand>();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let worker_stop = Arc::clone(&stop_flag);
        thread::spawn(move || capture_worker(recognizer, command_rx, worker_stop, event_tx));

        Ok(Self {
            command_tx,
            stop_flag,
        })
    }

    /// Requests a new capture session in the given locale.
    ///
    /// Sessions are serialized by the worker: a start issued while a session
    /// is running begins after the running one terminates.
    pub(crate) fn start(&self, locale: &str) -> Result<()> {
        self.stop_flag.store(false, Ordering::SeqCst);
        self.command_tx.send(CaptureCommand::Start {
            locale: locale.to_string(),
        })?;
        Ok(())
    }

    /// Asks the running session to stop. The session still terminates
    /// through its usual `Ended`/`Failed` event.
    pub(crate) fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }
}

fn capture_worker(
    mut recognizer: Box<dyn recognizer::Recognizer>,
    command_rx: Receiver<CaptureCommand>,
    stop_flag: Arc<AtomicBool>,
    event_tx: Sender<AppEvent>,
) {
    while let Ok(CaptureCommand::Start { locale }) = command_rx.recv() {
        debug!(%locale, "capture session starting");
        run_session(recognizer.as_mut(), &locale, &stop_flag, &event_tx);
    }
}

// One complete session: emits Started, lets the recognizer produce transcript
// segments, and always closes with exactly one terminal event.
fn run_session(
    recognizer: &mut dyn recognizer::Recognizer,
    locale: &str,
    stop_flag: &AtomicBool,
    event_tx: &Sender<AppEvent>,
) {
    let _ = event_tx.send(AppEvent::Transcript(TranscriptEvent::Started));

    let emit = |event: TranscriptEvent| {
        let _ = event_tx.send(AppEvent::Transcript(event));
    };

    let terminal = match recognizer.capture(locale, &emit, stop_flag) {
        Ok(()) => TranscriptEvent::Ended,
        Err(e) => TranscriptEvent::Failed(e),
    };
    let _ = event_tx.send(AppEvent::Transcript(terminal));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scripted recognition engine: plays back a fixed event list, or fails.
    struct Scripted {
        events: Vec<TranscriptEvent>,
        outcome: Result<(), CaptureError>,
    }

    impl recognizer::Recognizer for Scripted {
        fn capture(
            &mut self,
            _locale: &str,
            emit: &dyn Fn(TranscriptEvent),
            _stop: &AtomicBool,
        ) -> Result<(), CaptureError> {
            for event in self.events.drain(..) {
                emit(event);
            }
            self.outcome.clone()
        }
    }

    fn transcript_events(rx: &Receiver<AppEvent>) -> Vec<TranscriptEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Transcript(t) = event {
                events.push(t);
            }
        }
        events
    }

    #[test]
    fn successful_session_is_bracketed_by_started_and_ended() {
        let (tx, rx) = mpsc::channel();
        let stop = AtomicBool::new(false);
        let mut engine = Scripted {
            events: vec![
                TranscriptEvent::Interim("hel".into()),
                TranscriptEvent::Final {
                    text: "hello there".into(),
                    confidence: 0.92,
                },
            ],
            outcome: Ok(()),
        };

        run_session(&mut engine, "en-US", &stop, &tx);

        let events = transcript_events(&rx);
        assert_eq!(events.first(), Some(&TranscriptEvent::Started));
        assert_eq!(events.last(), Some(&TranscriptEvent::Ended));
        assert!(matches!(events[2], TranscriptEvent::Final { ref text, .. } if text == "hello there"));
    }

    #[test]
    fn failed_session_still_terminates_exactly_once() {
        let (tx, rx) = mpsc::channel();
        let stop = AtomicBool::new(false);
        let mut engine = Scripted {
            events: vec![],
            outcome: Err(CaptureError::PermissionDenied),
        };

        run_session(&mut engine, "en-US", &stop, &tx);

        let events = transcript_events(&rx);
        assert_eq!(
            events,
            vec![
                TranscriptEvent::Started,
                TranscriptEvent::Failed(CaptureError::PermissionDenied),
            ]
        );

        let terminals = events
            .iter()
            .filter(|e| matches!(e, TranscriptEvent::Ended | TranscriptEvent::Failed(_)))
            .count();
        assert_eq!(terminals, 1);
    }

    #[test]
    fn unsupported_engine_reports_a_distinct_category() {
        let (tx, rx) = mpsc::channel();
        let stop = AtomicBool::new(false);
        let mut engine = recognizer::Unavailable;

        run_session(&mut engine, "en-US", &stop, &tx);

        let events = transcript_events(&rx);
        assert_eq!(
            events.last(),
            Some(&TranscriptEvent::Failed(CaptureError::Unsupported))
        );
    }
}
