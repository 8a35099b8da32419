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

//! Recognition engine seam and the external-command backend.
//!
//! Recognition itself is an external collaborator; this module defines the
//! trait the session manager drives and the shipped production backend,
//! which runs a user-configured transcriber command.

use std::{
    io::{BufRead, BufReader, ErrorKind},
    process::{Command, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::Duration,
};

use tracing::debug;

use crate::{
    config::AppConfig,
    speech::{CaptureError, TranscriptEvent},
};

/// How often a running session rechecks the stop flag while no transcriber
/// output is arriving.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A speech recognition engine, driven for one session at a time.
///
/// Implementations emit only `Interim` and `Final` events through `emit`;
/// session lifecycle events are owned by the session manager. `capture`
/// returns when the session naturally ends, and must return promptly once
/// `stop` is raised.
pub(crate) trait Recognizer: Send {
    fn capture(
        &mut self,
        locale: &str,
        emit: &dyn Fn(TranscriptEvent),
        stop: &AtomicBool,
    ) -> Result<(), CaptureError>;
}

/// Builds the recognition engine selected by the configuration. With no
/// transcriber command configured, capture is unsupported.
pub(crate) fn from_config(config: &AppConfig) -> Box<dyn Recognizer> {
    match &config.recognizer_cmd {
        Some(cmd) => Box::new(CommandRecognizer::new(cmd.clone())),
        None => Box::new(Unavailable),
    }
}

/// Placeholder engine for installations without a configured transcriber.
pub(crate) struct Unavailable;

impl Recognizer for Unavailable {
    fn capture(
        &mut self,
        _locale: &str,
        _emit: &dyn Fn(TranscriptEvent),
        _stop: &AtomicBool,
    ) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }
}

/// Recognition via an external transcriber process.
///
/// The configured command is invoked with the locale tag as its final
/// argument and is expected to write one transcript segment per stdout line:
/// lines prefixed with `~` are interim results, any other line is a final
/// segment, optionally followed by a tab and a `[0,1]` confidence value.
///
/// Exit status maps onto the capture failure taxonomy: `0` is a clean end
/// (or no-speech when nothing was transcribed), `2` permission denied, `3`
/// no speech, `4` audio capture failure, `5` network error; anything else is
/// reported as an engine error.
pub(crate) struct CommandRecognizer {
    command_line: String,
}

impl CommandRecognizer {
    pub(crate) fn new(command_line: String) -> Self {
        Self { command_line }
    }
}

impl Recognizer for CommandRecognizer {
    fn capture(
        &mut self,
        locale: &str,
        emit: &dyn Fn(TranscriptEvent),
        stop: &AtomicBool,
    ) -> Result<(), CaptureError> {
        let mut parts = self.command_line.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(CaptureError::Unsupported);
        };

        let mut child = Command::new(program)
            .args(parts)
            .arg(locale)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CaptureError::Unsupported,
                _ => CaptureError::Backend(e.to_string()),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::Backend("recognizer stdout unavailable".into()))?;

        // Lines arrive on a channel from a reader thread, so the loop can
        // poll the stop flag even while the transcriber is silent instead of
        // blocking on a read that may never complete.
        let (line_tx, line_rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });

        let mut segments = 0usize;
        loop {
            if stop.load(Ordering::SeqCst) {
                debug!("capture stop requested, terminating recognizer");
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                return Ok(());
            }

            match line_rx.recv_timeout(STOP_POLL_INTERVAL) {
                Ok(Ok(line)) => {
                    if let Some(event) = parse_line(&line) {
                        if matches!(event, TranscriptEvent::Final { .. }) {
                            segments += 1;
                        }
                        emit(event);
                    }
                }
                Ok(Err(e)) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return Err(CaptureError::Backend(e.to_string()));
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Stdout closed: the transcriber is finishing on its own.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        let _ = reader.join();

        let status = child
            .wait()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        match status.code() {
            Some(0) if segments == 0 => Err(CaptureError::NoSpeech),
            Some(0) => Ok(()),
            Some(2) => Err(CaptureError::PermissionDenied),
            Some(3) => Err(CaptureError::NoSpeech),
            Some(4) => Err(CaptureError::AudioCapture),
            Some(5) => Err(CaptureError::Network),
            other => Err(CaptureError::Backend(format!(
                "recognizer exited with status {:?}",
                other
            ))),
        }
    }
}

/// Parses one transcriber output line into a transcript event. Blank lines
/// are skipped.
fn parse_line(line: &str) -> Option<TranscriptEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(interim) = line.strip_prefix('~') {
        return Some(TranscriptEvent::Interim(interim.trim().to_string()));
    }

    let (text, confidence) = match line.rsplit_once('\t') {
        Some((text, score)) => match score.trim().parse::<f64>() {
            Ok(value) => (text.trim(), value.clamp(0.0, 1.0)),
            Err(_) => (line, 1.0),
        },
        None => (line, 1.0),
    };

    Some(TranscriptEvent::Final {
        text: text.to_string(),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interim_lines_are_tilde_prefixed() {
        assert_eq!(
            parse_line("~ hello th"),
            Some(TranscriptEvent::Interim("hello th".to_string()))
        );
    }

    #[test]
    fn final_lines_carry_optional_confidence() {
        assert_eq!(
            parse_line("hello there\t0.87"),
            Some(TranscriptEvent::Final {
                text: "hello there".to_string(),
                confidence: 0.87,
            })
        );
        assert_eq!(
            parse_line("hello there"),
            Some(TranscriptEvent::Final {
                text: "hello there".to_string(),
                confidence: 1.0,
            })
        );
    }

    #[test]
    fn confidence_is_clamped_to_unit_range() {
        match parse_line("loud\t7.5") {
            Some(TranscriptEvent::Final { confidence, .. }) => assert_eq!(confidence, 1.0),
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn stop_interrupts_a_silent_transcriber() {
        // tail -f follows /dev/null forever and writes nothing to stdout, a
        // stand-in for a recognizer listening without hearing speech.
        let mut engine = CommandRecognizer::new("tail -f /dev/null".to_string());
        let stop = AtomicBool::new(true);
        let emit = |_event: TranscriptEvent| {};

        let started = std::time::Instant::now();
        let result = engine.capture("en-US", &emit, &stop);

        assert_eq!(result, Ok(()));
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "stop took {:?} to take effect",
            started.elapsed()
        );
    }
}
