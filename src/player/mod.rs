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

//! Sequential clip playback control and state management.
//!
//! This module provides the [`PlaybackController`]: an ordered list of clips
//! played back-to-back as a single logical performance, with one-clip-ahead
//! preloading, aggregate progress across the whole sequence, and transport
//! controls (play, pause/resume, step forward, step backward, restart, rate).
//!
//! # Architecture
//!
//! The controller is a pure state machine with no I/O of its own. It consumes
//! transport calls from the UI and [`MediaEvent`]s from the playback surface,
//! and emits [`SurfaceCommand`]s for the surface worker (see [`surface`]) to
//! execute. The UI renders entirely from [`PlaybackState`].
//!
//! All methods run on the single event-loop thread, so transitions are
//! applied one at a time in arrival order. Events from a superseded sequence
//! are rejected by epoch tag: `load` bumps the epoch, and any media event
//! carrying an older epoch is discarded before it can touch state.

pub(crate) mod surface;

use std::collections::HashSet;

use tracing::debug;

use crate::model::ClipSequence;

/// The legal playback rate multipliers.
pub(crate) const LEGAL_RATES: &[f64] = &[0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

pub(crate) const DEFAULT_RATE: f64 = 1.0;

/// Where the controller currently stands in the performance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlaybackStatus {
    Idle,
    Buffering,
    Playing,
    Paused,
    Finished,
    Failed,
}

/// The controller's externally visible state.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlaybackState {
    pub(crate) status: PlaybackStatus,
    /// Index of the active clip. Meaningless while Idle with an empty
    /// sequence.
    pub(crate) current_index: usize,
    /// Playback speed multiplier, one of [`LEGAL_RATES`].
    pub(crate) rate: f64,
    /// Fraction of the current clip played, in `[0,1]`.
    pub(crate) clip_elapsed: f64,
}

impl PlaybackState {
    fn initial(rate: f64) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            current_index: 0,
            rate,
            clip_elapsed: 0.0,
        }
    }
}

/// A clip playback failure, reported with the index that failed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlaybackFailure {
    pub(crate) index: usize,
    pub(crate) message: String,
}

/// Events reported by the playback surface for the active clip.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MediaEvent {
    /// The underlying media signalled that playback actually began (also
    /// after recovering from a stall).
    Started,
    /// Playback-position update; `fraction` is elapsed/duration in `[0,1]`.
    Progress { fraction: f64 },
    /// Playback halted waiting for data.
    Stalled,
    /// The active clip reached its end.
    Ended,
    /// The clip failed to load or decode.
    Failed(String),
}

/// Instructions for the playback surface worker.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SurfaceCommand {
    /// Make `locator` the active clip, positioned at zero.
    Load {
        epoch: u64,
        index: usize,
        locator: String,
        rate: f64,
        and_play: bool,
    },
    Pause,
    Resume,
    SetRate(f64),
    /// Stop playback and discard anything pending; `epoch` becomes the
    /// surface's active epoch so stale events are no longer attributed.
    Stop { epoch: u64 },
    /// Speculatively fetch the clip's bytes. Purely a network-layer
    /// prefetch; no playback state change. Tagged with the issuing epoch so
    /// a late failure report from a superseded sequence can be identified
    /// and dropped.
    Preload {
        epoch: u64,
        index: usize,
        locator: String,
    },
}

/// Sequential multi-clip playback state machine.
pub(crate) struct PlaybackController {
    sequence: ClipSequence,
    state: PlaybackState,
    preloaded: HashSet<usize>,
    epoch: u64,
    last_failure: Option<PlaybackFailure>,
}

impl PlaybackController {
    pub(crate) fn new() -> Self {
        Self {
            sequence: ClipSequence::default(),
            state: PlaybackState::initial(DEFAULT_RATE),
            preloaded: HashSet::new(),
            epoch: 0,
            last_failure: None,
        }
    }

    pub(crate) fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub(crate) fn sequence(&self) -> &ClipSequence {
        &self.sequence
    }

    pub(crate) fn last_failure(&self) -> Option<&PlaybackFailure> {
        self.last_failure.as_ref()
    }

    /// The epoch of the active sequence; events and reports tagged with an
    /// older value belong to a superseded sequence.
    pub(crate) fn current_epoch(&self) -> u64 {
        self.epoch
    }

    /// Aggregate progress across the whole sequence, in `[0,1]`.
    pub(crate) fn overall_progress(&self) -> f64 {
        let len = self.sequence.len();
        if len == 0 {
            return 0.0;
        }
        if self.state.status == PlaybackStatus::Finished {
            return 1.0;
        }
        ((self.state.current_index as f64 + self.state.clip_elapsed) / len as f64)
            .clamp(0.0, 1.0)
    }

    /// Replaces the current sequence wholesale.
    ///
    /// Resets the state to Idle at index 0, clears the preload set, and bumps
    /// the epoch so any in-flight event from the previous sequence is
    /// discarded. Playback of the old sequence is stopped; nothing starts
    /// automatically. An empty sequence is legal.
    pub(crate) fn load(&mut self, sequence: ClipSequence) -> Vec<SurfaceCommand> {
        self.epoch += 1;
        self.sequence = sequence;
        self.preloaded.clear();
        self.last_failure = None;
        // The rate is a user preference and survives sequence replacement.
        self.state = PlaybackState::initial(self.state.rate);

        vec![SurfaceCommand::Stop { epoch: self.epoch }]
    }

    /// Begins playback of the clip at the current index.
    ///
    /// From Paused this resumes; from Finished it starts over at clip 0.
    /// A no-op when the sequence is empty or playback is already under way.
    pub(crate) fn play(&mut self) -> Vec<SurfaceCommand> {
        if self.sequence.is_empty() {
            debug!("play ignored: empty sequence");
            return Vec::new();
        }

        match self.state.status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => Vec::new(),
            PlaybackStatus::Paused => self.resume(),
            PlaybackStatus::Finished => {
                self.state.current_index = 0;
                self.start_current()
            }
            PlaybackStatus::Idle | PlaybackStatus::Failed => {
                self.last_failure = None;
                self.start_current()
            }
        }
    }

    /// Pauses the active clip, retaining index and position.
    pub(crate) fn pause(&mut self) -> Vec<SurfaceCommand> {
        match self.state.status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => {
                self.state.status = PlaybackStatus::Paused;
                vec![SurfaceCommand::Pause]
            }
            _ => {
                debug!(status = ?self.state.status, "pause ignored");
                Vec::new()
            }
        }
    }

    /// Resumes the paused clip at the same position.
    pub(crate) fn resume(&mut self) -> Vec<SurfaceCommand> {
        match self.state.status {
            PlaybackStatus::Paused => {
                self.state.status = PlaybackStatus::Buffering;
                vec![SurfaceCommand::Resume]
            }
            _ => {
                debug!(status = ?self.state.status, "resume ignored");
                Vec::new()
            }
        }
    }

    /// Steps to the next clip. A no-op at the end of the sequence; never
    /// wraps.
    pub(crate) fn skip_forward(&mut self) -> Vec<SurfaceCommand> {
        if self.sequence.is_empty()
            || self.state.current_index >= self.sequence.len() - 1
        {
            debug!("skip forward ignored: at sequence boundary");
            return Vec::new();
        }

        self.state.current_index += 1;
        self.step_to_current()
    }

    /// Steps to the previous clip. A no-op at index 0; never wraps.
    pub(crate) fn skip_back(&mut self) -> Vec<SurfaceCommand> {
        if self.state.current_index == 0 {
            debug!("skip back ignored: at sequence boundary");
            return Vec::new();
        }

        self.state.current_index -= 1;
        self.step_to_current()
    }

    /// Returns to clip 0 at position zero without starting playback.
    pub(crate) fn restart(&mut self) -> Vec<SurfaceCommand> {
        self.state.current_index = 0;
        self.state.clip_elapsed = 0.0;
        self.state.status = PlaybackStatus::Idle;
        self.last_failure = None;

        match self.sequence.get(0) {
            Some(clip) => vec![SurfaceCommand::Load {
                epoch: self.epoch,
                index: 0,
                locator: clip.locator.clone(),
                rate: self.state.rate,
                and_play: false,
            }],
            None => Vec::new(),
        }
    }

    /// Applies a playback rate immediately; it persists across clip
    /// transitions. Rates outside the legal set are ignored.
    pub(crate) fn set_rate(&mut self, rate: f64) -> Vec<SurfaceCommand> {
        if !LEGAL_RATES.iter().any(|legal| (legal - rate).abs() < 1e-9) {
            debug!(rate, "set_rate ignored: not a legal rate");
            return Vec::new();
        }

        self.state.rate = rate;
        vec![SurfaceCommand::SetRate(rate)]
    }

    /// Feeds a media event from the surface into the state machine.
    ///
    /// Events tagged with a stale epoch belong to a superseded sequence and
    /// are discarded without touching state.
    pub(crate) fn on_media(&mut self, epoch: u64, event: MediaEvent) -> Vec<SurfaceCommand> {
        if epoch != self.epoch {
            debug!(event = ?event, stale = epoch, current = self.epoch, "stale media event dropped");
            return Vec::new();
        }

        match event {
            MediaEvent::Started => {
                if self.state.status == PlaybackStatus::Buffering {
                    self.state.status = PlaybackStatus::Playing;
                }
                Vec::new()
            }
            MediaEvent::Progress { fraction } => {
                if matches!(
                    self.state.status,
                    PlaybackStatus::Playing | PlaybackStatus::Buffering | PlaybackStatus::Paused
                ) {
                    self.state.clip_elapsed = fraction.clamp(0.0, 1.0);
                }
                Vec::new()
            }
            MediaEvent::Stalled => {
                if self.state.status == PlaybackStatus::Playing {
                    self.state.status = PlaybackStatus::Buffering;
                }
                Vec::new()
            }
            MediaEvent::Ended => self.on_clip_ended(),
            MediaEvent::Failed(message) => {
                if matches!(
                    self.state.status,
                    PlaybackStatus::Playing | PlaybackStatus::Buffering | PlaybackStatus::Paused
                ) {
                    self.last_failure = Some(PlaybackFailure {
                        index: self.state.current_index,
                        message,
                    });
                    self.state.status = PlaybackStatus::Failed;
                }
                Vec::new()
            }
        }
    }

    // Automatic clip transition. Clip i+1 never begins before clip i signals
    // completion; the surface enforces single active playback, this decides
    // what comes next.
    fn on_clip_ended(&mut self) -> Vec<SurfaceCommand> {
        let was_paused = self.state.status == PlaybackStatus::Paused;

        match self.state.status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering | PlaybackStatus::Paused => {
                if self.state.current_index + 1 < self.sequence.len() {
                    self.state.current_index += 1;
                    self.state.clip_elapsed = 0.0;

                    // A pause racing the clip boundary is preserved: the next
                    // clip is staged but not played.
                    if was_paused {
                        self.load_current(false)
                    } else {
                        self.state.status = PlaybackStatus::Buffering;
                        self.load_current(true)
                    }
                } else {
                    self.state.status = PlaybackStatus::Finished;
                    self.state.clip_elapsed = 1.0;
                    Vec::new()
                }
            }
            // Ended arriving while Idle/Finished/Failed has nothing to
            // advance (e.g. a restart landed between the clip boundary and
            // this event).
            _ => Vec::new(),
        }
    }

    // Starts playback of the current clip from position zero.
    fn start_current(&mut self) -> Vec<SurfaceCommand> {
        self.state.clip_elapsed = 0.0;
        self.state.status = PlaybackStatus::Buffering;
        self.load_current(true)
    }

    // Manual skip landing: keep pause if paused, play if playing, otherwise
    // stay idle with the clip staged.
    fn step_to_current(&mut self) -> Vec<SurfaceCommand> {
        self.state.clip_elapsed = 0.0;

        match self.state.status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => {
                self.state.status = PlaybackStatus::Buffering;
                self.load_current(true)
            }
            PlaybackStatus::Paused => self.load_current(false),
            _ => {
                self.state.status = PlaybackStatus::Idle;
                self.load_current(false)
            }
        }
    }

    // Emits the Load for the current clip plus the single-ahead preload.
    fn load_current(&mut self, and_play: bool) -> Vec<SurfaceCommand> {
        let index = self.state.current_index;
        let Some(clip) = self.sequence.get(index) else {
            return Vec::new();
        };

        let mut commands = vec![SurfaceCommand::Load {
            epoch: self.epoch,
            index,
            locator: clip.locator.clone(),
            rate: self.state.rate,
            and_play,
        }];
        commands.extend(self.preload_successor(index));
        commands
    }

    // Exactly one clip is prefetched ahead of the active one: its immediate
    // successor. Re-requesting an index already in the preload set is
    // suppressed.
    fn preload_successor(&mut self, index: usize) -> Option<SurfaceCommand> {
        let next = index + 1;
        let clip = self.sequence.get(next)?;
        if !self.preloaded.insert(next) {
            return None;
        }
        Some(SurfaceCommand::Preload {
            epoch: self.epoch,
            index: next,
            locator: clip.locator.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Clip, ClipSequence};

    fn sequence(n: usize) -> ClipSequence {
        ClipSequence::new(
            (0..n)
                .map(|i| Clip::new(format!("w{i}"), format!("videos/w{i}.mp4")))
                .collect(),
        )
    }

    fn loaded(n: usize) -> PlaybackController {
        let mut controller = PlaybackController::new();
        controller.load(sequence(n));
        controller
    }

    fn epoch(controller: &PlaybackController) -> u64 {
        controller.epoch
    }

    fn loads_of(commands: &[SurfaceCommand]) -> Vec<(usize, bool)> {
        commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Load { index, and_play, .. } => Some((*index, *and_play)),
                _ => None,
            })
            .collect()
    }

    fn preloads_of(commands: &[SurfaceCommand]) -> Vec<usize> {
        commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Preload { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn load_resets_to_idle_without_autoplay() {
        let mut controller = PlaybackController::new();
        let commands = controller.load(sequence(3));

        assert_eq!(controller.state().status, PlaybackStatus::Idle);
        assert_eq!(controller.state().current_index, 0);
        assert_eq!(controller.overall_progress(), 0.0);
        assert!(loads_of(&commands).is_empty());
    }

    #[test]
    fn empty_sequence_is_legal_and_play_is_inert() {
        let mut controller = PlaybackController::new();
        controller.load(sequence(0));

        assert!(controller.play().is_empty());
        assert_eq!(controller.state().status, PlaybackStatus::Idle);
    }

    #[test]
    fn clip_end_events_visit_every_index_in_order() {
        let n = 4;
        let mut controller = loaded(n);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);

        let mut visited = vec![controller.state().current_index];
        for _ in 0..n - 1 {
            controller.on_media(e, MediaEvent::Ended);
            visited.push(controller.state().current_index);
            assert_ne!(controller.state().status, PlaybackStatus::Finished);
            controller.on_media(e, MediaEvent::Started);
        }

        assert_eq!(visited, vec![0, 1, 2, 3]);

        // Only the last clip's end finishes the performance.
        controller.on_media(e, MediaEvent::Ended);
        assert_eq!(controller.state().status, PlaybackStatus::Finished);
        assert_eq!(controller.overall_progress(), 1.0);
    }

    #[test]
    fn overall_progress_is_monotonic_while_playing() {
        let mut controller = loaded(3);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);

        let mut samples = vec![controller.overall_progress()];
        for fraction in [0.2, 0.7, 1.0] {
            controller.on_media(e, MediaEvent::Progress { fraction });
            samples.push(controller.overall_progress());
        }
        controller.on_media(e, MediaEvent::Ended);
        samples.push(controller.overall_progress());
        controller.on_media(e, MediaEvent::Started);
        for fraction in [0.3, 0.9] {
            controller.on_media(e, MediaEvent::Progress { fraction });
            samples.push(controller.overall_progress());
        }

        for pair in samples.windows(2) {
            assert!(pair[1] >= pair[0], "progress regressed: {:?}", samples);
        }
    }

    #[test]
    fn skips_are_inert_at_sequence_boundaries() {
        let mut controller = loaded(3);
        let e = epoch(&controller);

        assert!(controller.skip_back().is_empty());
        assert_eq!(controller.state().current_index, 0);

        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.skip_forward();
        controller.skip_forward();
        assert_eq!(controller.state().current_index, 2);

        let before = controller.state().clone();
        assert!(controller.skip_forward().is_empty());
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn exactly_one_preload_per_new_index() {
        let mut controller = loaded(3);
        let e = epoch(&controller);

        let commands = controller.play();
        assert_eq!(preloads_of(&commands), vec![1]);

        controller.on_media(e, MediaEvent::Started);
        let commands = controller.on_media(e, MediaEvent::Ended);
        assert_eq!(preloads_of(&commands), vec![2]);

        // Going back and forward again must not re-issue index 1 or 2.
        let commands = controller.skip_back();
        assert!(preloads_of(&commands).is_empty());
        let commands = controller.skip_forward();
        assert!(preloads_of(&commands).is_empty());
    }

    #[test]
    fn preload_set_clears_on_new_sequence() {
        let mut controller = loaded(2);
        let commands = controller.play();
        assert_eq!(preloads_of(&commands), vec![1]);

        controller.load(sequence(2));
        let commands = controller.play();
        assert_eq!(preloads_of(&commands), vec![1]);
    }

    #[test]
    fn restart_resets_cleanly_from_any_position() {
        let mut controller = loaded(4);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.on_media(e, MediaEvent::Ended);
        controller.on_media(e, MediaEvent::Ended);
        assert_eq!(controller.state().current_index, 2);

        let commands = controller.restart();

        assert_eq!(controller.state().current_index, 0);
        assert_eq!(controller.state().status, PlaybackStatus::Idle);
        assert_eq!(controller.overall_progress(), 0.0);
        // Clip 0 is staged at position zero but not played.
        assert_eq!(loads_of(&commands), vec![(0, false)]);
    }

    #[test]
    fn pause_retains_position_and_resume_continues() {
        let mut controller = loaded(2);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.on_media(e, MediaEvent::Progress { fraction: 0.4 });

        let commands = controller.pause();
        assert_eq!(commands, vec![SurfaceCommand::Pause]);
        assert_eq!(controller.state().status, PlaybackStatus::Paused);
        assert_eq!(controller.state().clip_elapsed, 0.4);

        let commands = controller.resume();
        assert_eq!(commands, vec![SurfaceCommand::Resume]);
        assert_eq!(controller.state().status, PlaybackStatus::Buffering);
        controller.on_media(e, MediaEvent::Started);
        assert_eq!(controller.state().status, PlaybackStatus::Playing);
    }

    #[test]
    fn resume_outside_pause_is_inert() {
        let mut controller = loaded(2);
        assert!(controller.resume().is_empty());
        assert_eq!(controller.state().status, PlaybackStatus::Idle);
    }

    #[test]
    fn pause_racing_a_clip_boundary_is_preserved() {
        let mut controller = loaded(3);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.pause();

        let commands = controller.on_media(e, MediaEvent::Ended);

        assert_eq!(controller.state().current_index, 1);
        assert_eq!(controller.state().status, PlaybackStatus::Paused);
        assert_eq!(loads_of(&commands), vec![(1, false)]);
    }

    #[test]
    fn rate_persists_across_clip_transitions() {
        let mut controller = loaded(3);
        let e = epoch(&controller);
        controller.set_rate(1.5);
        controller.play();
        controller.on_media(e, MediaEvent::Started);

        let commands = controller.on_media(e, MediaEvent::Ended);
        match &commands[0] {
            SurfaceCommand::Load { rate, .. } => assert_eq!(*rate, 1.5),
            other => panic!("expected Load, got {other:?}"),
        }
    }

    #[test]
    fn illegal_rates_are_ignored() {
        let mut controller = loaded(1);
        assert!(controller.set_rate(3.0).is_empty());
        assert!(controller.set_rate(-1.0).is_empty());
        assert_eq!(controller.state().rate, DEFAULT_RATE);
    }

    #[test]
    fn clip_failure_reports_the_index_and_does_not_advance() {
        let mut controller = loaded(3);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.on_media(e, MediaEvent::Ended);
        assert_eq!(controller.state().current_index, 1);

        controller.on_media(e, MediaEvent::Failed("no route to host".into()));

        assert_eq!(controller.state().status, PlaybackStatus::Failed);
        assert_eq!(controller.state().current_index, 1);
        let failure = controller.last_failure().unwrap();
        assert_eq!(failure.index, 1);

        // Retrying is a plain play() of the same clip.
        let commands = controller.play();
        assert_eq!(loads_of(&commands), vec![(1, true)]);
        assert!(controller.last_failure().is_none());
    }

    #[test]
    fn stale_epoch_events_cannot_mutate_state() {
        let mut controller = loaded(3);
        let old = epoch(&controller);
        controller.play();
        controller.on_media(old, MediaEvent::Started);

        controller.load(sequence(2));
        let snapshot = controller.state().clone();

        assert!(controller.on_media(old, MediaEvent::Ended).is_empty());
        assert!(
            controller
                .on_media(old, MediaEvent::Failed("stale".into()))
                .is_empty()
        );
        assert_eq!(controller.state(), &snapshot);
    }

    #[test]
    fn stall_buffers_and_recovery_resumes_playing() {
        let mut controller = loaded(2);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        assert_eq!(controller.state().status, PlaybackStatus::Playing);

        controller.on_media(e, MediaEvent::Stalled);
        assert_eq!(controller.state().status, PlaybackStatus::Buffering);

        controller.on_media(e, MediaEvent::Started);
        assert_eq!(controller.state().status, PlaybackStatus::Playing);
    }

    #[test]
    fn play_after_finish_starts_over_from_clip_zero() {
        let mut controller = loaded(2);
        let e = epoch(&controller);
        controller.play();
        controller.on_media(e, MediaEvent::Started);
        controller.on_media(e, MediaEvent::Ended);
        controller.on_media(e, MediaEvent::Started);
        controller.on_media(e, MediaEvent::Ended);
        assert_eq!(controller.state().status, PlaybackStatus::Finished);

        let commands = controller.play();
        assert_eq!(loads_of(&commands), vec![(0, true)]);
        assert_eq!(controller.state().status, PlaybackStatus::Buffering);
    }

    #[test]
    fn preloads_are_tagged_with_the_active_epoch() {
        let mut controller = loaded(3);
        let first_epoch = controller.current_epoch();

        let commands = controller.play();
        let epochs: Vec<u64> = commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::Preload { epoch, .. } => Some(*epoch),
                _ => None,
            })
            .collect();
        assert_eq!(epochs, vec![first_epoch]);

        // Replacing the sequence bumps the epoch; the old tag identifies the
        // stale preload.
        controller.load(sequence(2));
        assert!(controller.current_epoch() > first_epoch);
        let commands = controller.play();
        assert!(matches!(
            commands.as_slice(),
            [SurfaceCommand::Load { .. }, SurfaceCommand::Preload { epoch, .. }]
                if *epoch == controller.current_epoch()
        ));
    }
}
