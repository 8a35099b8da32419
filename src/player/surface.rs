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

//! MPV-backed playback surface and event processing.
//!
//! This module executes [`SurfaceCommand`]s against a `libmpv` context in a
//! background worker thread and translates mpv's property observations into
//! the [`MediaEvent`]s the controller consumes. It is the only component that
//! touches the playback surface; nothing else may set its source.
//!
//! # Architecture
//!
//! The worker runs a dual-loop pattern:
//! 1. **Command drain**: applies all pending controller commands (load,
//!    pause, rate, stop, preload).
//! 2. **Event poll**: waits up to 50ms for an mpv event and broadcasts the
//!    corresponding epoch-tagged [`AppEvent::Media`].
//!
//! The context runs with `keep-open`, which holds the last frame on screen
//! between clips instead of tearing the window down; end of clip is detected
//! from the `eof-reached` property rather than `EndFile`, which keep-open
//! defers until the next load.
//!
//! Preload commands never touch the mpv context: they are a pure
//! network-layer prefetch into a content-addressed cache file, run on a
//! detached thread with a bounded request timeout so a stalled fetch surfaces
//! as a reported failure instead of hanging.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use mpv::Format;
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::{
    actions::events::AppEvent,
    player::{MediaEvent, SurfaceCommand},
};

const PREFETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Spawns the playback surface worker thread.
///
/// This function takes ownership of the command receiver and the event
/// sender, moving them into a dedicated background thread.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
pub(crate) fn spawn_surface_worker(
    command_rx: Receiver<SurfaceCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = surface_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the playback surface backend.
///
/// Initializes a local `libmpv` context configured for windowed video
/// output, observes the playback properties the controller cares about, and
/// alternates between draining commands and polling mpv events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the
/// command/event loops encounter an unrecoverable failure.
fn surface_worker(command_rx: Receiver<SurfaceCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("keep-open", "yes")
            .context("Failed to set keep-open")?;
        builder
            .set_option("force-window", "yes")
            .context("Failed to force video window")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<bool>("paused-for-cache", 0)
        .context("Failed to observe paused-for-cache")?;
    handler
        .observe_property::<bool>("eof-reached", 0)
        .context("Failed to observe eof-reached")?;

    let cache_dir = clip_cache_dir();
    if let Err(e) = fs::create_dir_all(&cache_dir) {
        warn!(error = %e, "could not create clip cache directory");
    }

    let mut surface = SurfaceState {
        epoch: 0,
        duration: None,
        is_paused: false,
        eof_signalled: false,
    };

    loop {
        process_commands(&mut handler, &command_rx, &mut surface, &cache_dir, &event_tx)?;
        process_mpv_events(&mut handler, &mut surface, &event_tx)?;
    }
}

// Worker-local view of the surface: which sequence epoch events belong to,
// the active clip's duration, the user-pause flag (to tell a user pause
// apart from a cache stall), and whether the active clip's end has already
// been signalled.
struct SurfaceState {
    epoch: u64,
    duration: Option<f64>,
    is_paused: bool,
    eof_signalled: bool,
}

/// Drains and executes all pending controller commands.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<SurfaceCommand>,
    surface: &mut SurfaceState,
    cache_dir: &Path,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        match command {
            SurfaceCommand::Load {
                epoch,
                index,
                locator,
                rate,
                and_play,
            } => {
                surface.epoch = epoch;
                surface.duration = None;
                surface.is_paused = !and_play;
                surface.eof_signalled = false;

                let target = playable_locator(cache_dir, &locator);
                debug!(index, %target, "loading clip");
                handler
                    .command(&["loadfile", &target, "replace"])
                    .context(format!("Failed to load clip: {}", &target))?;
                handler.set_property("speed", rate)?;
                handler.set_property("pause", !and_play)?;
            }
            SurfaceCommand::Pause => {
                surface.is_paused = true;
                handler.set_property("pause", true)?;
            }
            SurfaceCommand::Resume => {
                surface.is_paused = false;
                handler.set_property("pause", false)?;
            }
            SurfaceCommand::SetRate(rate) => {
                handler.set_property("speed", rate)?;
            }
            SurfaceCommand::Stop { epoch } => {
                surface.epoch = epoch;
                surface.duration = None;
                surface.eof_signalled = false;
                handler.command(&["stop"])?;
            }
            SurfaceCommand::Preload {
                epoch,
                index,
                locator,
            } => {
                spawn_prefetch(epoch, index, locator, cache_dir.to_path_buf(), event_tx.clone());
            }
        }
    }

    Ok(())
}

/// Polls for MPV events and translates them into controller media events.
///
/// Waits for up to 50ms for an event from the MPV context, then broadcasts
/// the matching epoch-tagged [`AppEvent::Media`], if any.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    surface: &mut SurfaceState,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let Some(mpv_event) = handler.wait_event(0.05) else {
        return Ok(());
    };

    let media_event = match mpv_event {
        mpv::Event::PlaybackRestart => Some(MediaEvent::Started),
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) if duration > 0.0 => {
                surface.duration = Some(duration);
                None
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                surface.duration.map(|duration| MediaEvent::Progress {
                    fraction: (seconds / duration).clamp(0.0, 1.0),
                })
            }
            ("pause", Format::Flag(paused)) => {
                surface.is_paused = paused;
                None
            }
            ("paused-for-cache", Format::Flag(true)) => Some(MediaEvent::Stalled),
            ("paused-for-cache", Format::Flag(false)) if !surface.is_paused => {
                Some(MediaEvent::Started)
            }
            // With keep-open the file is not unloaded at its end, a single
            // clip pauses on the last frame and only flips this property; no
            // EndFile event fires until something else is loaded. The clip
            // boundary is therefore detected here.
            ("eof-reached", Format::Flag(reached)) => clip_end_transition(surface, reached),
            _ => None,
        },
        mpv::Event::EndFile(result) => match result {
            // Routed through the same edge guard as eof-reached so a clip
            // end is never reported twice.
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => {
                clip_end_transition(surface, true)
            }
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR) => {
                Some(MediaEvent::Failed("clip failed to load or decode".to_string()))
            }
            // Stop reasons are self-inflicted (a new load or an explicit
            // stop) and carry no information for the controller.
            _ => None,
        },
        _ => None,
    };

    if let Some(event) = media_event {
        event_tx
            .send(AppEvent::Media {
                epoch: surface.epoch,
                event,
            })
            .context("Failed to send media event")?;
    }

    Ok(())
}

// End-of-clip edge detection: `Ended` fires exactly once per rising edge of
// the eof-reached flag. The flag is reset when it falls or when a new clip
// is loaded.
fn clip_end_transition(surface: &mut SurfaceState, reached: bool) -> Option<MediaEvent> {
    if !reached {
        surface.eof_signalled = false;
        return None;
    }
    if surface.eof_signalled {
        return None;
    }
    surface.eof_signalled = true;
    Some(MediaEvent::Ended)
}

/// Prefers a fully-downloaded cache file over the remote locator; local
/// paths pass through untouched.
fn playable_locator(cache_dir: &Path, locator: &str) -> String {
    if !is_remote(locator) {
        return locator.to_string();
    }

    let cached = cached_clip_path(cache_dir, locator);
    if cached.is_file() {
        cached.to_string_lossy().into_owned()
    } else {
        locator.to_string()
    }
}

// Speculative byte fetch of a clip into the cache. Runs detached so it never
// blocks the mpv loop; failures are non-fatal and reported once, tagged with
// the sequence epoch so a failure from a superseded sequence is dropped
// instead of surfacing to the user.
fn spawn_prefetch(
    epoch: u64,
    index: usize,
    locator: String,
    cache_dir: PathBuf,
    event_tx: Sender<AppEvent>,
) {
    if !is_remote(&locator) {
        debug!(index, %locator, "prefetch skipped: local clip");
        return;
    }

    thread::spawn(move || {
        if let Err(e) = prefetch_clip(&locator, &cache_dir) {
            warn!(index, %locator, error = %e, "clip prefetch failed");
            let _ = event_tx.send(AppEvent::PreloadFailed {
                epoch,
                index,
                message: e.to_string(),
            });
        }
    });
}

fn prefetch_clip(locator: &str, cache_dir: &Path) -> Result<()> {
    let target = cached_clip_path(cache_dir, locator);
    if target.is_file() {
        debug!(%locator, "prefetch skipped: already cached");
        return Ok(());
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(PREFETCH_TIMEOUT)
        .build()?;
    let bytes = client
        .get(locator)
        .send()?
        .error_for_status()?
        .bytes()?;

    // Write via a temp name so a half-written file is never mistaken for a
    // complete cache entry.
    let partial = target.with_extension("part");
    fs::write(&partial, &bytes).context("Failed to write clip cache file")?;
    fs::rename(&partial, &target).context("Failed to commit clip cache file")?;

    debug!(%locator, bytes = bytes.len(), "clip prefetched");
    Ok(())
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

// Cache entries are content-addressed by the locator hash, so the same clip
// URL is fetched at most once across sequences.
fn cached_clip_path(cache_dir: &Path, locator: &str) -> PathBuf {
    cache_dir.join(format!("{:016x}.mp4", xxh3_64(locator.as_bytes())))
}

fn clip_cache_dir() -> PathBuf {
    std::env::temp_dir().join("handspeak-clips")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_surface() -> SurfaceState {
        SurfaceState {
            epoch: 0,
            duration: None,
            is_paused: false,
            eof_signalled: false,
        }
    }

    #[test]
    fn clip_end_fires_once_per_rising_edge() {
        let mut surface = fresh_surface();

        assert_eq!(
            clip_end_transition(&mut surface, true),
            Some(MediaEvent::Ended)
        );
        // The flag stays raised while the last frame is held; no repeat.
        assert_eq!(clip_end_transition(&mut surface, true), None);

        // Next clip starts, flag falls, the following end fires again.
        assert_eq!(clip_end_transition(&mut surface, false), None);
        assert_eq!(
            clip_end_transition(&mut surface, true),
            Some(MediaEvent::Ended)
        );
    }

    #[test]
    fn loading_a_clip_rearms_end_detection() {
        let mut surface = fresh_surface();
        assert_eq!(
            clip_end_transition(&mut surface, true),
            Some(MediaEvent::Ended)
        );

        // A Load resets the guard the same way a falling edge does.
        surface.eof_signalled = false;
        assert_eq!(
            clip_end_transition(&mut surface, true),
            Some(MediaEvent::Ended)
        );
    }

    #[test]
    fn remote_locators_are_detected() {
        assert!(is_remote("http://localhost:8000/videos/hello.mp4"));
        assert!(is_remote("https://example.com/a.mp4"));
        assert!(!is_remote("signs/hello.mp4"));
        assert!(!is_remote("/var/signs/hello.mp4"));
    }

    #[test]
    fn cache_paths_are_stable_per_locator() {
        let dir = Path::new("/tmp/cache");
        let a = cached_clip_path(dir, "http://s/videos/hello.mp4");
        let b = cached_clip_path(dir, "http://s/videos/hello.mp4");
        let c = cached_clip_path(dir, "http://s/videos/you.mp4");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.extension().unwrap(), "mp4");
    }

    #[test]
    fn local_locators_bypass_the_cache() {
        let dir = Path::new("/tmp/cache");
        assert_eq!(playable_locator(dir, "signs/hello.mp4"), "signs/hello.mp4");
    }
}
