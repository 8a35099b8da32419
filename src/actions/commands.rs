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

//! Asynchronous application command processing.
//!
//! This module implements the command pattern used to offload blocking
//! translation requests from the main UI thread. It provides a dedicated
//! worker loop that translates [`AppCommand`] requests into resolver calls
//! and broadcasts the results back to the application via [`AppEvent`]s.
//!
//! Translation results carry the generation number of the submission that
//! produced them; the event loop drops any result whose generation is no
//! longer current, so a stale response can never replace a newer one.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;
use tracing::debug;

use crate::{actions::events::AppEvent, config::AppConfig, translate::Resolver};

#[derive(Debug)]
pub(crate) enum AppCommand {
    /// Resolve `text` into a clip sequence; `generation` identifies the
    /// submission.
    Translate { generation: u64, text: String },
}

/// Spawns a background thread to process application commands.
///
/// The worker owns the translation resolver (and with it the HTTP client in
/// server mode) and enters a blocking loop, listening for incoming
/// [`AppCommand`]s.
pub(crate) fn spawn_command_worker(
    config: &AppConfig,
    command_rx: Receiver<AppCommand>,
    event_tx: Sender<AppEvent>,
) {
    let resolver = Resolver::new(config);

    thread::spawn(move || {
        while let Ok(request) = command_rx.recv() {
            if let Err(e) = handle_command(&resolver, request, &event_tx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Orchestrates the execution of a single command and sends the result back
/// through the application event channel.
fn handle_command(
    resolver: &Resolver,
    command: AppCommand,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    match command {
        AppCommand::Translate { generation, text } => {
            debug!(generation, "resolving text submission");
            match resolver.resolve(&text) {
                Ok(translation) => event_tx.send(AppEvent::TranslationReady {
                    generation,
                    translation,
                })?,
                Err(e) => event_tx.send(AppEvent::TranslationFailed {
                    generation,
                    message: e.to_string(),
                })?,
            }
        }
    }

    Ok(())
}
