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

//! Text-to-clip-sequence resolution.
//!
//! This module maps a text submission onto a [`Translation`]: the normalized
//! display string plus the ordered clip sequence that performs it.
//!
//! Two modes exist:
//!
//! * **Server mode** (authoritative): a blocking request to the translation
//!   server's `/videos/process-text/` endpoint, which returns the generated
//!   text and a list of relative clip paths.
//! * **Local mode**: the legacy tokenizer pipeline in [`tokenize`], mapping
//!   each signable token to a clip file under the configured media directory.
//!
//! Resolution runs on the command worker thread, never on the UI thread.

pub(crate) mod tokenize;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    config::AppConfig,
    model::{Clip, ClipSequence, Translation},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub(crate) enum ResolveError {
    #[error("translation request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("translation server error: {0}")]
    Server(String),

    #[error("translation response was malformed: {0}")]
    Payload(String),
}

/// Wire format of the translation server's process-text response.
#[derive(Debug, Deserialize)]
struct ProcessTextResponse {
    generated_text: String,
    video_paths: Vec<String>,
}

/// Wire format of the translation server's error payload.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Resolves text submissions into clip sequences.
///
/// Constructed once from the application configuration and handed to the
/// command worker; holds the HTTP client in server mode.
pub(crate) struct Resolver {
    server_url: Option<String>,
    media_dir: String,
    client: reqwest::blocking::Client,
}

impl Resolver {
    pub(crate) fn new(config: &AppConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            server_url: config.server_url.clone(),
            media_dir: config.media_dir.clone(),
            client,
        }
    }

    /// Resolves `text` into a translation.
    ///
    /// Callers are expected to have rejected empty submissions already; a
    /// blank input still resolves safely to an empty sequence.
    pub(crate) fn resolve(&self, text: &str) -> Result<Translation, ResolveError> {
        match &self.server_url {
            Some(base) => self.resolve_remote(base, text),
            None => Ok(resolve_local(&self.media_dir, text)),
        }
    }

    fn resolve_remote(&self, base: &str, text: &str) -> Result<Translation, ResolveError> {
        let url = request_url(base, text);
        debug!(%url, "requesting translation");

        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<ErrorResponse>()
                .map(|e| e.detail)
                .unwrap_or_else(|_| format!("request failed with status {status}"));
            return Err(ResolveError::Server(detail));
        }

        let body = response.text()?;
        parse_response(base, &body)
    }
}

/// Builds the process-text request URL for the given server base and text.
fn request_url(base: &str, text: &str) -> String {
    format!(
        "{}/videos/process-text/?text={}",
        base.trim_end_matches('/'),
        urlencoding::encode(text)
    )
}

/// Parses a process-text response body into a [`Translation`], joining the
/// server's relative clip paths onto the base URL.
fn parse_response(base: &str, body: &str) -> Result<Translation, ResolveError> {
    let parsed: ProcessTextResponse =
        serde_json::from_str(body).map_err(|e| ResolveError::Payload(e.to_string()))?;

    let base = base.trim_end_matches('/');
    let clips = parsed
        .video_paths
        .iter()
        .map(|path| {
            let label = clip_label(path);
            let locator = format!("{}/{}", base, path.trim_start_matches('/'));
            Clip::new(label, locator)
        })
        .collect();

    Ok(Translation {
        display_text: parsed.generated_text,
        sequence: ClipSequence::new(clips),
    })
}

/// Resolves text with the legacy tokenizer against the local media directory.
fn resolve_local(media_dir: &str, text: &str) -> Translation {
    let tokens = tokenize::tokenize(text);

    let clips = tokens
        .iter()
        .map(|token| {
            let locator = Path::new(media_dir)
                .join(format!("{}.mp4", token.to_lowercase()))
                .to_string_lossy()
                .into_owned();
            Clip::new(token.clone(), locator)
        })
        .collect();

    Translation {
        display_text: tokens.join(" "),
        sequence: ClipSequence::new(clips),
    }
}

// Display label for a server clip path, e.g. "videos/hello.mp4" -> "hello".
fn clip_label(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_text_and_trims_base() {
        assert_eq!(
            request_url("http://localhost:8000/", "hello there"),
            "http://localhost:8000/videos/process-text/?text=hello%20there"
        );
    }

    #[test]
    fn response_paths_are_joined_onto_the_base() {
        let body = r#"{"generated_text":"hello you","video_paths":["videos/hello.mp4","videos/you.mp4"]}"#;
        let translation = parse_response("http://localhost:8000", body).unwrap();

        assert_eq!(translation.display_text, "hello you");
        assert_eq!(translation.sequence.len(), 2);

        let first = translation.sequence.get(0).unwrap();
        assert_eq!(first.label, "hello");
        assert_eq!(first.locator, "http://localhost:8000/videos/hello.mp4");
    }

    #[test]
    fn malformed_response_is_a_payload_error() {
        let result = parse_response("http://localhost:8000", "not json");
        assert!(matches!(result, Err(ResolveError::Payload(_))));
    }

    #[test]
    fn local_mode_maps_tokens_to_media_files() {
        let translation = resolve_local("signs", "I was hungry");

        let labels: Vec<&str> = translation
            .sequence
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Before", "i", "w", "a", "s", "hungry"]);

        // Locators are lowercased clip filenames under the media dir.
        let first = translation.sequence.get(0).unwrap();
        assert_eq!(first.locator, "signs/before.mp4");
    }

    #[test]
    fn local_mode_blank_input_is_an_empty_sequence() {
        let translation = resolve_local("signs", "   ");
        assert!(translation.sequence.is_empty());
        assert!(translation.display_text.is_empty());
    }
}
