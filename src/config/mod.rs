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

//! Application configuration.
//!
//! This module manages the application configuration file, including the
//! persisted dark-mode preference. The preference is read once at startup and
//! written back on every toggle; a missing or unreadable file falls back to
//! defaults.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "handspeak";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,

    /// Base URL of the translation server. When unset the application runs
    /// in local mode and resolves text with the built-in tokenizer against
    /// `media_dir`.
    pub server_url: Option<String>,

    /// Directory of sign clip files used in local mode, one `{token}.mp4`
    /// per signable token.
    pub media_dir: String,

    /// Speech capture locale tag, one of [`crate::model::LOCALES`].
    pub locale: String,

    /// External transcriber command for speech capture. When unset, starting
    /// a capture session reports that capture is unsupported.
    pub recognizer_cmd: Option<String>,

    /// Persisted UI theme preference.
    pub dark_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: None,
            media_dir: "signs".to_string(),
            locale: "en-US".to_string(),
            recognizer_cmd: None,
            dark_mode: true,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}
