//! # Settings: which subsystems to run.
//!
//! [`Settings`] is the validated configuration the supervisor consumes. It is
//! loaded once at process start and read-only afterwards.
//!
//! ## File format
//! ```toml
//! audio = "audio"
//! backends = ["local"]
//! frontends = ["mpd", "scrobbler"]
//! ```
//!
//! ## Semantics
//! - `audio`: the audio engine identity. Implicit and singular; defaults to
//!   `"audio"`.
//! - `backends`: ordered list; only the **first** entry is ever started.
//!   Must be non-empty.
//! - `frontends`: ordered list, possibly empty. Start order is the list
//!   order; stop order is the reverse.
//!
//! [`Settings::load`] has get-or-create semantics: a missing settings file
//! (and its parent folders) is created with defaults so a first run works
//! out of the box.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SettingsError;

/// Contents written to a freshly created settings file.
const DEFAULT_SETTINGS_FILE: &str = "\
# audiovisor settings
audio = \"audio\"
backends = [\"local\"]
frontends = [\"mpd\"]
";

fn default_audio() -> String {
    "audio".to_string()
}

/// Validated daemon configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    /// Identity of the audio engine.
    #[serde(default = "default_audio")]
    pub audio: String,

    /// Backend identities; only the first is started.
    #[serde(default)]
    pub backends: Vec<String>,

    /// Frontend identities, in start order.
    #[serde(default)]
    pub frontends: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            audio: default_audio(),
            backends: vec!["local".to_string()],
            frontends: vec!["mpd".to_string()],
        }
    }
}

impl Settings {
    /// Default settings file path under the platform config directory,
    /// falling back to the current directory when no home is known.
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("", "", "audiovisor") {
            Some(dirs) => dirs.config_dir().join("settings.toml"),
            None => PathBuf::from("settings.toml"),
        }
    }

    /// Loads settings from `path`, creating the file (and parent folders)
    /// with defaults when missing.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file missing, creating default");
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }
            }
            fs::write(path, DEFAULT_SETTINGS_FILE).map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| SettingsError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Checks structural invariants: a non-empty backend list and no blank
    /// identities anywhere.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.backends.is_empty() {
            return Err(SettingsError::NoBackend);
        }
        let all = std::iter::once(self.audio.as_str())
            .chain(self.backends.iter().map(String::as_str))
            .chain(self.frontends.iter().map(String::as_str));
        for id in all {
            if id.trim().is_empty() {
                return Err(SettingsError::BlankIdentity);
            }
        }
        Ok(())
    }

    /// Renders the effective settings as TOML (for `--list-settings`).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
