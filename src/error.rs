//! Error types used by the audiovisor runtime and actors.
//!
//! This module defines three error enums:
//!
//! - [`SettingsError`] — configuration problems, fatal before anything starts.
//! - [`ActorError`] — failures raised by an individual actor's `start`/`stop`.
//! - [`RuntimeError`] — failures in the supervision runtime itself.
//!
//! [`ActorError::OptionalDependency`] is the distinguished "skip this
//! subsystem gracefully" signal: a frontend that fails to start with it is
//! treated as absent, not failed, and its later teardown is swallowed too.

use std::path::PathBuf;
use thiserror::Error;

/// # Errors in the settings layer.
///
/// All of these are raised before any subsystem has started, so they never
/// trigger teardown. The daemon logs a single line and exits non-zero.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read or created.
    #[error("cannot access settings file {}: {source}", path.display())]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`](crate::Settings).
    #[error("invalid settings file {}: {reason}", path.display())]
    Invalid {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// No backend is configured; at least one entry is required.
    #[error("no backend configured (set `backends` in the settings file)")]
    NoBackend,

    /// A configured identity is empty or whitespace-only.
    #[error("blank actor identity in settings")]
    BlankIdentity,

    /// A configured identity has no registered factory in the catalog.
    #[error("unknown actor {identity:?}: no such actor is registered")]
    UnknownActor {
        /// The identity that failed to resolve.
        identity: String,
    },
}

impl SettingsError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SettingsError::Io { .. } => "settings_io",
            SettingsError::Invalid { .. } => "settings_invalid",
            SettingsError::NoBackend => "settings_no_backend",
            SettingsError::BlankIdentity => "settings_blank_identity",
            SettingsError::UnknownActor { .. } => "settings_unknown_actor",
        }
    }
}

/// # Errors produced by actor `start`/`stop` calls.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActorError {
    /// An optional runtime dependency is missing.
    ///
    /// For frontends this means "run degraded without me": startup logs at
    /// info level and continues, and the matching stop is swallowed silently.
    #[error("optional dependency missing: {reason}")]
    OptionalDependency {
        /// What was missing.
        reason: String,
    },

    /// Generic start/stop failure.
    #[error("{reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },
}

impl ActorError {
    /// Shorthand for the generic failure variant.
    pub fn failed(reason: impl Into<String>) -> Self {
        ActorError::Failed {
            reason: reason.into(),
        }
    }

    /// Shorthand for the optional-dependency marker.
    pub fn optional(reason: impl Into<String>) -> Self {
        ActorError::OptionalDependency {
            reason: reason.into(),
        }
    }

    /// Indicates whether this is the optional-dependency marker.
    ///
    /// # Example
    /// ```
    /// use audiovisor::ActorError;
    ///
    /// assert!(ActorError::optional("no API key").is_optional());
    /// assert!(!ActorError::failed("boom").is_optional());
    /// ```
    pub fn is_optional(&self) -> bool {
        matches!(self, ActorError::OptionalDependency { .. })
    }
}

/// # Errors produced by the supervision runtime.
///
/// These are fatal for the run: the supervisor logs them with full detail,
/// performs the unconditional teardown, and the process still exits 0.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A subsystem failed to start (non-marker, or marker on a mandatory
    /// identity such as audio or the backend).
    #[error("actor {identity:?} failed to start: {source}")]
    StartFailed {
        /// Identity of the subsystem that failed.
        identity: String,
        /// The actor's own error.
        source: ActorError,
    },

    /// OS signal handlers could not be installed.
    #[error("cannot install signal handlers: {source}")]
    Signals {
        /// Underlying I/O error from signal registration.
        source: std::io::Error,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::StartFailed { .. } => "runtime_start_failed",
            RuntimeError::Signals { .. } => "runtime_signals",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_marker_is_distinguished() {
        assert!(ActorError::optional("scrobbler key unset").is_optional());
        assert!(!ActorError::failed("socket in use").is_optional());
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(SettingsError::NoBackend.as_label(), "settings_no_backend");
        let err = RuntimeError::StartFailed {
            identity: "mpd".into(),
            source: ActorError::failed("bind failed"),
        };
        assert_eq!(err.as_label(), "runtime_start_failed");
    }
}
