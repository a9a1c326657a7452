//! Error types for the rescan pipeline

use thiserror::Error;

/// Error kinds that can occur while rewriting, resolving or dispatching scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanErrorKind {
    /// Invalid configuration (bad rewrite pattern, unreadable config file)
    Config,
    /// The media server answered with an unexpected status or body
    Remote,
    /// The media server could not be reached or answered with a 5xx
    RemoteUnavailable,
    /// Malformed inbound payload
    Decode,
    /// No library owns the given folder
    NotFound,
    /// The processor rejected a batch of scans
    Processor,
    /// I/O error
    Io,
}

/// Represents an error raised by an adapter or its collaborators
#[derive(Debug, Error)]
#[error("{kind:?}: {message}{}", path_suffix(.path))]
pub struct RescanError {
    /// The kind of error
    pub kind: RescanErrorKind,
    /// The folder the error relates to, if any
    pub path: Option<String>,
    /// Human-readable error message
    pub message: String,
}

fn path_suffix(path: &Option<String>) -> String {
    match path {
        Some(p) => format!(" (path: {p})"),
        None => String::new(),
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RescanError>;

impl RescanError {
    /// Create a new rescan error
    pub fn new(kind: RescanErrorKind, path: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(RescanErrorKind::Config, None, message)
    }

    /// Create a remote API error
    pub fn remote_error(message: impl Into<String>) -> Self {
        Self::new(RescanErrorKind::Remote, None, message)
    }

    /// Create an error for an unreachable remote
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::new(RescanErrorKind::RemoteUnavailable, None, message)
    }

    /// Create a payload decoding error
    pub fn decode_error(message: impl Into<String>) -> Self {
        Self::new(RescanErrorKind::Decode, None, message)
    }

    /// Create a not found error for a folder without a library
    pub fn not_found(folder: impl Into<String>) -> Self {
        let folder = folder.into();
        Self::new(
            RescanErrorKind::NotFound,
            Some(folder.clone()),
            format!("{folder}: failed determining library"),
        )
    }

    /// Create a processor error
    pub fn processor_error(message: impl Into<String>) -> Self {
        Self::new(RescanErrorKind::Processor, None, message)
    }

    /// Attach the folder this error relates to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether this is a remote error of either flavour
    pub fn is_remote(&self) -> bool {
        matches!(
            self.kind,
            RescanErrorKind::Remote | RescanErrorKind::RemoteUnavailable
        )
    }
}

impl From<std::io::Error> for RescanError {
    fn from(err: std::io::Error) -> Self {
        Self::new(RescanErrorKind::Io, None, err.to_string())
    }
}

impl From<regex::Error> for RescanError {
    fn from(err: regex::Error) -> Self {
        Self::config_error(err.to_string())
    }
}

impl From<serde_yaml::Error> for RescanError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_error(err.to_string())
    }
}

impl From<serde_json::Error> for RescanError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode_error(err.to_string())
    }
}

impl From<reqwest::Error> for RescanError {
    fn from(err: reqwest::Error) -> Self {
        let unavailable = err.is_connect()
            || err.is_timeout()
            || err.status().is_some_and(|s| s.is_server_error());
        if unavailable {
            Self::remote_unavailable(err.to_string())
        } else {
            Self::remote_error(err.to_string())
        }
    }
}
