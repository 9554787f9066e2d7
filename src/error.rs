//! Error types for universal-download
//!
//! This module provides the error type shared by every stage of a run:
//! - Configuration errors (feed type, external endpoint, auth shape)
//! - Package identity lookups against the feed service
//! - Artifact tool invocation (failed start, non-zero exit, timeout)
//!
//! Every error can be classified into an [`ErrorKind`] and carries a stable,
//! machine-readable [`Error::error_code`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for universal-download operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for universal-download
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which input is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The task input that caused the error (e.g., "downloadDirectory")
        key: Option<String>,
    },

    /// The feed type input matched neither "internal" nor "external"
    #[error("unknown feed type '{0}'")]
    UnknownFeedType(String),

    /// No external endpoint definition was found for the configured name
    #[error("no source specified for download: endpoint '{endpoint}' not found")]
    NoSourceSpecified {
        /// The endpoint name that was looked up
        endpoint: String,
    },

    /// The external endpoint uses an authentication shape other than a token
    #[error("endpoint '{endpoint}' uses unsupported authentication scheme '{scheme}'")]
    UnsupportedAuthScheme {
        /// The endpoint name
        endpoint: String,
        /// The authentication scheme found on the endpoint
        scheme: String,
    },

    /// A feed location or package name lookup returned an unusable answer
    #[error("identity resolution failed during {step}: {message}")]
    IdentityResolution {
        /// Which lookup failed ("feed location" or "package name")
        step: &'static str,
        /// What went wrong
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The artifact tool could not be started at all
    #[error("failed to execute artifact tool at {}: {source}", path.display())]
    ToolSpawn {
        /// Path of the executable that failed to start
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The artifact tool ran and exited with a non-zero code
    #[error("artifact tool exited with code {code}: {stderr}")]
    UnexpectedToolExit {
        /// Exit code reported by the tool (-1 when terminated by a signal)
        code: i32,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The artifact tool did not finish within the configured timeout
    #[error("artifact tool timed out after {after:?}")]
    Timeout {
        /// The configured timeout
        after: Duration,
    },
}

/// Coarse error classification used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown feed type, missing or unsupported endpoint
    Configuration,
    /// One of the two identity lookups failed
    IdentityResolution,
    /// The artifact tool failed to start, exited non-zero, or timed out
    ToolInvocation,
}

impl Error {
    /// Build a configuration error for a specific task input
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. }
            | Error::UnknownFeedType(_)
            | Error::NoSourceSpecified { .. }
            | Error::UnsupportedAuthScheme { .. } => ErrorKind::Configuration,

            Error::IdentityResolution { .. } | Error::Network(_) | Error::Serialization(_) => {
                ErrorKind::IdentityResolution
            }

            Error::ToolSpawn { .. } | Error::UnexpectedToolExit { .. } | Error::Timeout { .. } => {
                ErrorKind::ToolInvocation
            }
        }
    }

    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::UnknownFeedType(_) => "unknown_feed_type",
            Error::NoSourceSpecified { .. } => "no_source_specified",
            Error::UnsupportedAuthScheme { .. } => "unsupported_auth_scheme",
            Error::IdentityResolution { .. } => "identity_resolution_failed",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ToolSpawn { .. } => "tool_spawn_failed",
            Error::UnexpectedToolExit { .. } => "unexpected_tool_exit",
            Error::Timeout { .. } => "tool_timeout",
        }
    }
}
