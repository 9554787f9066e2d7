//! Core types for universal-download

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Error;

/// Which kind of feed the package is downloaded from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// Feed hosted by the same service instance, using ambient credentials
    Internal,
    /// Remote registry reached through a user-configured token endpoint
    External,
}

impl FeedType {
    /// Canonical lower-case literal
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::Internal => "internal",
            FeedType::External => "external",
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedType {
    type Err = Error;

    /// Case-insensitive match against the two allowed literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [FeedType::Internal, FeedType::External]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFeedType(s.to_string()))
    }
}

/// Normalized authentication context for one run
///
/// The token is never shown by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Base URI of the service that hosts the feed
    pub service_uri: String,
    /// Bearer token handed to the artifact tool
    pub token: String,
    /// Feed identifier
    pub feed_id: String,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("service_uri", &self.service_uri)
            .field("token", &"<redacted>")
            .field("feed_id", &self.feed_id)
            .finish()
    }
}

/// What to download and where to put it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    /// Feed identifier
    pub feed_id: String,
    /// Human-readable package name
    pub package_name: String,
    /// Package version
    pub package_version: String,
    /// Destination directory (never empty once a request exists)
    pub destination: PathBuf,
}

/// Exact command line and environment overlay for one artifact tool run
#[derive(Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    /// Path of the artifact tool executable
    pub executable: PathBuf,
    /// Arguments in the order the tool expects them
    pub arguments: Vec<String>,
    /// Variables added on top of the inherited environment
    pub environment: BTreeMap<String, String>,
}

impl std::fmt::Debug for InvocationSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env_names: Vec<&str> = self.environment.keys().map(String::as_str).collect();
        f.debug_struct("InvocationSpec")
            .field("executable", &self.executable)
            .field("arguments", &self.arguments)
            .field("environment", &env_names)
            .finish()
    }
}

/// Captured outcome of one artifact tool run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolResult {
    /// Process exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ToolResult {
    /// Whether the tool reported success
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Final result written back to the task host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskResult {
    /// The task succeeded
    Succeeded,
    /// The task failed
    Failed,
}

impl TaskResult {
    /// Name used by the host's `task.complete` command
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskResult::Succeeded => "Succeeded",
            TaskResult::Failed => "Failed",
        }
    }
}

/// Stage a run is in, in the order they are entered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing done yet
    Start,
    /// Checking the destination directory
    DirectoryCheck,
    /// Feed type parsed
    FeedTypeResolved,
    /// Authentication context built
    AuthResolved,
    /// Package name looked up (internal feeds only)
    IdentityResolved,
    /// Artifact tool has run
    Invoked,
    /// Outcome written to the host
    Reported,
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Package downloaded
    Succeeded,
    /// A failure was caught and reported as a failed result
    FailedReported,
    /// Nothing to do (empty destination); reported as success
    FailedEarly,
}

impl TerminalState {
    /// Result the host receives for this terminal state
    pub fn task_result(&self) -> TaskResult {
        match self {
            TerminalState::Succeeded | TerminalState::FailedEarly => TaskResult::Succeeded,
            TerminalState::FailedReported => TaskResult::Failed,
        }
    }
}

/// Summary of a finished run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended
    pub state: TerminalState,
    /// Last stage reached before the run ended
    pub last_stage: Stage,
    /// Message passed to the host along with the result, if any
    pub message: Option<String>,
}

impl RunReport {
    /// Result the host received
    pub fn task_result(&self) -> TaskResult {
        self.state.task_result()
    }
}

/// Telemetry record for a failed artifact tool command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Telemetry area
    pub area: String,
    /// Feature within the area
    pub feature: String,
    /// Exit code of the failed command
    pub exit_code: i32,
    /// Command that failed
    pub command: String,
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,
}

/// Telemetry area for packaging commands
pub const TELEMETRY_AREA: &str = "Packaging";
/// Telemetry feature for Universal Packages commands
pub const TELEMETRY_FEATURE: &str = "UniversalPackagesCommand";

impl TelemetryEvent {
    /// Record a failed `download` command
    pub fn download_failed(exit_code: i32) -> Self {
        Self {
            area: TELEMETRY_AREA.to_string(),
            feature: TELEMETRY_FEATURE.to_string(),
            exit_code,
            command: "download".to_string(),
            timestamp: Utc::now(),
        }
    }
}
