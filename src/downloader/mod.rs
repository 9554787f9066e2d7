//! Download orchestration
//!
//! [`UniversalDownloader`] runs one download from task inputs to task result:
//! - [`run`] - the stage sequence and top-level error reporting
//!
//! Collaborators are trait objects so each seam can be replaced:
//! [`TaskHost`], [`PackageIdentityResolver`], [`ToolInvoker`] and
//! [`TelemetrySink`].

mod run;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::host::TaskHost;
use crate::identity::{HttpIdentityResolver, PackageIdentityResolver};
use crate::telemetry::{TelemetrySink, TracingTelemetry};
use crate::tool::{self, CliToolInvoker, ToolInvoker};

/// Runs Universal Package downloads against a task host
///
/// Holds no state between runs; every [`run`](UniversalDownloader::run)
/// reads its inputs from the host afresh.
#[derive(Clone)]
pub struct UniversalDownloader {
    /// Source of inputs and endpoints, receiver of logs and the result
    pub(crate) host: Arc<dyn TaskHost>,
    /// Package id to name lookups (internal feeds)
    pub(crate) identity: Arc<dyn PackageIdentityResolver>,
    /// Runs the artifact tool
    pub(crate) tool: Arc<dyn ToolInvoker>,
    /// Receives a telemetry event when the tool fails
    pub(crate) telemetry: Arc<dyn TelemetrySink>,
    /// Artifact tool executable
    pub(crate) artifact_tool_path: PathBuf,
}

impl UniversalDownloader {
    /// Create a downloader for an artifact tool at a known path
    ///
    /// Uses the REST identity resolver, a process invoker honoring
    /// `config.tool.invocation_timeout`, and `tracing` telemetry.
    pub fn new(
        host: Arc<dyn TaskHost>,
        artifact_tool_path: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            host,
            identity: Arc::new(HttpIdentityResolver::new(&config.identity)?),
            tool: Arc::new(CliToolInvoker::with_timeout(config.tool.invocation_timeout)),
            telemetry: Arc::new(TracingTelemetry),
            artifact_tool_path: artifact_tool_path.into(),
        })
    }

    /// Create a downloader, locating the artifact tool from configuration or PATH
    pub fn from_config(host: Arc<dyn TaskHost>, config: &Config) -> Result<Self> {
        let path = tool::locate(&config.tool)?;
        tracing::debug!(path = ?path, "using artifact tool");
        Self::new(host, path, config)
    }

    /// Replace the identity resolver
    pub fn with_identity_resolver(mut self, identity: Arc<dyn PackageIdentityResolver>) -> Self {
        self.identity = identity;
        self
    }

    /// Replace the tool invoker
    pub fn with_tool_invoker(mut self, tool: Arc<dyn ToolInvoker>) -> Self {
        self.tool = tool;
        self
    }

    /// Replace the telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Path of the artifact tool this downloader runs
    pub fn artifact_tool_path(&self) -> &std::path::Path {
        &self.artifact_tool_path
    }
}
