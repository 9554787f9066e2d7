//! # universal-download
//!
//! Downloads a Universal Package from an internal or external feed by driving
//! the artifact tool.
//!
//! A run reads the task inputs, works out where the feed lives and which token
//! to use, looks up the package name when only an id is known, and then runs
//! `ArtifactTool universal download ...` with the token in an environment
//! variable. The tool's exit code becomes the task result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use universal_download::{Config, EnvTaskHost, UniversalDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = UniversalDownloader::from_config(Arc::new(EnvTaskHost), &Config::default())?;
//!     let report = downloader.run().await;
//!     println!("{:?}", report.task_result());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Feed authentication
pub mod auth;
/// Configuration types
pub mod config;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Task host boundary
pub mod host;
/// Package id to name resolution
pub mod identity;
/// Artifact tool command line construction
pub mod invocation;
/// User-facing messages
pub mod messages;
/// Tool result interpretation
pub mod outcome;
/// Telemetry sinks
pub mod telemetry;
/// Artifact tool execution
pub mod tool;
/// Core types
pub mod types;

// Re-export commonly used types
pub use auth::{AuthSources, ExternalAuth, ExternalEndpoint};
pub use config::{Config, IdentityConfig, TaskInputs, ToolConfig};
pub use downloader::UniversalDownloader;
pub use error::{Error, ErrorKind, Result};
pub use host::{AmbientContext, EndpointAuthorization, EnvTaskHost, MemoryTaskHost, TaskHost};
pub use identity::{HttpIdentityResolver, PackageIdentityResolver};
pub use telemetry::{ChannelTelemetry, TelemetrySink, TracingTelemetry};
pub use tool::{CliToolInvoker, ToolInvoker};
pub use types::{
    AuthContext, FeedType, InvocationSpec, PackageRequest, RunReport, Stage, TaskResult,
    TelemetryEvent, TerminalState, ToolResult,
};
