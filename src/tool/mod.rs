//! Artifact tool execution
//!
//! The artifact tool is an external executable that performs the actual
//! download. This module runs it with a built [`InvocationSpec`](crate::types::InvocationSpec)
//! and reports what happened, without judging the exit code.
//!
//! - [`ToolInvoker`]: the execution seam
//! - [`CliToolInvoker`]: spawns the process with `tokio::process`

mod cli;
mod traits;

pub use cli::CliToolInvoker;
pub use traits::ToolInvoker;

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// File name searched for in PATH when no tool path is configured
pub const ARTIFACT_TOOL_NAME: &str = "ArtifactTool";

/// Find the artifact tool
///
/// Uses the configured path when set, otherwise searches PATH.
pub fn locate(config: &ToolConfig) -> Result<PathBuf> {
    if let Some(path) = &config.artifact_tool_path {
        return Ok(path.clone());
    }

    which::which(ARTIFACT_TOOL_NAME).map_err(|e| Error::Config {
        message: format!("{ARTIFACT_TOOL_NAME} not found in PATH: {e}"),
        key: Some("artifact_tool_path".into()),
    })
}
