//! Trait for running the artifact tool

use crate::types::{InvocationSpec, ToolResult};
use async_trait::async_trait;

/// Runs the artifact tool once
///
/// A non-zero exit is a normal [`ToolResult`]; only failing to run the tool
/// at all (or running out of time) is an error.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the tool and wait for it to exit
    ///
    /// # Errors
    ///
    /// - [`Error::ToolSpawn`](crate::Error::ToolSpawn) if the process could not be started
    /// - [`Error::Timeout`](crate::Error::Timeout) if a timeout is configured and exceeded
    async fn invoke(&self, spec: &InvocationSpec) -> crate::Result<ToolResult>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
