//! Interpretation of artifact tool results

use crate::error::{Error, Result};
use crate::messages;
use crate::telemetry::TelemetrySink;
use crate::types::{TelemetryEvent, ToolResult};

/// Judge a finished tool run
///
/// Exit code 0 is success. Anything else publishes one telemetry event and
/// returns [`Error::UnexpectedToolExit`] with the trimmed standard error.
/// Whitespace-only output is passed through as-is.
pub fn report(result: &ToolResult, telemetry: &dyn TelemetrySink) -> Result<()> {
    if result.success() {
        return Ok(());
    }

    telemetry.publish(TelemetryEvent::download_failed(result.exit_code));

    let trimmed = result.stderr.trim();
    let stderr = if trimmed.is_empty() {
        result.stderr.clone()
    } else {
        trimmed.to_string()
    };

    Err(Error::UnexpectedToolExit {
        code: result.exit_code,
        stderr,
    })
}

/// Text shown to the user for an error
pub fn describe(error: &Error) -> String {
    match error {
        Error::UnexpectedToolExit { code, stderr } => messages::unexpected_tool_error(*code, stderr),
        Error::UnknownFeedType(raw) => messages::unknown_feed_type(raw),
        Error::NoSourceSpecified { .. } => messages::NO_SOURCE_SPECIFIED.to_string(),
        other => other.to_string(),
    }
}
