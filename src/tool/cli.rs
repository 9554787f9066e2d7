//! Process-based artifact tool invoker

use super::traits::ToolInvoker;
use crate::error::{Error, Result};
use crate::types::{InvocationSpec, ToolResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs the artifact tool as a child process
///
/// The environment overlay is added to the inherited environment. Standard
/// output and standard error are captured. Without a timeout the call waits
/// for as long as the tool runs.
///
/// # Examples
///
/// ```no_run
/// use universal_download::tool::{CliToolInvoker, ToolInvoker};
/// use universal_download::types::InvocationSpec;
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = InvocationSpec {
///     executable: PathBuf::from("/opt/ArtifactTool"),
///     arguments: vec!["--version".into()],
///     environment: Default::default(),
/// };
/// let result = CliToolInvoker::new().invoke(&spec).await?;
/// println!("exit code {}", result.exit_code);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CliToolInvoker {
    timeout: Option<Duration>,
}

impl CliToolInvoker {
    /// Invoker that waits until the tool exits
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Invoker that kills the tool after `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolInvoker for CliToolInvoker {
    async fn invoke(&self, spec: &InvocationSpec) -> Result<ToolResult> {
        let mut command = Command::new(&spec.executable);
        command
            .args(&spec.arguments)
            .envs(&spec.environment)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(tool = ?spec.executable, args = ?spec.arguments, "running artifact tool");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| Error::Timeout { after: limit })?,
            None => command.output().await,
        }
        .map_err(|source| Error::ToolSpawn {
            path: spec.executable.clone(),
            source,
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(exit_code, "artifact tool exited");

        Ok(ToolResult {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn spec_for(executable: &Path, environment: &[(&str, &str)]) -> InvocationSpec {
        InvocationSpec {
            executable: executable.to_path_buf(),
            arguments: vec!["universal".into(), "download".into()],
            environment: environment
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-tool.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_executable_is_spawn_error() {
        let spec = spec_for(Path::new("/nonexistent/path/to/ArtifactTool"), &[]);

        let err = CliToolInvoker::new().invoke(&spec).await.unwrap_err();

        match err {
            Error::ToolSpawn { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/path/to/ArtifactTool"));
            }
            other => panic!("expected ToolSpawn error, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_result_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo out; echo '  disk full  ' >&2; exit 3");

        let result = CliToolInvoker::new()
            .invoke(&spec_for(&script, &[]))
            .await
            .unwrap();

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr, "  disk full  \n");
        assert!(!result.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn overlay_is_merged_into_inherited_environment() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"echo "pat=$UNIVERSAL_DOWNLOAD_PAT"; test -n "$PATH" && echo inherited; echo "args=$*""#,
        );

        let result = CliToolInvoker::new()
            .invoke(&spec_for(&script, &[("UNIVERSAL_DOWNLOAD_PAT", "tok-123")]))
            .await
            .unwrap();

        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("pat=tok-123"));
        assert!(result.stdout.contains("inherited"));
        assert!(result.stdout.contains("args=universal download"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_stops_a_hung_tool() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "sleep 30");

        let err = CliToolInvoker::with_timeout(Some(Duration::from_millis(200)))
            .invoke(&spec_for(&script, &[]))
            .await
            .unwrap_err();

        assert!(
            matches!(err, Error::Timeout { after } if after == Duration::from_millis(200)),
            "got {err:?}"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_does_not_affect_a_fast_tool() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "exit 0");

        let result = CliToolInvoker::with_timeout(Some(Duration::from_secs(30)))
            .invoke(&spec_for(&script, &[]))
            .await
            .unwrap();

        assert!(result.success());
    }
}
