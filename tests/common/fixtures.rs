//! Fake artifact tools for driving real processes in tests

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Line the fake tool writes to standard output
pub const FAKE_TOOL_STDOUT: &str = "Downloaded 1 package";

/// A shell script standing in for the artifact tool
///
/// Every run appends its arguments (one per line) to `args.log` and the
/// credential variable to `pat.log`, both next to the script. It prints
/// [`FAKE_TOOL_STDOUT`] on standard output.
pub struct FakeArtifactTool {
    pub path: PathBuf,
    dir: PathBuf,
}

impl FakeArtifactTool {
    /// Create a tool that prints `stderr` to standard error and exits with `exit_code`
    pub fn create(dir: &Path, exit_code: i32, stderr: &str) -> Self {
        let path = dir.join("ArtifactTool");
        let script = format!(
            r#"#!/bin/sh
for arg in "$@"; do
  printf '%s\n' "$arg" >> "{dir}/args.log"
done
printf '%s\n' "$UNIVERSAL_DOWNLOAD_PAT" >> "{dir}/pat.log"
echo 'Downloaded 1 package'
printf '%s' '{stderr}' >&2
exit {exit_code}
"#,
            dir = dir.display(),
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            path,
            dir: dir.to_path_buf(),
        }
    }

    /// Arguments of every recorded run, in order
    pub fn recorded_args(&self) -> Vec<String> {
        read_lines(&self.dir.join("args.log"))
    }

    /// Credential of every recorded run
    pub fn recorded_pats(&self) -> Vec<String> {
        read_lines(&self.dir.join("pat.log"))
    }

    /// Whether the tool ran at all
    pub fn was_invoked(&self) -> bool {
        self.dir.join("pat.log").exists()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
