//! User-facing messages written to the task host

/// Destination directory input is empty
pub const DOWNLOAD_DIRECTORY_NOT_FOUND: &str =
    "Download directory not found or empty. Nothing to download.";

/// External endpoint is missing
pub const NO_SOURCE_SPECIFIED: &str =
    "No source was specified for download. Select an external feed service connection.";

/// About to run the artifact tool
pub const USING_ARTIFACT_TOOL: &str = "Using the artifact tool to download the package.";

/// Run finished successfully
pub const PACKAGES_DOWNLOADED: &str = "Package(s) downloaded successfully.";

/// Run failed; details were logged separately
pub const PACKAGES_FAILED: &str = "Package(s) failed to download.";

/// Feed type input is not recognized
pub fn unknown_feed_type(feed_type: &str) -> String {
    format!("Unknown feed type '{feed_type}'")
}

/// Starting the download
pub fn downloading(package_name: &str, version: &str, feed_id: &str) -> String {
    format!("Downloading package: {package_name}, version: {version} using feed id: {feed_id}")
}

/// Artifact tool exited with an error
pub fn unexpected_tool_error(exit_code: i32, stderr: &str) -> String {
    format!(
        "An unexpected error occurred while trying to download the package. \
         Exit code({exit_code}) and error({stderr})"
    )
}
