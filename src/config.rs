//! Configuration types for universal-download

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::host::TaskHost;

/// Names of the task inputs read at start
pub mod input_names {
    /// Destination directory
    pub const DOWNLOAD_DIRECTORY: &str = "downloadDirectory";
    /// "internal" or "external"
    pub const FEED_TYPE: &str = "internalOrExternalDownload";
    /// Internal feed id
    pub const INTERNAL_FEED: &str = "feedListDownload";
    /// Internal package id
    pub const INTERNAL_PACKAGE: &str = "packageListDownload";
    /// Internal package version
    pub const INTERNAL_VERSION: &str = "versionListDownload";
    /// External feed name
    pub const EXTERNAL_FEED: &str = "feedDownloadExternal";
    /// External package name
    pub const EXTERNAL_PACKAGE: &str = "packageDownloadExternal";
    /// External package version
    pub const EXTERNAL_VERSION: &str = "versionDownloadExternal";
    /// Name of the external endpoint definition
    pub const EXTERNAL_ENDPOINT: &str = "externalEndpoint";
    /// Artifact tool verbosity
    pub const VERBOSITY: &str = "verbosity";
}

/// Task inputs, one field per configured input
///
/// Missing inputs read as empty strings, except the feed type, which
/// defaults to "internal".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInputs {
    /// Destination path; empty means there is nothing to do
    #[serde(default)]
    pub download_directory: String,

    /// Raw feed type, matched case-insensitively
    #[serde(
        rename = "internalOrExternalDownload",
        default = "default_feed_type"
    )]
    pub feed_type: String,

    /// Internal feed id
    #[serde(rename = "feedListDownload", default)]
    pub internal_feed: String,

    /// Internal package id (opaque, resolved to a name)
    #[serde(rename = "packageListDownload", default)]
    pub internal_package_id: String,

    /// Internal package version
    #[serde(rename = "versionListDownload", default)]
    pub internal_version: String,

    /// External feed name
    #[serde(rename = "feedDownloadExternal", default)]
    pub external_feed: String,

    /// External package name
    #[serde(rename = "packageDownloadExternal", default)]
    pub external_package: String,

    /// External package version
    #[serde(rename = "versionDownloadExternal", default)]
    pub external_version: String,

    /// Name of the stored external endpoint definition
    #[serde(default)]
    pub external_endpoint: String,

    /// Verbosity passed through to the artifact tool
    #[serde(default)]
    pub verbosity: String,
}

impl Default for TaskInputs {
    fn default() -> Self {
        Self {
            download_directory: String::new(),
            feed_type: default_feed_type(),
            internal_feed: String::new(),
            internal_package_id: String::new(),
            internal_version: String::new(),
            external_feed: String::new(),
            external_package: String::new(),
            external_version: String::new(),
            external_endpoint: String::new(),
            verbosity: String::new(),
        }
    }
}

impl TaskInputs {
    /// Read every input from the host once
    pub fn from_host(host: &dyn TaskHost) -> Self {
        use input_names::*;

        let read = |name: &str| host.input(name).unwrap_or_default();
        let feed_type = read(FEED_TYPE);

        Self {
            download_directory: read(DOWNLOAD_DIRECTORY),
            feed_type: if feed_type.is_empty() {
                default_feed_type()
            } else {
                feed_type
            },
            internal_feed: read(INTERNAL_FEED),
            internal_package_id: read(INTERNAL_PACKAGE),
            internal_version: read(INTERNAL_VERSION),
            external_feed: read(EXTERNAL_FEED),
            external_package: read(EXTERNAL_PACKAGE),
            external_version: read(EXTERNAL_VERSION),
            external_endpoint: read(EXTERNAL_ENDPOINT),
            verbosity: read(VERBOSITY),
        }
    }
}

/// Artifact tool settings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the artifact tool (searched in PATH if None)
    #[serde(default)]
    pub artifact_tool_path: Option<PathBuf>,

    /// Upper bound on one tool run (None = wait until the tool exits)
    #[serde(default, with = "optional_duration_serde")]
    pub invocation_timeout: Option<Duration>,
}

/// Settings for the feed location and package name lookups
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// REST API version sent with both lookups (default: "5.0-preview.1")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for each HTTP request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Process-wide settings that are not task inputs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Artifact tool settings
    #[serde(default)]
    pub tool: ToolConfig,

    /// Identity lookup settings
    #[serde(default)]
    pub identity: IdentityConfig,
}

fn default_feed_type() -> String {
    "internal".to_string()
}

fn default_api_version() -> String {
    "5.0-preview.1".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
