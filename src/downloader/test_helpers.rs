//! Shared test helpers for building UniversalDownloader instances in tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::UniversalDownloader;
use crate::error::{Error, Result};
use crate::host::{EndpointAuthorization, MemoryTaskHost, SYSTEM_CONNECTION};
use crate::identity::PackageIdentityResolver;
use crate::telemetry::TelemetrySink;
use crate::tool::ToolInvoker;
use crate::types::{InvocationSpec, TelemetryEvent, ToolResult};

pub(crate) const SERVICE_URI: &str = "https://dev.azure.com/contoso/";
pub(crate) const FEED_URI: &str = "https://pkgs.dev.azure.com/contoso/";
pub(crate) const JOB_TOKEN: &str = "job-access-token";
pub(crate) const EXTERNAL_URI: &str = "https://dev.azure.com/fabrikam/";
pub(crate) const EXTERNAL_TOKEN: &str = "external-pat";

/// Identity resolver answering from fixed values
pub(crate) struct FakeIdentityResolver {
    /// Name returned for any package id; None makes the feed lookup fail
    pub(crate) package_name: Option<String>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeIdentityResolver {
    pub(crate) fn returning(name: &str) -> Self {
        Self {
            package_name: Some(name.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            package_name: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PackageIdentityResolver for FakeIdentityResolver {
    async fn resolve_feed_base_uri(&self, service_uri: &str, token: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("feed {service_uri} {token}"));
        match self.package_name {
            Some(_) => Ok(FEED_URI.to_string()),
            None => Err(Error::IdentityResolution {
                step: "feed location",
                message: "HTTP 503 Service Unavailable".into(),
            }),
        }
    }

    async fn resolve_package_name(
        &self,
        feed_uri: &str,
        token: &str,
        feed_id: &str,
        package_id: &str,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("package {feed_uri} {token} {feed_id} {package_id}"));
        Ok(self.package_name.clone().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// What the fake tool does when invoked
#[derive(Clone)]
pub(crate) enum ToolBehavior {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    CannotStart,
}

/// Tool invoker that records specs instead of running anything
pub(crate) struct FakeToolInvoker {
    pub(crate) behavior: ToolBehavior,
    pub(crate) invocations: Mutex<Vec<InvocationSpec>>,
}

impl FakeToolInvoker {
    pub(crate) fn new(behavior: ToolBehavior) -> Self {
        Self {
            behavior,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn exiting(code: i32, stderr: &str) -> Self {
        Self::new(ToolBehavior::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub(crate) fn printing(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(ToolBehavior::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    pub(crate) fn invocations(&self) -> Vec<InvocationSpec> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolInvoker for FakeToolInvoker {
    async fn invoke(&self, spec: &InvocationSpec) -> Result<ToolResult> {
        self.invocations.lock().unwrap().push(spec.clone());
        match &self.behavior {
            ToolBehavior::Exit {
                code,
                stdout,
                stderr,
            } => Ok(ToolResult {
                exit_code: *code,
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            }),
            ToolBehavior::CannotStart => Err(Error::ToolSpawn {
                path: spec.executable.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Telemetry sink that keeps every event
#[derive(Default)]
pub(crate) struct RecordingTelemetry {
    pub(crate) events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub(crate) fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn publish(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Host configured for an internal feed download into `dir`
pub(crate) fn internal_host(dir: &str) -> MemoryTaskHost {
    MemoryTaskHost::new()
        .with_input("downloadDirectory", dir)
        .with_input("internalOrExternalDownload", "internal")
        .with_input("feedListDownload", "feed-guid")
        .with_input("packageListDownload", "package-guid")
        .with_input("versionListDownload", "1.0.0")
        .with_input("verbosity", "Information")
        .with_endpoint(
            SYSTEM_CONNECTION,
            SERVICE_URI,
            EndpointAuthorization::new("OAuth").with_parameter("AccessToken", JOB_TOKEN),
        )
}

/// Host configured for an external feed download into `dir`
pub(crate) fn external_host(dir: &str, auth: EndpointAuthorization) -> MemoryTaskHost {
    MemoryTaskHost::new()
        .with_input("downloadDirectory", dir)
        .with_input("internalOrExternalDownload", "External")
        .with_input("feedDownloadExternal", "remote-feed")
        .with_input("packageDownloadExternal", "remote-package")
        .with_input("versionDownloadExternal", "3.1.4")
        .with_input("externalEndpoint", "fabrikam")
        .with_input("verbosity", "Debug")
        .with_endpoint("fabrikam", EXTERNAL_URI, auth)
}

/// Token endpoint authorization for the external host
pub(crate) fn token_auth() -> EndpointAuthorization {
    EndpointAuthorization::new("Token").with_parameter("apitoken", EXTERNAL_TOKEN)
}

/// Everything a test needs to inspect after a run
pub(crate) struct TestRig {
    pub(crate) downloader: UniversalDownloader,
    pub(crate) host: Arc<MemoryTaskHost>,
    pub(crate) identity: Arc<FakeIdentityResolver>,
    pub(crate) tool: Arc<FakeToolInvoker>,
    pub(crate) telemetry: Arc<RecordingTelemetry>,
}

/// Build a downloader wired to fakes
pub(crate) fn create_test_downloader(
    host: MemoryTaskHost,
    identity: FakeIdentityResolver,
    tool: FakeToolInvoker,
) -> TestRig {
    let host = Arc::new(host);
    let identity = Arc::new(identity);
    let tool = Arc::new(tool);
    let telemetry = Arc::new(RecordingTelemetry::default());

    let downloader = UniversalDownloader {
        host: host.clone(),
        identity: identity.clone(),
        tool: tool.clone(),
        telemetry: telemetry.clone(),
        artifact_tool_path: "/opt/artifacttool/ArtifactTool".into(),
    };

    TestRig {
        downloader,
        host,
        identity,
        tool,
        telemetry,
    }
}
