//! Task host boundary
//!
//! The task runner that launches a download supplies configured inputs,
//! service endpoint definitions and variables, and receives log lines and the
//! final result. [`TaskHost`] abstracts that so the core can run without a real
//! agent. Two implementations are provided:
//!
//! - [`EnvTaskHost`]: reads the agent's environment conventions and writes
//!   `##vso[...]` logging commands to stdout
//! - [`MemoryTaskHost`]: keeps everything in memory, for embedding and tests

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

use crate::types::TaskResult;

/// Endpoint id of the connection to the service running the task
pub const SYSTEM_CONNECTION: &str = "SYSTEMVSSCONNECTION";

/// Authorization block of a service endpoint definition
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointAuthorization {
    /// Authorization scheme (e.g., "Token", "UsernamePassword", "OAuth")
    #[serde(default)]
    pub scheme: String,
    /// Scheme parameters (e.g., "apitoken")
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl EndpointAuthorization {
    /// Create an authorization block
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter, ignoring key case
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Debug for EndpointAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.parameters.keys().map(String::as_str).collect();
        f.debug_struct("EndpointAuthorization")
            .field("scheme", &self.scheme)
            .field("parameters", &keys)
            .finish()
    }
}

/// Interface to the task runner hosting a download
pub trait TaskHost: Send + Sync {
    /// Value of a configured task input, if set
    fn input(&self, name: &str) -> Option<String>;

    /// Value of a pipeline variable, if set
    fn variable(&self, name: &str) -> Option<String>;

    /// URL of a service endpoint
    fn endpoint_url(&self, id: &str) -> Option<String>;

    /// Authorization block of a service endpoint
    fn endpoint_auth(&self, id: &str) -> Option<EndpointAuthorization>;

    /// Plain console output
    fn info(&self, message: &str);

    /// Debug output, shown only when the pipeline runs with diagnostics
    fn debug(&self, message: &str);

    /// Warning issue
    fn warning(&self, message: &str);

    /// Error issue
    fn error(&self, message: &str);

    /// Final result of the task
    fn set_result(&self, result: TaskResult, message: &str);
}

/// Values the host provides about the service running the task
///
/// Read once at start and passed explicitly to whatever needs it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AmbientContext {
    /// URI of the current service connection
    pub service_uri: Option<String>,
    /// Access token of the current job
    pub access_token: Option<String>,
}

impl AmbientContext {
    /// Read the current service connection from the host
    ///
    /// The access token comes from the connection's `AccessToken` parameter,
    /// falling back to the `System.AccessToken` variable.
    pub fn from_host(host: &dyn TaskHost) -> Self {
        let service_uri = host
            .endpoint_url(SYSTEM_CONNECTION)
            .filter(|uri| !uri.is_empty());

        let access_token = host
            .endpoint_auth(SYSTEM_CONNECTION)
            .and_then(|auth| auth.parameter("AccessToken").map(str::to_string))
            .filter(|token| !token.is_empty())
            .or_else(|| {
                host.variable("System.AccessToken")
                    .filter(|token| !token.is_empty())
            });

        Self {
            service_uri,
            access_token,
        }
    }
}

impl std::fmt::Debug for AmbientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientContext")
            .field("service_uri", &self.service_uri)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Host backed by the agent's process environment
///
/// Inputs are read from `INPUT_<NAME>`, variables from `<NAME>` with dots
/// replaced by underscores and endpoint URLs from `ENDPOINT_URL_<ID>`.
/// Endpoint authorization comes from `ENDPOINT_AUTH_SCHEME_<ID>` plus one
/// `ENDPOINT_AUTH_PARAMETER_<ID>_<KEY>` per parameter, or else from the JSON
/// in `ENDPOINT_AUTH_<ID>`. Output is written to stdout as logging commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvTaskHost;

impl EnvTaskHost {
    fn env_key(prefix: &str, name: &str) -> String {
        let name: String = name
            .chars()
            .map(|c| if c == ' ' || c == '.' { '_' } else { c })
            .collect();
        format!("{prefix}{}", name.to_uppercase())
    }

    fn read(key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn emit(line: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "failed to write to task host output");
        }
    }
}

impl TaskHost for EnvTaskHost {
    fn input(&self, name: &str) -> Option<String> {
        Self::read(&Self::env_key("INPUT_", name)).map(|v| v.trim().to_string())
    }

    fn variable(&self, name: &str) -> Option<String> {
        Self::read(&Self::env_key("", name))
    }

    fn endpoint_url(&self, id: &str) -> Option<String> {
        Self::read(&Self::env_key("ENDPOINT_URL_", id))
    }

    fn endpoint_auth(&self, id: &str) -> Option<EndpointAuthorization> {
        if let Some(scheme) = Self::read(&Self::env_key("ENDPOINT_AUTH_SCHEME_", id)) {
            let prefix = format!("{}_", Self::env_key("ENDPOINT_AUTH_PARAMETER_", id));
            let parameters = std::env::vars_os()
                .filter_map(|(key, value)| {
                    let name = key.to_str()?.strip_prefix(&prefix)?;
                    if name.is_empty() {
                        return None;
                    }
                    Some((name.to_string(), value.into_string().ok()?))
                })
                .collect();
            return Some(EndpointAuthorization { scheme, parameters });
        }

        let raw = Self::read(&Self::env_key("ENDPOINT_AUTH_", id))?;
        match serde_json::from_str(&raw) {
            Ok(auth) => Some(auth),
            Err(e) => {
                tracing::warn!(endpoint = %id, error = %e, "endpoint authorization is not valid JSON");
                None
            }
        }
    }

    fn info(&self, message: &str) {
        Self::emit(message);
    }

    fn debug(&self, message: &str) {
        Self::emit(&logging_command("task.debug", &[], message));
    }

    fn warning(&self, message: &str) {
        Self::emit(&logging_command(
            "task.logissue",
            &[("type", "warning")],
            message,
        ));
    }

    fn error(&self, message: &str) {
        Self::emit(&logging_command("task.logissue", &[("type", "error")], message));
    }

    fn set_result(&self, result: TaskResult, message: &str) {
        if result == TaskResult::Failed {
            self.error(message);
        }
        Self::emit(&logging_command(
            "task.complete",
            &[("result", result.as_str())],
            message,
        ));
    }
}

/// Format a `##vso[command key=value;]message` logging command
pub fn logging_command(command: &str, properties: &[(&str, &str)], message: &str) -> String {
    let mut line = format!("##vso[{command}");
    if !properties.is_empty() {
        line.push(' ');
        for (key, value) in properties {
            line.push_str(key);
            line.push('=');
            line.push_str(&escape_property(value));
            line.push(';');
        }
    }
    line.push(']');
    line.push_str(&escape_data(message));
    line
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(']', "%5D").replace(';', "%3B")
}

/// A line written to a [`MemoryTaskHost`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostMessage {
    /// Console output
    Info(String),
    /// Debug output
    Debug(String),
    /// Warning issue
    Warning(String),
    /// Error issue
    Error(String),
}

/// In-memory host
///
/// Inputs, variables and endpoints are set up front; log lines and the final
/// result are recorded for inspection.
#[derive(Default)]
pub struct MemoryTaskHost {
    inputs: BTreeMap<String, String>,
    variables: BTreeMap<String, String>,
    endpoint_urls: BTreeMap<String, String>,
    endpoint_auths: BTreeMap<String, EndpointAuthorization>,
    messages: Mutex<Vec<HostMessage>>,
    result: Mutex<Option<(TaskResult, String)>>,
}

impl MemoryTaskHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    /// Set a variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Define an endpoint
    pub fn with_endpoint(
        mut self,
        id: impl Into<String>,
        url: impl Into<String>,
        auth: EndpointAuthorization,
    ) -> Self {
        let id = id.into();
        self.endpoint_urls.insert(id.clone(), url.into());
        self.endpoint_auths.insert(id, auth);
        self
    }

    /// Everything logged so far
    pub fn messages(&self) -> Vec<HostMessage> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Warnings logged so far
    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                HostMessage::Warning(w) => Some(w),
                _ => None,
            })
            .collect()
    }

    /// Errors logged so far
    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                HostMessage::Error(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// Final result, once set
    pub fn result(&self) -> Option<(TaskResult, String)> {
        self.result.lock().ok().and_then(|r| r.clone())
    }

    fn record(&self, message: HostMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

impl TaskHost for MemoryTaskHost {
    fn input(&self, name: &str) -> Option<String> {
        self.inputs.get(name).map(|v| v.trim().to_string())
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }

    fn endpoint_url(&self, id: &str) -> Option<String> {
        self.endpoint_urls.get(id).cloned()
    }

    fn endpoint_auth(&self, id: &str) -> Option<EndpointAuthorization> {
        self.endpoint_auths.get(id).cloned()
    }

    fn info(&self, message: &str) {
        self.record(HostMessage::Info(message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.record(HostMessage::Debug(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.record(HostMessage::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.record(HostMessage::Error(message.to_string()));
    }

    fn set_result(&self, result: TaskResult, message: &str) {
        if let Ok(mut slot) = self.result.lock() {
            *slot = Some((result, message.to_string()));
        }
    }
}
