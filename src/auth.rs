//! Feed authentication
//!
//! Turns the feed type input and the credentials available to the task into a
//! single [`AuthContext`]. Internal feeds use the job's own connection and
//! access token; external feeds use a stored endpoint, which must carry a token.

use crate::config::TaskInputs;
use crate::error::{Error, Result};
use crate::host::{AmbientContext, EndpointAuthorization, SYSTEM_CONNECTION, TaskHost};
use crate::types::{AuthContext, FeedType};

/// Authentication shape of an external endpoint
#[derive(Clone, PartialEq, Eq)]
pub enum ExternalAuth {
    /// Bearer token (personal access token)
    Token {
        /// The token
        token: String,
    },
    /// Basic credentials
    UsernamePassword {
        /// User name
        username: String,
        /// Password
        password: String,
    },
    /// A token scheme whose token parameter is absent or empty
    MissingToken {
        /// Scheme name as configured
        scheme: String,
    },
    /// Any other scheme
    Unsupported {
        /// Scheme name as configured
        scheme: String,
    },
}

impl ExternalAuth {
    /// Classify an endpoint authorization block
    ///
    /// `Token`, `PersonalAccessToken` and `OAuth` schemes become [`ExternalAuth::Token`]
    /// when they carry an `apitoken` or `AccessToken` parameter, and
    /// [`ExternalAuth::MissingToken`] when they don't.
    pub fn from_authorization(auth: &EndpointAuthorization) -> Self {
        let scheme = auth.scheme.as_str();
        let is = |name: &str| scheme.eq_ignore_ascii_case(name);

        if is("Token") || is("PersonalAccessToken") || is("OAuth") {
            return match auth
                .parameter("apitoken")
                .or_else(|| auth.parameter("AccessToken"))
                .filter(|token| !token.is_empty())
            {
                Some(token) => ExternalAuth::Token {
                    token: token.to_string(),
                },
                None => ExternalAuth::MissingToken {
                    scheme: scheme.to_string(),
                },
            };
        } else if is("UsernamePassword") {
            return ExternalAuth::UsernamePassword {
                username: auth.parameter("username").unwrap_or_default().to_string(),
                password: auth.parameter("password").unwrap_or_default().to_string(),
            };
        }

        ExternalAuth::Unsupported {
            scheme: scheme.to_string(),
        }
    }

    /// Scheme name for messages
    pub fn scheme(&self) -> &str {
        match self {
            ExternalAuth::Token { .. } => "Token",
            ExternalAuth::UsernamePassword { .. } => "UsernamePassword",
            ExternalAuth::MissingToken { scheme } | ExternalAuth::Unsupported { scheme } => scheme,
        }
    }
}

impl std::fmt::Debug for ExternalAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalAuth::Token { .. } => f.write_str("Token { .. }"),
            ExternalAuth::UsernamePassword { username, .. } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .finish_non_exhaustive(),
            ExternalAuth::MissingToken { scheme } => f
                .debug_struct("MissingToken")
                .field("scheme", scheme)
                .finish(),
            ExternalAuth::Unsupported { scheme } => f
                .debug_struct("Unsupported")
                .field("scheme", scheme)
                .finish(),
        }
    }
}

/// A stored endpoint pointing at an external feed service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalEndpoint {
    /// Endpoint name as referenced by the task input
    pub name: String,
    /// Account URL of the remote service
    pub account_url: String,
    /// How to authenticate against it
    pub auth: ExternalAuth,
}

impl ExternalEndpoint {
    /// Look up a stored endpoint by name
    ///
    /// Returns `None` when the name is empty or the host has no such endpoint.
    pub fn from_host(host: &dyn TaskHost, name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        let account_url = host.endpoint_url(name).filter(|url| !url.is_empty())?;
        let auth = host
            .endpoint_auth(name)
            .map(|a| ExternalAuth::from_authorization(&a))
            .unwrap_or(ExternalAuth::Unsupported {
                scheme: String::new(),
            });

        Some(Self {
            name: name.to_string(),
            account_url,
            auth,
        })
    }
}

/// Credentials available to a run, read once from the host
#[derive(Clone, Debug, Default)]
pub struct AuthSources {
    /// The job's own service connection
    pub ambient: AmbientContext,
    /// The configured external endpoint, if it exists
    pub external: Option<ExternalEndpoint>,
}

impl AuthSources {
    /// Read the ambient connection and the endpoint named by the inputs
    pub fn from_host(host: &dyn TaskHost, inputs: &TaskInputs) -> Self {
        Self {
            ambient: AmbientContext::from_host(host),
            external: ExternalEndpoint::from_host(host, &inputs.external_endpoint),
        }
    }
}

/// Parse the raw feed type and resolve authentication for it
pub fn resolve(
    feed_type_raw: &str,
    inputs: &TaskInputs,
    sources: &AuthSources,
) -> Result<AuthContext> {
    let feed_type: FeedType = feed_type_raw.parse()?;
    resolve_for(feed_type, inputs, sources)
}

/// Resolve authentication for an already parsed feed type
///
/// # Errors
///
/// - [`Error::Config`] when the internal connection or token is missing
/// - [`Error::NoSourceSpecified`] when the external endpoint does not exist
/// - [`Error::Config`] when the external endpoint uses a token scheme but has no token
/// - [`Error::UnsupportedAuthScheme`] when the external endpoint is not token based
pub fn resolve_for(
    feed_type: FeedType,
    inputs: &TaskInputs,
    sources: &AuthSources,
) -> Result<AuthContext> {
    match feed_type {
        FeedType::Internal => {
            let service_uri = sources.ambient.service_uri.clone().ok_or_else(|| {
                Error::config(
                    SYSTEM_CONNECTION,
                    "the current service connection has no URL",
                )
            })?;
            let token = sources.ambient.access_token.clone().ok_or_else(|| {
                Error::config(
                    "System.AccessToken",
                    "no access token is available to the job",
                )
            })?;

            Ok(AuthContext {
                service_uri,
                token,
                feed_id: inputs.internal_feed.clone(),
            })
        }
        FeedType::External => {
            let endpoint = sources
                .external
                .as_ref()
                .ok_or_else(|| Error::NoSourceSpecified {
                    endpoint: inputs.external_endpoint.clone(),
                })?;

            match &endpoint.auth {
                ExternalAuth::Token { token } => Ok(AuthContext {
                    service_uri: endpoint.account_url.clone(),
                    token: token.clone(),
                    feed_id: inputs.external_feed.clone(),
                }),
                ExternalAuth::MissingToken { scheme } => Err(Error::config(
                    endpoint.name.clone(),
                    format!(
                        "endpoint '{}' uses scheme '{scheme}' but has no token",
                        endpoint.name
                    ),
                )),
                other => Err(Error::UnsupportedAuthScheme {
                    endpoint: endpoint.name.clone(),
                    scheme: other.scheme().to_string(),
                }),
            }
        }
    }
}
