//! Artifact tool command line construction

use std::collections::BTreeMap;
use std::path::Path;

use crate::types::{AuthContext, InvocationSpec, PackageRequest};

/// Environment variable that carries the credential to the artifact tool
pub const PAT_ENV_VAR: &str = "UNIVERSAL_DOWNLOAD_PAT";

/// Build the `universal download` invocation for a resolved request
///
/// The token only ever appears in the environment overlay; the command line
/// names the variable through `--patvar`.
pub fn build(
    tool_path: &Path,
    request: &PackageRequest,
    auth: &AuthContext,
    verbosity: &str,
) -> InvocationSpec {
    let destination = request.destination.to_string_lossy();
    let arguments: [&str; 16] = [
        "universal",
        "download",
        "--feed",
        request.feed_id.as_str(),
        "--service",
        auth.service_uri.as_str(),
        "--package-name",
        request.package_name.as_str(),
        "--package-version",
        request.package_version.as_str(),
        "--path",
        destination.as_ref(),
        "--patvar",
        PAT_ENV_VAR,
        "--verbosity",
        verbosity,
    ];

    let mut environment = BTreeMap::new();
    environment.insert(PAT_ENV_VAR.to_string(), auth.token.clone());

    InvocationSpec {
        executable: tool_path.to_path_buf(),
        arguments: arguments.into_iter().map(str::to_string).collect(),
        environment,
    }
}
