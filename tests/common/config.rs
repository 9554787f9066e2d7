//! Task host and mock service helpers

use serde_json::json;
use universal_download::host::SYSTEM_CONNECTION;
use universal_download::identity::PACKAGING_AREA_ID;
use universal_download::{EndpointAuthorization, MemoryTaskHost};
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const JOB_TOKEN: &str = "job-access-token";
pub const EXTERNAL_TOKEN: &str = "external-pat";

/// Start a mock service that knows one internal package
///
/// The collection lives at `/contoso/` and reports the packaging service at
/// `/pkgs/contoso/` on the same server.
pub async fn start_feed_service(feed_id: &str, package_id: &str, package_name: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/contoso/_apis/resourceAreas/{PACKAGING_AREA_ID}")))
        .and(bearer_token(JOB_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": PACKAGING_AREA_ID,
            "locationUrl": format!("{}/pkgs/contoso/", server.uri()),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/pkgs/contoso/_apis/packaging/feeds/{feed_id}/packages/{package_id}"
        )))
        .and(bearer_token(JOB_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": package_id,
            "name": package_name,
        })))
        .mount(&server)
        .await;

    server
}

/// Host for an internal download against `service_uri`
pub fn internal_host(service_uri: &str, dir: &str, feed_id: &str, package_id: &str) -> MemoryTaskHost {
    MemoryTaskHost::new()
        .with_input("downloadDirectory", dir)
        .with_input("feedListDownload", feed_id)
        .with_input("packageListDownload", package_id)
        .with_input("versionListDownload", "2.4.0")
        .with_input("verbosity", "Information")
        .with_endpoint(
            SYSTEM_CONNECTION,
            service_uri,
            EndpointAuthorization::new("OAuth").with_parameter("AccessToken", JOB_TOKEN),
        )
}

/// Host for an external download through endpoint `fabrikam`
pub fn external_host(dir: &str, auth: EndpointAuthorization) -> MemoryTaskHost {
    MemoryTaskHost::new()
        .with_input("downloadDirectory", dir)
        .with_input("internalOrExternalDownload", "external")
        .with_input("feedDownloadExternal", "public-feed")
        .with_input("packageDownloadExternal", "sdk")
        .with_input("versionDownloadExternal", "9.0.1")
        .with_input("externalEndpoint", "fabrikam")
        .with_input("verbosity", "None")
        .with_endpoint("fabrikam", "https://dev.azure.com/fabrikam/", auth)
}
