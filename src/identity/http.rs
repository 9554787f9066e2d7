//! REST-based identity resolver

use super::traits::PackageIdentityResolver;
use crate::config::IdentityConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Resource area id of the packaging service
pub const PACKAGING_AREA_ID: &str = "7ab4e64e-c4d8-4f50-ae73-5ef2e21642a5";

const FEED_LOCATION: &str = "feed location";
const PACKAGE_NAME: &str = "package name";

#[derive(Deserialize)]
struct ResourceArea {
    #[serde(rename = "locationUrl", default)]
    location_url: Option<String>,
}

#[derive(Deserialize)]
struct PackageInfo {
    name: String,
}

/// Identity resolver that queries the service's REST API with a bearer token
///
/// - The feed base URI comes from the packaging resource area's `locationUrl`.
///   Servers that do not report one host packaging on the collection URI
///   itself, so that is used instead.
/// - The package name comes from the feed's package record.
#[derive(Clone, Debug)]
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    api_version: String,
}

impl HttpIdentityResolver {
    /// Create a resolver with the configured API version and request timeout
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_version: config.api_version.clone(),
        })
    }

    fn endpoint(&self, base: &str, path: &str, step: &'static str) -> Result<Url> {
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };

        let mut url = Url::parse(&base)
            .and_then(|b| b.join(path))
            .map_err(|e| Error::IdentityResolution {
                step,
                message: format!("invalid URL '{base}{path}': {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        access_token: &str,
        step: &'static str,
    ) -> Result<T> {
        tracing::debug!(url = %url, step, "querying feed service");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::IdentityResolution {
                step,
                message: format!("HTTP {status} from {url}"),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PackageIdentityResolver for HttpIdentityResolver {
    async fn resolve_feed_base_uri(&self, service_uri: &str, access_token: &str) -> Result<String> {
        let url = self.endpoint(
            service_uri,
            &format!("_apis/resourceAreas/{PACKAGING_AREA_ID}"),
            FEED_LOCATION,
        )?;

        let area: ResourceArea = self.get_json(url, access_token, FEED_LOCATION).await?;

        match area.location_url.filter(|u| !u.is_empty()) {
            Some(location) => Ok(location),
            None => {
                tracing::debug!(
                    service_uri = %service_uri,
                    "no packaging location reported, using the service URI"
                );
                Ok(service_uri.to_string())
            }
        }
    }

    async fn resolve_package_name(
        &self,
        feed_uri: &str,
        access_token: &str,
        feed_id: &str,
        package_id: &str,
    ) -> Result<String> {
        if feed_id.is_empty() || package_id.is_empty() {
            return Err(Error::IdentityResolution {
                step: PACKAGE_NAME,
                message: "feed id and package id are required".into(),
            });
        }

        // Project-scoped feeds are written as "project/feed"
        let (project, feed) = match feed_id.split_once('/') {
            Some((project, feed)) => (Some(project), feed),
            None => (None, feed_id),
        };

        let mut path = String::new();
        if let Some(project) = project {
            path.push_str(&urlencoding::encode(project));
            path.push('/');
        }
        path.push_str(&format!(
            "_apis/packaging/feeds/{}/packages/{}",
            urlencoding::encode(feed),
            urlencoding::encode(package_id)
        ));

        let url = self.endpoint(feed_uri, &path, PACKAGE_NAME)?;
        let package: PackageInfo = self.get_json(url, access_token, PACKAGE_NAME).await?;
        Ok(package.name)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
