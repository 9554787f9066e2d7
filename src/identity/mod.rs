//! Package identity resolution
//!
//! Internal feeds identify packages by an opaque id, while the artifact tool
//! needs the package name. Resolving it takes two dependent lookups:
//!
//! 1. the feed service's base URI, found from the collection URI
//! 2. the package name, found from the feed URI, feed id and package id
//!
//! The lookups sit behind the [`PackageIdentityResolver`] trait so they can be
//! replaced in tests. [`HttpIdentityResolver`] talks to the real REST API.
//!
//! ## Usage
//!
//! ```no_run
//! use universal_download::config::IdentityConfig;
//! use universal_download::identity::{HttpIdentityResolver, resolve_name};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = HttpIdentityResolver::new(&IdentityConfig::default())?;
//!     let name = resolve_name(
//!         &resolver,
//!         "https://dev.azure.com/contoso/",
//!         "access-token",
//!         "my-feed",
//!         "5f1d0c5e-0000-0000-0000-000000000000",
//!     )
//!     .await?;
//!     println!("package name: {name}");
//!     Ok(())
//! }
//! ```

mod http;
mod traits;

pub use http::{HttpIdentityResolver, PACKAGING_AREA_ID};
pub use traits::PackageIdentityResolver;

use crate::error::Result;

/// Resolve a package id to its name
///
/// Runs the feed location lookup, then the package name lookup with its
/// result. Failures from either step are returned unchanged.
pub async fn resolve_name(
    resolver: &dyn PackageIdentityResolver,
    service_uri: &str,
    access_token: &str,
    feed_id: &str,
    package_id: &str,
) -> Result<String> {
    let feed_uri = resolver
        .resolve_feed_base_uri(service_uri, access_token)
        .await?;
    tracing::debug!(feed_uri = %feed_uri, resolver = resolver.name(), "resolved feed location");

    let name = resolver
        .resolve_package_name(&feed_uri, access_token, feed_id, package_id)
        .await?;
    tracing::debug!(package_id = %package_id, package_name = %name, "resolved package name");

    Ok(name)
}
