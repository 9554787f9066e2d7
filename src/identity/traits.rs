//! Trait for package identity lookups

use async_trait::async_trait;

/// The two network lookups needed to name an internal package
///
/// Implementations perform I/O and may fail; callers do not retry.
#[async_trait]
pub trait PackageIdentityResolver: Send + Sync {
    /// Find the base URI of the feed service for a collection
    ///
    /// # Arguments
    ///
    /// * `service_uri` - URI of the current service connection
    /// * `access_token` - Bearer token for the request
    async fn resolve_feed_base_uri(
        &self,
        service_uri: &str,
        access_token: &str,
    ) -> crate::Result<String>;

    /// Find a package's name from its id
    ///
    /// # Arguments
    ///
    /// * `feed_uri` - Result of [`resolve_feed_base_uri`](Self::resolve_feed_base_uri)
    /// * `access_token` - Bearer token for the request
    /// * `feed_id` - Feed id, optionally prefixed with `project/`
    /// * `package_id` - Opaque package id
    async fn resolve_package_name(
        &self,
        feed_uri: &str,
        access_token: &str,
        feed_id: &str,
        package_id: &str,
    ) -> crate::Result<String>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
