//! Shop client shared state

use std::sync::Arc;

use ms_shared::config::endpoints::join;
use ms_shared::ServiceEndpoints;

use super::detail_cache::ProductDetailCache;
use crate::gateway::{path_segment, HttpTransport, RequestGateway};
use crate::session::SessionContext;

/// Client for the resource services (catalogue, cart, wishlist, orders,
/// inventory, reviews, users, payments)
///
/// Operations live in one `impl` block per service; all of them go through
/// the shared gateway, so a stale token is refreshed transparently.
pub struct ShopClient<T>
where
    T: HttpTransport,
{
    pub(super) gateway: Arc<RequestGateway<T>>,
    pub(super) details: ProductDetailCache,
}

impl<T> ShopClient<T>
where
    T: HttpTransport,
{
    pub fn new(gateway: Arc<RequestGateway<T>>) -> Self {
        Self {
            gateway,
            details: ProductDetailCache::new(),
        }
    }

    pub fn gateway(&self) -> &Arc<RequestGateway<T>> {
        &self.gateway
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.gateway.session()
    }

    /// Products fetched so far, keyed by id
    pub fn details(&self) -> &ProductDetailCache {
        &self.details
    }

    pub(super) fn endpoints(&self) -> &ServiceEndpoints {
        self.gateway.endpoints()
    }

    /// `{base}/{prefix}/{segment}{suffix}` with `segment` percent-encoded
    pub(super) fn resource_url(base: &str, prefix: &str, segment: &str, suffix: &str) -> String {
        join(base, &format!("{}/{}{}", prefix, path_segment(segment), suffix))
    }
}
