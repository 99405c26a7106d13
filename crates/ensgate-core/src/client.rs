//! Resolution client construction and enriched-client rotation.
//!
//! Two client shapes are built from the same provider list:
//!
//! - the **public client** runs over a [`FallbackTransport`] spanning every
//!   provider and never rotates;
//! - the **enriched client** is bound to a single provider at a time and is
//!   advanced explicitly through [`EnrichedClientHandle::rotate`], or
//!   implicitly by [`EnrichedClientHandle::call`] after a network failure.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::error::ResolveError;
use crate::http_client::HttpClient;
use crate::name_service::NameService;
use crate::provider::ProviderUrls;
use crate::rpc::RpcNameService;
use crate::transport::{EndpointTransport, FallbackTransport, TransportPolicy};

/// Builds a client bound to one provider URL.
pub type ClientBuilder = Arc<dyn Fn(&str) -> Arc<dyn NameService> + Send + Sync>;

struct EnrichedSlot {
    index: usize,
    client: Arc<dyn NameService>,
}

/// Current enriched client plus the provider index it is bound to.
pub struct EnrichedClientHandle {
    provider_urls: ProviderUrls,
    build: ClientBuilder,
    slot: RwLock<EnrichedSlot>,
}

impl EnrichedClientHandle {
    /// Binds the first client to the preferred provider.
    pub fn new(provider_urls: ProviderUrls, build: ClientBuilder) -> Self {
        let client = build(provider_urls.preferred());
        Self {
            provider_urls,
            build,
            slot: RwLock::new(EnrichedSlot { index: 0, client }),
        }
    }

    pub fn current(&self) -> (usize, Arc<dyn NameService>) {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        (slot.index, Arc::clone(&slot.client))
    }

    pub fn current_index(&self) -> usize {
        self.current().0
    }

    pub fn current_url(&self) -> &str {
        self.provider_urls
            .get(self.current_index())
            .unwrap_or_else(|| self.provider_urls.preferred())
    }

    pub fn provider_urls(&self) -> &ProviderUrls {
        &self.provider_urls
    }

    /// Replaces the held client with one bound to `provider_urls[current_index + 1]`.
    ///
    /// Fails without touching the held client when `current_index` already
    /// names the last provider. When another caller has rotated past
    /// `current_index` in the meantime, the already-advanced client is
    /// returned and no second advance happens.
    pub fn rotate(&self, current_index: usize) -> Result<Arc<dyn NameService>, ResolveError> {
        self.rotate_from(current_index).map(|(_, client)| client)
    }

    fn rotate_from(
        &self,
        current_index: usize,
    ) -> Result<(usize, Arc<dyn NameService>), ResolveError> {
        let provider_count = self.provider_urls.len();
        if current_index >= provider_count.saturating_sub(1) {
            warn!(current_index, provider_count, "no provider left to rotate to");
            return Err(ResolveError::providers_exhausted(provider_count));
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.index > current_index {
            return Ok((slot.index, Arc::clone(&slot.client)));
        }

        let next = current_index + 1;
        let url = self
            .provider_urls
            .get(next)
            .ok_or_else(|| ResolveError::providers_exhausted(provider_count))?;
        let client = (self.build)(url);

        info!(from = current_index, to = next, endpoint = url, "rotated enriched client");
        slot.index = next;
        slot.client = Arc::clone(&client);
        Ok((next, client))
    }

    /// Runs `op` against the current client, rotating after network failures.
    ///
    /// Non-network failures are returned as-is. Once rotation reports that no
    /// provider is left, the last network failure is returned.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, ResolveError>
    where
        F: Fn(Arc<dyn NameService>) -> Fut,
        Fut: Future<Output = Result<T, ResolveError>>,
    {
        let (mut index, mut client) = self.current();

        loop {
            let error = match op(client).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_network() => error,
                Err(error) => return Err(error),
            };

            warn!(index, error = %error, "enriched client failed; rotating");
            match self.rotate_from(index) {
                Ok((next_index, next_client)) => {
                    index = next_index;
                    client = next_client;
                }
                Err(_) => return Err(error),
            }
        }
    }
}

/// Builds the public and enriched clients from one provider list.
#[derive(Clone)]
pub struct ClientFactory {
    provider_urls: ProviderUrls,
    policy: TransportPolicy,
    http: Arc<dyn HttpClient>,
}

impl ClientFactory {
    pub fn new(
        provider_urls: ProviderUrls,
        policy: TransportPolicy,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            provider_urls,
            policy,
            http,
        }
    }

    pub fn provider_urls(&self) -> &ProviderUrls {
        &self.provider_urls
    }

    /// Client over the full fallback transport.
    pub fn public_client(&self) -> Arc<dyn NameService> {
        let transport =
            FallbackTransport::new(&self.provider_urls, &self.policy, Arc::clone(&self.http));
        Arc::new(RpcNameService::new(transport))
    }

    /// Rotatable client bound to the preferred provider only.
    pub fn enriched_client(&self) -> EnrichedClientHandle {
        let policy = self.policy.clone();
        let http = Arc::clone(&self.http);
        let build: ClientBuilder = Arc::new(move |url: &str| -> Arc<dyn NameService> {
            let transport = EndpointTransport::new(url, policy.clone(), Arc::clone(&http));
            Arc::new(RpcNameService::new(transport))
        });

        EnrichedClientHandle::new(self.provider_urls.clone(), build)
    }
}
