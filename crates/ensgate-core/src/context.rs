use std::sync::Arc;

use tracing::debug;

use crate::client::{ClientFactory, EnrichedClientHandle};
use crate::config::Config;
use crate::error::ConfigError;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::name_service::NameService;

/// Clients shared by every operation handler for the process lifetime.
#[derive(Clone)]
pub struct ServiceContext {
    public: Arc<dyn NameService>,
    enriched: Arc<EnrichedClientHandle>,
}

impl ServiceContext {
    pub fn new(public: Arc<dyn NameService>, enriched: Arc<EnrichedClientHandle>) -> Self {
        Self { public, enriched }
    }

    pub fn from_factory(factory: &ClientFactory) -> Self {
        Self::new(factory.public_client(), Arc::new(factory.enriched_client()))
    }

    /// Production context over reqwest.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(
        config: &Config,
        http: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let provider_urls = config.provider_urls();
        debug!(providers = ?provider_urls.as_slice(), "building resolution clients");
        let factory = ClientFactory::new(provider_urls, config.transport_policy(), http);
        Ok(Self::from_factory(&factory))
    }

    pub fn public(&self) -> &dyn NameService {
        self.public.as_ref()
    }

    pub fn enriched(&self) -> &EnrichedClientHandle {
        &self.enriched
    }
}
