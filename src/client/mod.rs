use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::common::{debug, trace};
use crate::core::hook::UnauthorizedHook;
use crate::core::middleware::{Dispatcher, Middleware, MiddlewareChain};
use crate::core::Registration;
use crate::resource::{Endpoint, QueryCache};
use crate::Result;

mod config;
pub use self::config::Config;

mod request;
pub use self::request::{Body, Method, Part, Request, Response};

#[cfg(test)]
pub(crate) mod mock;

/// Handle to the Stockly api. Cheap to clone; clones share credentials, the
/// refresh coordinator and the response cache.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    chain: MiddlewareChain,
    hook: Arc<UnauthorizedHook>,
    cache: QueryCache,
}

impl Client {
    /// Client sending requests over http to `config.base_url()`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dispatcher = Dispatcher::from_config(config)?;
        Ok(Client::with_transport(config, dispatcher))
    }

    /// Client on top of a custom innermost layer.
    pub fn with_transport(config: &Config, transport: impl Middleware + 'static) -> Self {
        let hook = UnauthorizedHook::new();
        Self {
            inner: Arc::new(Inner {
                chain: MiddlewareChain::new(config.refresh_path(), hook.clone(), transport),
                hook,
                cache: QueryCache::new(config.cache_ttl()),
            }),
        }
    }

    /// Send a request through the full pipeline, recovering from expired
    /// credentials when possible.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        Ok(self.inner.chain.apply(request).await?)
    }

    /// Exchange the refresh credential for a new access credential. Joins a
    /// refresh already in flight instead of starting another one.
    pub async fn refresh(&self) -> Result<()> {
        Ok(self.inner.chain.refresh().await?)
    }

    /// Register the callback run when a credential refresh fails. Replaces the
    /// previous callback; dropping the returned handle removes it.
    pub fn on_unauthorized<F>(&self, callback: F) -> Registration
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.hook.register(callback)
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    /// Run a query endpoint, serving it from cache while the cached response
    /// is fresh.
    pub async fn query<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let key = endpoint.request().cache_key();
        if let Some(value) = self.inner.cache.get(&key) {
            trace!(%key, "Cache hit");
            return Ok(T::deserialize(&value)?);
        }

        let generation = self.inner.cache.generation();
        let (request, provides, _) = endpoint.into_parts();
        let value = self.execute(request).await?.value();
        let decoded = T::deserialize(&value)?;
        if !self
            .inner
            .cache
            .insert_since(generation, key.as_str(), value, provides)
        {
            trace!(%key, "Response not cached");
        }

        Ok(decoded)
    }

    /// Run a mutation endpoint and drop every cached response it invalidates.
    pub async fn mutate<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let (request, _, invalidates) = endpoint.into_parts();
        let value = self.execute(request).await?.value();

        let dropped = self.inner.cache.invalidate(&invalidates);
        debug!(dropped, tags = ?invalidates, "Cache invalidated");

        Ok(T::deserialize(&value)?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}
