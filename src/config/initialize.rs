use std::path::Path;

use tokio::fs;

use crate::client::Client;
use crate::common::{debug, Result};
use crate::config::Config;
use crate::core::{GuardConfig, Middleware, Registration, SessionStore};

/// Assembles a client and its session store from configuration.
#[derive(Debug, Default)]
pub struct Initializer {
    pub(crate) config: Config,
}

/// Everything a frontend needs: the api client, the session store attached to
/// it and the route settings.
#[derive(Debug)]
pub struct Context {
    pub client: Client,
    pub session: SessionStore,
    pub routes: GuardConfig,
    // Keeps the session attached to the client.
    _registration: Registration,
}

impl Initializer {
    pub async fn load_config_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let config = read_config(path.as_ref()).await?;

        Ok(Self { config })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_base_url(&mut self, val: &mut Option<String>) {
        self.config.client.set_base_url(val);
    }

    pub fn set_timeout_milliseconds(&mut self, val: Option<u64>) {
        self.config.client.set_timeout_milliseconds(val);
    }

    pub fn set_cache_ttl_seconds(&mut self, val: Option<u64>) {
        self.config.client.set_cache_ttl_seconds(val);
    }

    /// Override file values with the values set in `config`.
    pub fn merge(&mut self, mut config: Config) {
        self.config.override_merge(&mut config);
    }

    /// Client over http plus an attached session store.
    pub fn build(self) -> crate::Result<Context> {
        let client = Client::from_config(&self.config.client)?;
        Ok(self.assemble(client))
    }

    /// Same as [`Initializer::build`] on top of a custom transport.
    pub fn build_with_transport(self, transport: impl Middleware + 'static) -> Context {
        let client = Client::with_transport(&self.config.client, transport);
        self.assemble(client)
    }

    fn assemble(self, client: Client) -> Context {
        let session = SessionStore::new(client.clone());
        let registration = session.attach();
        Context {
            client,
            session,
            routes: self.config.routes,
            _registration: registration,
        }
    }
}

async fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "Loading config file");
    let f = fs::File::open(path).await?;
    let config = serde_yaml::from_reader::<_, Config>(f.into_std().await)?;

    Ok(config)
}
