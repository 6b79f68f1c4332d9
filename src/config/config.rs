use serde::Deserialize;

use crate::client;
use crate::core::GuardConfig;

/// Contents of the yaml configuration file. Every section and field is
/// optional.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub client: client::Config,
    #[serde(default)]
    pub routes: GuardConfig,
}

impl Config {
    /// Apply every value set in `other` on top of `self`.
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.client.override_merge(&mut other.client);
        self.routes.override_merge(&mut other.routes);
    }
}
