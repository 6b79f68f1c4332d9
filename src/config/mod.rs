mod initialize;
pub use initialize::{Context, Initializer};

mod config;
pub use config::Config;

pub mod env {
    pub const BASE_URL: &str = "STOCKLY_BASE_URL";
    pub const EMAIL: &str = "STOCKLY_EMAIL";
    pub const PASSWORD: &str = "STOCKLY_PASSWORD";
    pub const CONFIG_PATH: &str = "STOCKLY_CONFIG_PATH";
    pub const LOG_DIRECTIVE: &str = "STOCKLY_LOG";
}
