use serde::Deserialize;

// Redirect targets of the route guard.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    login_path: Option<String>,
    unauthorized_path: Option<String>,
}

impl Config {
    const DEFAULT_LOGIN_PATH: &'static str = "/login";
    const DEFAULT_UNAUTHORIZED_PATH: &'static str = "/unauthorized";

    pub fn set_login_path(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.login_path = Some(val)
        }
    }
    pub fn set_unauthorized_path(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.unauthorized_path = Some(val)
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.set_login_path(&mut other.login_path);
        self.set_unauthorized_path(&mut other.unauthorized_path);
    }

    pub fn login_path(&self) -> &str {
        self.login_path
            .as_deref()
            .unwrap_or(Config::DEFAULT_LOGIN_PATH)
    }

    pub fn unauthorized_path(&self) -> &str {
        self.unauthorized_path
            .as_deref()
            .unwrap_or(Config::DEFAULT_UNAUTHORIZED_PATH)
    }
}
