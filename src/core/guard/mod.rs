mod config;
pub use self::config::Config;

use tokio::sync::watch;

use crate::core::{Role, Session};

/// What to show for a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The session is not settled yet. Show a neutral placeholder.
    Loading,
    RedirectToLogin(String),
    RedirectToUnauthorized(String),
    Render,
}

impl Decision {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Decision::Loading)
    }
}

/// Role based gate in front of a protected route.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    allowed: Vec<Role>,
    login_path: String,
    unauthorized_path: String,
}

impl RouteGuard {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        RouteGuard::with_config(allowed, &Config::default())
    }

    pub fn with_config(allowed: impl IntoIterator<Item = Role>, config: &Config) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            login_path: config.login_path().to_owned(),
            unauthorized_path: config.unauthorized_path().to_owned(),
        }
    }

    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    pub fn decide(&self, session: &Session) -> Decision {
        if !session.is_initialized || session.is_loading {
            return Decision::Loading;
        }
        match &session.user {
            None => Decision::RedirectToLogin(self.login_path.clone()),
            Some(user) if !user.has_role(&self.allowed) => {
                Decision::RedirectToUnauthorized(self.unauthorized_path.clone())
            }
            Some(_) => Decision::Render,
        }
    }

    /// Re-evaluate on every session change until the decision is settled.
    /// Returns `Loading` only if the session store went away first.
    pub async fn settled(&self, changes: &mut watch::Receiver<Session>) -> Decision {
        loop {
            let decision = self.decide(&changes.borrow_and_update());
            if decision.is_settled() {
                return decision;
            }
            if changes.changed().await.is_err() {
                return decision;
            }
        }
    }
}
