use std::sync::{Arc, Weak};

use serde_json::Value;
use tokio::sync::{watch, OnceCell};

use crate::client::{Client, Request};
use crate::common::{debug, info, warn, StocklyError};
use crate::core::credential::{Credentials, SignupData, VerifyData};
use crate::core::{Principal, Registration};

pub(crate) mod path {
    pub(crate) const LOGIN: &str = "/auth/login";
    pub(crate) const LOGOUT: &str = "/auth/logout";
    pub(crate) const SIGNUP: &str = "/auth/signup";
    pub(crate) const VERIFY: &str = "/auth/verify";
    pub(crate) const ME: &str = "/users/me";
}

const INITIALIZE_FAILED: &str = "Unable to initialize auth.";
const FETCH_FAILED: &str = "Unable to fetch user info";
const LOGOUT_FAILED: &str = "Logout failed.";

/// Outcome of a session action. Failures are also recorded in the session.
pub type Settled = Result<(), ErrorInfo>;

/// Who is logged in, as seen by the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<Principal>,
    pub is_loading: bool,
    pub is_initialized: bool,
    pub error: Option<ErrorInfo>,
    pub signup: ActionStatus,
    pub verify: ActionStatus,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Progress of an action that does not touch the principal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionStatus {
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
}

/// Error as recorded in the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// Status of the server answer. Absent when no answer was received.
    pub status: Option<u16>,
    pub message: String,
    pub details: Value,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            details: Value::Null,
        }
    }

    /// Server error body when there is one, otherwise `fallback` or the
    /// error's own description.
    pub(crate) fn from_error(err: &StocklyError, fallback: Option<&str>) -> Self {
        match err.http() {
            Some(http) if http.is_network() || http.data().is_null() => ErrorInfo {
                status: http.is_response().then(|| http.status()),
                message: fallback.map(str::to_owned).unwrap_or_else(|| http.message()),
                details: http.data().clone(),
            },
            Some(http) => ErrorInfo {
                status: http.is_response().then(|| http.status()),
                message: http.message(),
                details: http.data().clone(),
            },
            None => ErrorInfo {
                status: None,
                message: fallback
                    .map(str::to_owned)
                    .unwrap_or_else(|| err.to_string()),
                details: Value::Null,
            },
        }
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_owned();
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status),
            None => f.write_str(&self.message),
        }
    }
}

/// Owner of the [`Session`].
///
/// Constructed explicitly and shared by cloning. Every change is published so
/// subscribers can re-derive their view, see [`SessionStore::subscribe`].
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    state: watch::Sender<Session>,
    initialized: OnceCell<Settled>,
}

impl SessionStore {
    pub fn new(client: Client) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            inner: Arc::new(Inner {
                client,
                state,
                initialized: OnceCell::new(),
            }),
        }
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// End the session whenever the client gives up on refreshing
    /// credentials. Dropping the registration detaches the store.
    pub fn attach(&self) -> Registration {
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.client.on_unauthorized(move || {
            if let Some(inner) = inner.upgrade() {
                inner.terminate();
            }
        })
    }

    /// Restore a session from the refresh credential. Runs at most once per
    /// store; concurrent callers share the one run.
    pub async fn initialize(&self) -> Settled {
        self.inner
            .initialized
            .get_or_init(|| self.run_initialize())
            .await
            .clone()
    }

    async fn run_initialize(&self) -> Settled {
        if self.snapshot().is_initialized {
            debug!("Session already initialized");
            return Ok(());
        }
        self.pending();

        let result = async {
            self.client().refresh().await?;
            self.me().await
        }
        .await;

        match result {
            Ok(principal) => {
                info!(user = %principal.username, role = %principal.role, "Session restored");
                self.inner.state.send_modify(|session| {
                    session.user = Some(principal);
                    session.is_initialized = true;
                    session.is_loading = false;
                    session.error = None;
                });
                Ok(())
            }
            Err(err) => {
                debug!(cause = %err, "No session to restore");
                let info = ErrorInfo::from_error(&err, None).with_message(INITIALIZE_FAILED);
                self.inner.state.send_modify(|session| {
                    session.user = None;
                    session.is_initialized = true;
                    session.is_loading = false;
                    session.error = Some(info.clone());
                });
                Err(info)
            }
        }
    }

    /// First step of the login protocol. Never sets the principal; call
    /// [`SessionStore::fetch_current_principal`] after it succeeds.
    pub async fn login(&self, credentials: &Credentials) -> Settled {
        self.pending();

        let result = async {
            let request = Request::post(path::LOGIN)
                .json(credentials)?
                .without_refresh();
            self.client().execute(request).await
        }
        .await;

        match result {
            Ok(_) => {
                info!(email = %credentials.email, "Logged in");
                self.settle(|session| session.error = None);
                Ok(())
            }
            Err(err) => {
                let info = ErrorInfo::from_error(&err, None);
                warn!(email = %credentials.email, error = %info, "Login failed");
                self.settle(|session| session.error = Some(info.clone()));
                Err(info)
            }
        }
    }

    pub async fn fetch_current_principal(&self) -> Settled {
        self.pending();

        match self.me().await {
            Ok(principal) => {
                debug!(user = %principal.username, "Principal fetched");
                self.settle(|session| {
                    session.user = Some(principal);
                    session.is_initialized = true;
                    session.error = None;
                });
                Ok(())
            }
            Err(err) => {
                let info = ErrorInfo::from_error(&err, Some(FETCH_FAILED));
                self.settle(|session| {
                    session.user = None;
                    session.is_initialized = true;
                    session.error = Some(info.clone());
                });
                Err(info)
            }
        }
    }

    /// Tear the session down. The server call is best effort; the local
    /// session is cleared whatever its outcome.
    pub async fn logout(&self) {
        self.inner
            .state
            .send_modify(|session| session.is_loading = true);

        if let Err(err) = self.client().execute(Request::post(path::LOGOUT)).await {
            warn!(cause = %err, "{}", LOGOUT_FAILED);
        }

        self.client().cache().clear();
        self.settle(|session| {
            session.user = None;
            session.error = None;
            session.is_initialized = true;
        });
        info!("Logged out");
    }

    pub async fn signup(&self, data: &SignupData) -> Settled {
        let request = Request::post(path::SIGNUP).json(data);
        self.anonymous(request, |session| &mut session.signup).await
    }

    pub async fn verify(&self, data: &VerifyData) -> Settled {
        let request = Request::post(path::VERIFY).json(data);
        self.anonymous(request, |session| &mut session.verify).await
    }

    pub fn clear_error(&self) {
        self.inner.state.send_modify(|session| session.error = None);
    }

    async fn anonymous<F>(&self, request: crate::Result<Request>, select: F) -> Settled
    where
        F: Fn(&mut Session) -> &mut ActionStatus,
    {
        self.inner.state.send_modify(|session| {
            let status = select(session);
            status.is_loading = true;
            status.error = None;
        });

        let result = match request {
            Ok(request) => self
                .client()
                .execute(request.without_refresh())
                .await
                .map(|_| ()),
            Err(err) => Err(err),
        }
        .map_err(|err| ErrorInfo::from_error(&err, None));

        self.inner.state.send_modify(|session| {
            let status = select(session);
            status.is_loading = false;
            status.error = result.clone().err();
        });
        result
    }

    async fn me(&self) -> crate::Result<Principal> {
        let response = self.client().execute(Request::get(path::ME)).await?;
        Ok(response.json::<Principal>()?)
    }

    fn pending(&self) {
        self.inner.state.send_modify(|session| {
            session.is_loading = true;
            session.error = None;
        });
    }

    fn settle(&self, f: impl FnOnce(&mut Session)) {
        self.inner.state.send_modify(|session| {
            session.is_loading = false;
            f(session);
        });
    }
}

impl Inner {
    fn terminate(&self) {
        warn!("Session terminated");
        self.client.cache().clear();
        self.state.send_modify(|session| {
            session.user = None;
            session.is_initialized = true;
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish()
    }
}
