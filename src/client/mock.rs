//! Scripted in-memory backend used by unit tests in place of the http dispatcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::client::{Body, Request, Response};
use crate::core::Middleware;
use crate::error::HttpError;

pub(crate) const EMAIL: &str = "buyer@stockly.io";
pub(crate) const PASSWORD: &str = "secret";

#[derive(Clone)]
enum Reply {
    Json(u16, Value),
    Raw(u16, String, Vec<u8>),
    Unreachable,
}

struct State {
    authorized: bool,
    refresh_ok: bool,
    logout_fails: bool,
    refresh_calls: usize,
    unauthorized_hits: usize,
    calls: Vec<Request>,
    routes: HashMap<String, Reply>,
}

pub(crate) struct Backend {
    state: Mutex<State>,
    refresh_hold: Mutex<Option<Arc<Notify>>>,
    route_holds: Mutex<HashMap<String, Arc<Notify>>>,
}

impl Backend {
    pub(crate) fn new() -> Arc<Self> {
        let mut routes = HashMap::new();
        routes.insert(
            "GET /users/me".to_owned(),
            Reply::Json(
                200,
                json!({"id": 1, "username": "buyer", "email": EMAIL, "role": "BUYER"}),
            ),
        );
        Arc::new(Self {
            state: Mutex::new(State {
                authorized: false,
                refresh_ok: true,
                logout_fails: false,
                refresh_calls: 0,
                unauthorized_hits: 0,
                calls: Vec::new(),
                routes,
            }),
            refresh_hold: Mutex::new(None),
            route_holds: Mutex::new(HashMap::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn route(&self, key: &str, status: u16, body: Value) {
        self.lock()
            .routes
            .insert(key.to_owned(), Reply::Json(status, body));
    }

    pub(crate) fn route_raw(&self, key: &str, status: u16, content_type: &str, body: &[u8]) {
        self.lock().routes.insert(
            key.to_owned(),
            Reply::Raw(status, content_type.to_owned(), body.to_vec()),
        );
    }

    pub(crate) fn unreachable(&self, key: &str) {
        self.lock().routes.insert(key.to_owned(), Reply::Unreachable);
    }

    /// Make refresh calls wait until the returned notify fires.
    pub(crate) fn hold_refresh(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.refresh_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Delay the answer of the next `"METHOD /path"` call until the returned
    /// notify fires. The answer is computed before the wait.
    pub(crate) fn hold(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.route_holds
            .lock()
            .unwrap()
            .insert(key.to_owned(), notify.clone());
        notify
    }

    pub(crate) fn set_authorized(&self, authorized: bool) {
        self.lock().authorized = authorized;
    }

    pub(crate) fn set_refresh_ok(&self, ok: bool) {
        self.lock().refresh_ok = ok;
    }

    pub(crate) fn set_logout_fails(&self, fails: bool) {
        self.lock().logout_fails = fails;
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.lock().refresh_calls
    }

    pub(crate) fn unauthorized_hits(&self) -> usize {
        self.lock().unauthorized_hits
    }

    /// Number of calls to `"METHOD /path"`, ignoring the query string.
    pub(crate) fn count(&self, key: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|req| req.to_string() == key)
            .count()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.lock().calls.iter().map(|req| req.to_string()).collect()
    }

    pub(crate) fn last(&self, key: &str) -> Option<Request> {
        self.lock()
            .calls
            .iter()
            .rev()
            .find(|req| req.to_string() == key)
            .cloned()
    }

    async fn refresh(&self) -> Result<Response, HttpError> {
        self.lock().refresh_calls += 1;
        let hold = self.refresh_hold.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        let mut state = self.lock();
        if state.refresh_ok {
            state.authorized = true;
            Ok(Response::json_response(200, &json!({"message": "refreshed"})))
        } else {
            state.authorized = false;
            Err(HttpError::from_response(
                401,
                br#"{"message":"Refresh token expired"}"#,
            ))
        }
    }

    fn login(&self, request: &Request) -> Result<Response, HttpError> {
        let mut state = self.lock();
        let valid = match request.body() {
            Body::Json(body) => body["email"] == EMAIL && body["password"] == PASSWORD,
            _ => false,
        };
        if valid {
            state.authorized = true;
            Ok(Response::json_response(200, &json!({"message": "ok"})))
        } else {
            Err(HttpError::from_response(
                401,
                br#"{"message":"Invalid credentials"}"#,
            ))
        }
    }

    fn logout(&self) -> Result<Response, HttpError> {
        let mut state = self.lock();
        if state.logout_fails {
            return Err(HttpError::network("connection reset"));
        }
        state.authorized = false;
        Ok(Response::new(200, None, Vec::new()))
    }

    fn protected(&self, request: &Request) -> Result<Response, HttpError> {
        let mut state = self.lock();
        if !state.authorized {
            state.unauthorized_hits += 1;
            return Err(HttpError::from_response(401, b""));
        }
        let reply = state
            .routes
            .get(&request.cache_key())
            .or_else(|| state.routes.get(&request.to_string()))
            .cloned();
        match reply {
            Some(Reply::Json(status, body)) if (200..300).contains(&status) => {
                Ok(Response::json_response(status, &body))
            }
            Some(Reply::Json(status, body)) => Err(HttpError::from_response(
                status,
                body.to_string().as_bytes(),
            )),
            Some(Reply::Raw(status, content_type, body)) => {
                Ok(Response::new(status, Some(content_type), body))
            }
            Some(Reply::Unreachable) => Err(HttpError::network("connection refused")),
            None => Err(HttpError::from_response(
                404,
                br#"{"message":"Resource not found"}"#,
            )),
        }
    }
}

#[async_trait]
impl Middleware for Backend {
    async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        self.lock().calls.push(request.clone());
        match request.normalized_path().as_str() {
            "/auth/refresh" => self.refresh().await,
            "/auth/login" => self.login(&request),
            "/auth/logout" => self.logout(),
            "/auth/signup" | "/auth/verify" => self.anonymous(&request),
            _ => {
                let reply = self.protected(&request);
                let hold = self.route_holds.lock().unwrap().remove(&request.to_string());
                if let Some(hold) = hold {
                    hold.notified().await;
                }
                reply
            }
        }
    }
}

impl Backend {
    fn anonymous(&self, request: &Request) -> Result<Response, HttpError> {
        let state = self.lock();
        match state.routes.get(&request.to_string()).cloned() {
            Some(Reply::Json(status, body)) if !(200..300).contains(&status) => Err(
                HttpError::from_response(status, body.to_string().as_bytes()),
            ),
            _ => Ok(Response::json_response(200, &json!({"message": "ok"}))),
        }
    }
}
