//! Stockly api stand-in with cookie based access and refresh tokens.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const EMAIL: &str = "supplier@stockly.io";
pub const PASSWORD: &str = "secret";

const ACCESS: &str = "access_token";
const REFRESH: &str = "refresh_token";

#[derive(Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
    issued: usize,
    refresh_calls: usize,
    unauthorized: usize,
    // Refresh answers only after this many requests were rejected.
    hold_refresh_until: usize,
}

#[derive(Clone, Default)]
pub struct MockServer {
    tokens: Arc<Mutex<Tokens>>,
}

impl MockServer {
    /// Serve on an ephemeral local port. Returns the api base url.
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/refresh", post(refresh))
            .route("/auth/logout", post(logout))
            .route("/users/me", get(me))
            .route("/orders/page", get(orders_page))
            .route("/orders/{id}", get(order))
            .route("/receipts/{id}/download", get(download_receipt))
            .with_state(self.clone());
        let app = Router::new().nest("/api/v1", api);

        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        format!("http://{}/api/v1", addr)
    }

    /// Invalidate the current access token.
    pub fn expire_access(&self) {
        self.tokens.lock().unwrap().access = None;
    }

    pub fn revoke_refresh(&self) {
        self.tokens.lock().unwrap().refresh = None;
    }

    pub fn hold_refresh_until(&self, rejected: usize) {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.hold_refresh_until = tokens.unauthorized + rejected;
    }

    pub fn refresh_calls(&self) -> usize {
        self.tokens.lock().unwrap().refresh_calls
    }

    fn issue(&self) -> String {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.issued += 1;
        let access = format!("access-{}", tokens.issued);
        tokens.access = Some(access.clone());
        access
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let mut tokens = self.tokens.lock().unwrap();
        let ok = tokens.access.is_some() && cookie(headers, ACCESS) == tokens.access;
        if !ok {
            tokens.unauthorized += 1;
        }
        ok
    }
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

fn set_cookie(name: &str, value: &str) -> (axum::http::HeaderName, String) {
    (SET_COOKIE, format!("{}={}; Path=/; HttpOnly", name, value))
}

fn unauthorized() -> Response {
    StatusCode::UNAUTHORIZED.into_response()
}

async fn login(State(server): State<MockServer>, Json(body): Json<Value>) -> Response {
    if body["email"] != EMAIL || body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response();
    }
    let access = server.issue();
    let refresh = "refresh-1".to_owned();
    server.tokens.lock().unwrap().refresh = Some(refresh.clone());

    (
        AppendHeaders([set_cookie(ACCESS, &access), set_cookie(REFRESH, &refresh)]),
        Json(json!({"message": "Login successful"})),
    )
        .into_response()
}

async fn refresh(State(server): State<MockServer>, headers: HeaderMap) -> Response {
    server.tokens.lock().unwrap().refresh_calls += 1;

    for _ in 0..200 {
        let released = {
            let tokens = server.tokens.lock().unwrap();
            tokens.unauthorized >= tokens.hold_refresh_until
        };
        if released {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let valid = {
        let tokens = server.tokens.lock().unwrap();
        tokens.refresh.is_some() && cookie(&headers, REFRESH) == tokens.refresh
    };
    if !valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Refresh token expired"})),
        )
            .into_response();
    }
    let access = server.issue();
    ([set_cookie(ACCESS, &access)], Json(json!({"message": "Token refreshed"}))).into_response()
}

async fn logout(State(server): State<MockServer>) -> Response {
    {
        let mut tokens = server.tokens.lock().unwrap();
        tokens.access = None;
        tokens.refresh = None;
    }
    (
        AppendHeaders([
            (SET_COOKIE, format!("{}=; Path=/; Max-Age=0", ACCESS)),
            (SET_COOKIE, format!("{}=; Path=/; Max-Age=0", REFRESH)),
        ]),
        StatusCode::OK,
    )
        .into_response()
}

async fn me(State(server): State<MockServer>, headers: HeaderMap) -> Response {
    if !server.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": 7, "username": "supplier", "email": EMAIL, "role": "SUPPLIER"}))
        .into_response()
}

async fn orders_page(State(server): State<MockServer>, headers: HeaderMap) -> Response {
    if !server.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "content": [
            {"id": 1, "status": "PENDING", "totalPrice": 10.0, "items": []},
            {"id": 2, "status": "SHIPPED", "totalPrice": 25.5, "items": []}
        ],
        "totalElements": 2,
        "totalPages": 1,
        "number": 0,
        "size": 10,
        "first": true,
        "last": true,
        "empty": false,
        "numberOfElements": 2
    }))
    .into_response()
}

async fn order(
    State(server): State<MockServer>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !server.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": id, "status": "PENDING", "items": []})).into_response()
}

async fn download_receipt(
    State(server): State<MockServer>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !server.authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Receipt not found"})),
        )
            .into_response();
    }
    let body = Bytes::from(format!("%PDF-1.4\n% receipt {}\n%%EOF", id));
    ([(CONTENT_TYPE, "application/pdf")], body).into_response()
}
