use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use reqwest::Method;

pub(crate) const CONTENT_TYPE: &str = "Content-Type";
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Outbound call, independent of the http library that eventually sends it.
///
/// Requests are cheap to clone so that the auth layer can replay them after
/// a credential refresh.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Body,
    // Set once the request has been replayed after a refresh.
    retried: bool,
    // Whether a 401 on this request may start a refresh.
    refreshable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<Part>),
}

/// One field of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub(crate) name: String,
    pub(crate) file_name: Option<String>,
    pub(crate) mime: Option<String>,
    pub(crate) bytes: Bytes,
}

impl Part {
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            mime: None,
            bytes: Bytes::from(value.into()),
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
            retried: false,
            refreshable: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Request::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Request::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Request::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Request::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Request::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Absent values are not sent at all.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json_body(mut self, value: Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> crate::Result<Self> {
        Ok(self.json_body(serde_json::to_value(value)?))
    }

    pub fn multipart(mut self, parts: Vec<Part>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    /// Exclude the request from the refresh protocol. A 401 is then final.
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub fn is_refreshable(&self) -> bool {
        self.refreshable
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Headers actually put on the wire.
    ///
    /// Multipart bodies carry their own boundary content type, so neither the
    /// json default nor caller headers are applied to them.
    pub fn effective_headers(&self) -> Vec<(String, String)> {
        if let Body::Multipart(_) = self.body {
            return Vec::new();
        }
        let mut headers = self.headers.clone();
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.push((CONTENT_TYPE.to_owned(), APPLICATION_JSON.to_owned()));
        }
        headers
    }

    /// Path relative to the api base url, always with a leading slash.
    pub fn normalized_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }

    /// Identity of the request for response caching. Query pairs are
    /// escaped, so distinct queries never share a key.
    pub fn cache_key(&self) -> String {
        let mut key = format!("{} {}", self.method, self.normalized_path());
        for (i, (k, v)) in self.query.iter().enumerate() {
            key.push(if i == 0 { '?' } else { '&' });
            escape_into(&mut key, k);
            key.push('=');
            escape_into(&mut key, v);
        }
        key
    }
}

// Percent-encode the characters that delimit query pairs.
fn escape_into(key: &mut String, component: &str) {
    for c in component.chars() {
        match c {
            '%' => key.push_str("%25"),
            '&' => key.push_str("%26"),
            '=' => key.push_str("%3D"),
            '?' => key.push_str("%3F"),
            c => key.push(c),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.method, self.normalized_path())
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl Response {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn json_response(status: u16, value: &Value) -> Self {
        Response::new(
            status,
            Some(APPLICATION_JSON.to_owned()),
            value.to_string().into_bytes(),
        )
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Decode the body. An empty body decodes as json `null`, which lets
    /// endpoints without content map onto `()`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.is_empty() {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(&self.body)
        }
    }

    /// Body as json, falling back to a json string for plain text answers.
    pub fn value(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}
