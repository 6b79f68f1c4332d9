pub(crate) mod internal;

use std::fmt;
use std::io;

use serde_json::Value;

use crate::core::ErrorInfo;

#[derive(Debug)]
pub enum StocklyError {
    // Request failed after the auth layer gave up on it.
    Http(HttpError),
    // A session action was rejected.
    Session(ErrorInfo),
    // No principal is present after the login sequence.
    Unauthenticated,
    // Downloaded file does not start with the pdf signature.
    InvalidPdf { len: usize },
    Decode(serde_json::Error),
    Config { description: String },
    Io(io::Error),
    Internal(String),
}

impl StocklyError {
    /// Whether the failure means the caller has no valid session.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            StocklyError::Unauthenticated => true,
            StocklyError::Http(err) => err.is_unauthorized(),
            StocklyError::Session(info) => info.status == Some(HttpError::UNAUTHORIZED),
            _ => false,
        }
    }

    pub fn http(&self) -> Option<&HttpError> {
        match self {
            StocklyError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for StocklyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StocklyError::Http(err) => err.fmt(f),
            StocklyError::Session(info) => info.fmt(f),
            StocklyError::Unauthenticated => write!(f, "unauthenticated"),
            StocklyError::InvalidPdf { len } => {
                write!(f, "response is not a pdf document ({} bytes)", len)
            }
            StocklyError::Decode(err) => write!(f, "decode response body. {}", err),
            StocklyError::Config { description } => write!(f, "config: {}", description),
            StocklyError::Io(err) => err.fmt(f),
            StocklyError::Internal(description) => write!(f, "internal: {}", description),
        }
    }
}

impl std::error::Error for StocklyError {}

impl From<HttpError> for StocklyError {
    fn from(err: HttpError) -> Self {
        StocklyError::Http(err)
    }
}

impl From<ErrorInfo> for StocklyError {
    fn from(info: ErrorInfo) -> Self {
        StocklyError::Session(info)
    }
}

impl From<serde_json::Error> for StocklyError {
    fn from(err: serde_json::Error) -> Self {
        StocklyError::Decode(err)
    }
}

impl From<io::Error> for StocklyError {
    fn from(err: io::Error) -> Self {
        StocklyError::Io(err)
    }
}

impl From<internal::Error> for StocklyError {
    fn from(err: internal::Error) -> Self {
        use internal::ErrorKind;
        tracing::debug!(backtrace = ?err.backtrace(), "{}", err);
        match err.kind() {
            ErrorKind::Io(_) | ErrorKind::ConfigDecode(_) | ErrorKind::InvalidBaseUrl { .. } => {
                StocklyError::Config {
                    description: err.to_string(),
                }
            }
            ErrorKind::HttpClient(_) => StocklyError::Internal(err.to_string()),
        }
    }
}

/// Where a failed request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    // The server answered with a non-2xx status.
    Response,
    // The server was never reached.
    Network,
    // The request could not be constructed.
    Request,
}

/// Uniform failure shape of every outbound call.
///
/// `status` carries the received status code, or [`HttpError::UNREACHABLE_STATUS`]
/// when no response exists. Use [`HttpError::origin`] to tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    status: u16,
    data: Value,
    origin: Origin,
}

impl HttpError {
    pub const UNREACHABLE_STATUS: u16 = 500;
    pub const UNAUTHORIZED: u16 = 401;

    const NO_RESPONSE: &'static str = "No response received from the server.";

    /// Failure from a received non-2xx response. The body is kept as json when
    /// it parses, as text otherwise.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
        };
        Self {
            status,
            data,
            origin: Origin::Response,
        }
    }

    pub fn network(description: impl fmt::Display) -> Self {
        Self {
            status: HttpError::UNREACHABLE_STATUS,
            data: serde_json::json!({
                "message": HttpError::NO_RESPONSE,
                "details": description.to_string(),
            }),
            origin: Origin::Network,
        }
    }

    pub fn request(description: impl fmt::Display) -> Self {
        Self {
            status: HttpError::UNREACHABLE_STATUS,
            data: serde_json::json!({ "message": description.to_string() }),
            origin: Origin::Request,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Only a real 401 answer counts. Unreachable servers never look unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.origin == Origin::Response && self.status == HttpError::UNAUTHORIZED
    }

    pub fn is_response(&self) -> bool {
        self.origin == Origin::Response
    }

    pub fn is_network(&self) -> bool {
        self.origin == Origin::Network
    }

    /// Human readable message: the `message` field of a json body, the body
    /// text, or the bare status.
    pub fn message(&self) -> String {
        match &self.data {
            Value::Object(map) => match map.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => self.data.to_string(),
            },
            Value::String(text) if !text.is_empty() => text.clone(),
            _ => format!("status {}", self.status),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.origin {
            Origin::Response => write!(f, "http {}: {}", self.status, self.message()),
            Origin::Network => write!(f, "network: {}", self.message()),
            Origin::Request => write!(f, "request: {}", self.message()),
        }
    }
}

impl std::error::Error for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_requires_a_response() {
        assert!(HttpError::from_response(401, b"").is_unauthorized());
        assert!(!HttpError::from_response(403, b"").is_unauthorized());
        assert!(!HttpError::network("connection refused").is_unauthorized());
        assert_eq!(
            HttpError::network("connection refused").status(),
            HttpError::UNREACHABLE_STATUS
        );
    }

    #[test]
    fn body_is_kept_as_json_or_text() {
        let err = HttpError::from_response(404, br#"{"message":"Order not found"}"#);
        assert_eq!(err.message(), "Order not found");
        assert_eq!(err.data()["message"], "Order not found");

        let err = HttpError::from_response(502, b"Bad Gateway");
        assert_eq!(err.data(), &Value::String("Bad Gateway".into()));
        assert_eq!(err.message(), "Bad Gateway");

        let err = HttpError::from_response(500, b"");
        assert_eq!(err.message(), "status 500");
    }

    #[test]
    fn unauthenticated_covers_401() {
        assert!(StocklyError::Unauthenticated.is_unauthenticated());
        assert!(StocklyError::from(HttpError::from_response(401, b"")).is_unauthenticated());
        assert!(!StocklyError::from(HttpError::network("timeout")).is_unauthenticated());
    }
}
