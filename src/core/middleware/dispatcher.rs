use async_trait::async_trait;
use reqwest::multipart;

use crate::client::{Body, Config, Part, Request, Response};
use crate::common::{trace, ErrorKind, HttpError, Result};
use crate::core::middleware::Middleware;

/// Innermost layer: sends requests to the backend over http.
///
/// Cookies set by the backend are kept in the client's jar and sent back on
/// every request, so credentials never pass through this crate.
pub struct Dispatcher {
    http: reqwest::Client,
    base_url: String,
}

impl Dispatcher {
    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.base_url();
        if let Err(err) = reqwest::Url::parse(&base_url) {
            return Err(ErrorKind::InvalidBaseUrl {
                url: base_url,
                description: err.to_string(),
            }
            .into());
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &Request) -> String {
        format!("{}{}", self.base_url, request.normalized_path())
    }

    fn form(parts: &[Part]) -> std::result::Result<multipart::Form, HttpError> {
        let mut form = multipart::Form::new();
        for part in parts {
            let mut field = multipart::Part::bytes(part.bytes.to_vec());
            if let Some(file_name) = &part.file_name {
                field = field.file_name(file_name.clone());
            }
            if let Some(mime) = &part.mime {
                field = field.mime_str(mime).map_err(HttpError::request)?;
            }
            form = form.part(part.name.clone(), field);
        }
        Ok(form)
    }
}

#[async_trait]
impl Middleware for Dispatcher {
    async fn apply(&self, request: Request) -> std::result::Result<Response, HttpError> {
        let mut builder = self
            .http
            .request(request.method().clone(), self.url(&request))
            .query(request.query_pairs());

        for (name, value) in request.effective_headers() {
            builder = builder.header(name, value);
        }

        builder = match request.body() {
            Body::Empty => builder,
            Body::Json(value) => builder.body(value.to_string()),
            Body::Multipart(parts) => builder.multipart(Dispatcher::form(parts)?),
        };

        trace!(request = %request, "Send");
        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(HttpError::network)?;

        if (200..300).contains(&status) {
            Ok(Response::new(status, content_type, body))
        } else {
            Err(HttpError::from_response(status, &body))
        }
    }
}

// Builder errors never left the process; everything else means the server
// could not be reached or did not answer.
fn classify(err: reqwest::Error) -> HttpError {
    if err.is_builder() {
        HttpError::request(err)
    } else {
        HttpError::network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let mut config = Config::default();
        config.set_base_url(&mut Some("not a url".to_owned()));
        assert!(Dispatcher::from_config(&config).is_err());
    }

    #[test]
    fn joins_base_url_and_path() {
        let mut config = Config::default();
        config.set_base_url(&mut Some("http://localhost:8080/api/v1/".to_owned()));
        let dispatcher = Dispatcher::from_config(&config).unwrap();
        assert_eq!(
            dispatcher.url(&Request::get("inventory-logs/page")),
            "http://localhost:8080/api/v1/inventory-logs/page"
        );
        assert_eq!(
            dispatcher.url(&Request::get("/users/me")),
            "http://localhost:8080/api/v1/users/me"
        );
    }

    #[test]
    fn unreachable_server_is_not_unauthorized() {
        let mut config = Config::default();
        // Port 9 (discard) is closed on test machines.
        config.set_base_url(&mut Some("http://127.0.0.1:9/api/v1".to_owned()));
        config.set_timeout_milliseconds(Some(500));
        let dispatcher = Dispatcher::from_config(&config).unwrap();

        tokio_test::block_on(async move {
            let err = dispatcher.apply(Request::get("/users/me")).await.unwrap_err();
            assert!(err.is_network());
            assert!(!err.is_unauthorized());
            assert_eq!(err.status(), HttpError::UNREACHABLE_STATUS);
        });
    }
}
