use async_trait::async_trait;
use tracing_futures::Instrument;

use crate::client::{Request, Response};
use crate::common::{debug, error, info, warn, HttpError};
use crate::core::middleware::Middleware;
use crate::error::Origin;

pub(crate) struct Logger<MW> {
    next: MW,
}

impl<MW> Logger<MW> {
    pub(crate) fn new(next: MW) -> Self {
        Self { next }
    }

    pub(crate) fn inner(&self) -> &MW {
        &self.next
    }
}

#[async_trait]
impl<MW> Middleware for Logger<MW>
where
    MW: Middleware + 'static,
{
    async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        let start = tokio::time::Instant::now();
        let label = request.to_string();
        let span = tracing::debug_span!("request", request = %label);

        let result = self.next.apply(request).instrument(span).await;

        match &result {
            Ok(response) => {
                info!(request = %label, status = response.status(), elapsed = ?start.elapsed(), "Request done")
            }
            Err(err) => diagnose(&label, err),
        }

        result
    }
}

fn diagnose(label: &str, err: &HttpError) {
    match err.origin() {
        Origin::Network => error!(request = %label, cause = %err, "No response from server"),
        Origin::Request => error!(request = %label, cause = %err, "Request setup error"),
        Origin::Response => match err.status() {
            401 => debug!(request = %label, "Unauthorized"),
            403 => warn!(request = %label, "Access denied"),
            404 => warn!(request = %label, "Resource not found"),
            500 => error!(request = %label, "Internal server error"),
            status => warn!(request = %label, status, message = %err.message(), "Request failed"),
        },
    }
}
