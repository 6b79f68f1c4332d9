use std::sync::Arc;

use crate::client::{Request, Response};
use crate::common::HttpError;
use crate::core::hook::UnauthorizedHook;
use crate::core::middleware::{Authenticator, Logger, Middleware};

type Transport = Box<dyn Middleware>;

pub(crate) struct MiddlewareChain {
    root: Logger<Authenticator<Transport>>,
}

impl MiddlewareChain {
    pub(crate) fn new(
        refresh_path: &str,
        hook: Arc<UnauthorizedHook>,
        transport: impl Middleware + 'static,
    ) -> Self {
        let transport: Transport = Box::new(transport);

        let authenticator = Authenticator::new(refresh_path, hook, transport);

        let logger = Logger::new(authenticator);

        Self { root: logger }
    }

    pub(crate) async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        self.root.apply(request).await
    }

    pub(crate) async fn refresh(&self) -> Result<(), HttpError> {
        self.root.inner().refresh().await
    }
}
