use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{Request, Response};
use crate::error::HttpError;

/// One layer of the outbound request pipeline.
///
/// The innermost layer actually talks to the backend; outer layers decorate it.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn apply(&self, request: Request) -> Result<Response, HttpError>;
}

#[async_trait]
impl<M> Middleware for Box<M>
where
    M: Middleware + ?Sized,
{
    async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        (**self).apply(request).await
    }
}

#[async_trait]
impl<M> Middleware for Arc<M>
where
    M: Middleware + ?Sized,
{
    async fn apply(&self, request: Request) -> Result<Response, HttpError> {
        (**self).apply(request).await
    }
}
