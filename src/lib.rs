#![allow(clippy::module_inception)]

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod resource;

pub use crate::client::Client;
pub use crate::core::{Decision, Principal, Role, RouteGuard, Session, SessionStore};
pub use crate::error::{HttpError, StocklyError};
pub type Result<T, E = crate::error::StocklyError> = std::result::Result<T, E>;

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::internal::Error;
    pub(crate) type ErrorKind = crate::error::internal::ErrorKind;

    pub use crate::error::{HttpError, StocklyError};

    pub use tracing::{debug, error, info, trace, warn};
}
