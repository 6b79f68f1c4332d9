mod chain;
pub(crate) use self::chain::MiddlewareChain;

mod middleware;
pub use self::middleware::Middleware;

mod authenticator;
pub(crate) use self::authenticator::Authenticator;

mod logger;
pub(crate) use self::logger::Logger;

mod dispatcher;
pub use self::dispatcher::Dispatcher;
