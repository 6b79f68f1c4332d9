pub(crate) mod middleware;
pub use self::middleware::{Dispatcher, Middleware};

pub(crate) mod hook;
pub use self::hook::Registration;

mod refresh;

mod principal;
pub use self::principal::{Principal, Role, Section};

mod credential;
pub use self::credential::{Credentials, SignupData, VerifyData};

mod session;
pub use self::session::{ActionStatus, ErrorInfo, Session, SessionStore, Settled};

mod guard;
pub use self::guard::{Config as GuardConfig, Decision, RouteGuard};
