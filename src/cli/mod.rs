mod root;
pub use root::{authenticate, parse, ClientOptions, Command, ResourceName, StocklyCommand};

pub mod delete;
pub mod get;
pub mod guard;
pub mod list;
pub mod predictions;
pub mod receipt;
pub mod search;
pub mod whoami;
