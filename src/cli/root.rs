use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cli::{delete, get, guard, list, predictions, receipt, search, whoami};
use crate::common::{info, StocklyError};
use crate::config::{self, Context, Initializer};
use crate::core::Credentials;
use crate::resource::{self, Descriptor, Resource};

/// Stockly dashboard client
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct StocklyCommand {
    /// Client options
    #[command(flatten)]
    pub client: ClientOptions,
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Client options
#[derive(Args, Debug)]
pub struct ClientOptions {
    /// Api base url
    #[arg(long, env = config::env::BASE_URL, global = true)]
    pub base_url: Option<String>,
    /// Account email
    #[arg(long, env = config::env::EMAIL, global = true)]
    pub email: Option<String>,
    /// Account password
    #[arg(long, env = config::env::PASSWORD, hide_env_values = true, global = true)]
    pub password: Option<String>,
    /// Path to the yaml config file
    #[arg(long, env = config::env::CONFIG_PATH, global = true)]
    pub config: Option<PathBuf>,
    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the logged in user
    Whoami(whoami::WhoamiCommand),
    /// List a page of a resource
    List(list::ListCommand),
    /// Search a resource
    Search(search::SearchCommand),
    /// Get one item of a resource
    Get(get::GetCommand),
    /// Delete one item of a resource
    Delete(delete::DeleteCommand),
    /// Receipts
    Receipt(receipt::ReceiptCommand),
    /// Stock predictions
    Predictions(predictions::PredictionsCommand),
    /// Evaluate the route guard for the logged in user
    Guard(guard::GuardCommand),
}

impl Command {
    pub async fn run(self, context: &Context) -> crate::Result<()> {
        match self {
            Command::Whoami(cmd) => cmd.run(context).await,
            Command::List(cmd) => cmd.run(context).await,
            Command::Search(cmd) => cmd.run(context).await,
            Command::Get(cmd) => cmd.run(context).await,
            Command::Delete(cmd) => cmd.run(context).await,
            Command::Receipt(cmd) => cmd.run(context).await,
            Command::Predictions(cmd) => cmd.run(context).await,
            Command::Guard(cmd) => cmd.run(context).await,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceName {
    Users,
    Companies,
    Products,
    Warehouses,
    Orders,
    Shipments,
    Receipts,
    InventoryLogs,
    RoleRequests,
    Predictions,
}

impl ResourceName {
    pub fn descriptor(self) -> Descriptor {
        match self {
            ResourceName::Users => resource::Users::DESCRIPTOR,
            ResourceName::Companies => resource::Companies::DESCRIPTOR,
            ResourceName::Products => resource::Products::DESCRIPTOR,
            ResourceName::Warehouses => resource::Warehouses::DESCRIPTOR,
            ResourceName::Orders => resource::Orders::DESCRIPTOR,
            ResourceName::Shipments => resource::Shipments::DESCRIPTOR,
            ResourceName::Receipts => resource::Receipts::DESCRIPTOR,
            ResourceName::InventoryLogs => resource::InventoryLogs::DESCRIPTOR,
            ResourceName::RoleRequests => resource::RoleRequests::DESCRIPTOR,
            ResourceName::Predictions => resource::Predictions::DESCRIPTOR,
        }
    }
}

/// Parse command line args
pub fn parse() -> StocklyCommand {
    StocklyCommand::parse()
}

/// Build the client and log in: credentials first, then the principal.
pub async fn authenticate(options: ClientOptions) -> crate::Result<Context> {
    let ClientOptions {
        mut base_url,
        email,
        password,
        config,
        timeout,
    } = options;

    let mut initializer = match config {
        Some(path) => Initializer::load_config_file(path).await?,
        None => Initializer::default(),
    };
    initializer.set_base_url(&mut base_url);
    initializer.set_timeout_milliseconds(timeout);

    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(StocklyError::Unauthenticated),
    };

    let context = initializer.build()?;
    context
        .session
        .login(&Credentials::new(email, password))
        .await?;
    context.session.fetch_current_principal().await?;

    match context.session.snapshot().user {
        Some(user) => {
            info!(user = %user.username, role = %user.role, "Authenticated");
            Ok(context)
        }
        None => Err(StocklyError::Unauthenticated),
    }
}

pub(crate) fn print_json(value: &impl serde::Serialize) -> crate::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
