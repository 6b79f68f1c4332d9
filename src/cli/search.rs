use clap::Args;
use serde_json::Value;

use crate::cli::root::print_json;
use crate::cli::ResourceName;
use crate::config::Context;
use crate::resource::Endpoint;
use crate::Result;

#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Resource
    #[arg(value_enum)]
    resource: ResourceName,
    /// Search term
    term: String,
}

impl SearchCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let endpoint = Endpoint::search(&self.resource.descriptor(), &self.term);
        let value: Value = context.client.query(endpoint).await?;

        print_json(&value)
    }
}
