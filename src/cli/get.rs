use clap::Args;
use serde_json::Value;

use crate::cli::root::print_json;
use crate::cli::ResourceName;
use crate::config::Context;
use crate::resource::Endpoint;
use crate::Result;

#[derive(Args, Debug)]
pub struct GetCommand {
    /// Resource
    #[arg(value_enum)]
    resource: ResourceName,
    /// Item id
    id: String,
}

impl GetCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let endpoint = Endpoint::get(&self.resource.descriptor(), &self.id);
        let value: Value = context.client.query(endpoint).await?;

        print_json(&value)
    }
}
