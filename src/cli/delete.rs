use clap::Args;

use crate::cli::ResourceName;
use crate::config::Context;
use crate::resource::Endpoint;
use crate::Result;

#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Resource
    #[arg(value_enum)]
    resource: ResourceName,
    /// Item id
    id: String,
}

impl DeleteCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let descriptor = self.resource.descriptor();
        context
            .client
            .mutate::<serde_json::Value>(Endpoint::delete(&descriptor, &self.id))
            .await?;

        println!("OK deleted {}/{}", descriptor.name, self.id);
        Ok(())
    }
}
