use clap::Args;
use serde_json::Value;

use crate::cli::root::print_json;
use crate::cli::ResourceName;
use crate::config::Context;
use crate::resource::{Direction, Endpoint, PageRequest};
use crate::Result;

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Resource
    #[arg(value_enum)]
    pub resource: ResourceName,
    /// Index of the first item
    #[arg(long, default_value_t = 0)]
    offset: u32,
    /// Items per page
    #[arg(long, default_value_t = PageRequest::DEFAULT_PAGE_SIZE)]
    page_size: u32,
    /// Sort field, defaults to the resource's own
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort direction
    #[arg(long, value_enum)]
    direction: Option<Direction>,
    /// Search term
    #[arg(long)]
    search: Option<String>,
    /// Extra filter as key=value, e.g. warehouseId=3
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

impl ListCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let ListCommand {
            resource,
            offset,
            page_size,
            sort_by,
            direction,
            search,
            filters,
        } = self;

        let page = PageRequest {
            offset,
            page_size,
            sort_by,
            direction,
            search_term: search,
            filters,
        };
        let endpoint = Endpoint::page(&resource.descriptor(), &page);
        let value: Value = context.client.query(endpoint).await?;

        print_json(&value)
    }
}

fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got {}", s)),
    }
}
