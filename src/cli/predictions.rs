use clap::Args;

use crate::cli::root::print_json;
use crate::config::Context;
use crate::resource::Predictions;
use crate::Result;

#[derive(Args, Debug)]
pub struct PredictionsCommand {
    /// Month as YYYY-MM, current predictions when absent
    #[arg(long, value_parser = parse_month)]
    month: Option<String>,
    /// Only predictions of this warehouse
    #[arg(long, requires = "month", conflicts_with = "product")]
    warehouse: Option<i64>,
    /// Only predictions of this product
    #[arg(long, requires = "month")]
    product: Option<i64>,
}

impl PredictionsCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let api = context.client.resource::<Predictions>();

        let predictions = match (self.month.as_deref(), self.warehouse, self.product) {
            (Some(month), Some(warehouse), _) => api.by_warehouse(month, warehouse).await?,
            (Some(month), None, Some(product)) => api.by_product(month, product).await?,
            (Some(month), None, None) => api.by_month(month).await?,
            (None, _, _) => api.current().await?,
        };

        print_json(&predictions)
    }
}

fn parse_month(s: &str) -> std::result::Result<String, String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m").to_string())
        .map_err(|err| format!("expected YYYY-MM, got {}. {}", s, err))
}
